#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Tasks
//!
//! Vectorized RL tasks written against [`physics::PhysicsBackend`].
//!
//! [`VecTask`] is the harness: it builds the scene, owns the batched
//! [`physics::SimState`] snapshot and the episode buffers, and steps every
//! env at once. A [`Task`] supplies the scene and the per-step logic;
//! [`BallBalance`] is the one shipped here.
//!
//! ```rust,ignore
//! use physics::CpuSim;
//! use tasks::{BallBalance, TaskConfig, VecTask};
//!
//! let config = TaskConfig::load("configs/ball_balance.json".as_ref())?;
//! let task = BallBalance::new(&config, "assets", 0);
//! let mut vec_task = VecTask::new(config.clone(), task, CpuSim::new(config.sim_params()))?;
//! let obs = vec_task.reset();
//! let out = vec_task.step(&vec![0.0; vec_task.num_envs() * vec_task.num_actions()])?;
//! ```

pub mod ball_balance;
pub mod config;
pub mod error;
pub mod vec_task;

pub use ball_balance::BallBalance;
pub use config::{EnvConfig, SimConfig, TaskConfig};
pub use error::{Result, TaskError};
pub use vec_task::{EpisodeBuffers, StateLayout, StepOutput, Task, VecTask};
