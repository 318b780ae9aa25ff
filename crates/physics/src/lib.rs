#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Physics boundary
//!
//! Everything a vectorized task needs from a physics engine, expressed as the
//! [`PhysicsBackend`] trait, plus [`CpuSim`], a small deterministic backend
//! that runs tasks headless.
//!
//! ## Key Components
//!
//! -   **State tensors:** [`RootState`], [`DofState`] and
//!     [`ForceSensorReading`] are `#[repr(C)]` plain-old-data records. A
//!     [`SimState`] holds one of each per actor, DOF and sensor for every env
//!     and exposes them as flat `f32` tensors.
//! -   **Scene setup:** assets, envs, actors, DOF drives, attractors and body
//!     colors are created through handles ([`AssetHandle`], [`EnvHandle`],
//!     [`ActorHandle`], [`RigidBodyHandle`]) before
//!     [`PhysicsBackend::prepare`].
//! -   **Stepping:** targets in, [`PhysicsBackend::simulate`], then
//!     [`PhysicsBackend::refresh`] into a [`SimState`]. Episode resets go
//!     through the indexed writes, which only touch the listed actors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use physics::{AssetOptions, CpuSim, PhysicsBackend, SimParams, SimState, Transform};
//!
//! let mut sim = CpuSim::new(SimParams::default());
//! sim.add_ground(glam::Vec3::Z);
//! let ball = sim.create_sphere(0.1, &AssetOptions::default());
//! let env = sim.create_env(glam::Vec3::splat(-1.0), glam::Vec3::splat(1.0), 1);
//! sim.create_actor(env, ball, Transform::from_translation(glam::Vec3::Z), "ball", 0, 0)?;
//! sim.prepare()?;
//!
//! let mut state = SimState::new(1, 1, 0, 0);
//! sim.simulate()?;
//! sim.refresh(&mut state)?;
//! ```

pub mod backend;
pub mod cpu;
pub mod error;
pub mod state;
pub mod transform;
pub mod types;

pub use backend::PhysicsBackend;
pub use cpu::{Attractor, CpuSim, DebugLine};
pub use error::PhysicsError;
pub use glam;
pub use state::SimState;
pub use transform::{quat_from_euler_zyx, Transform};
pub use types::{
    ActorHandle, AssetHandle, AssetOptions, AttractorAxes, AttractorProperties, Color, DofDriveMode,
    DofProperties, DofState, EnvHandle, ForceSensorReading, RigidBodyHandle, RootState, SimParams,
};
