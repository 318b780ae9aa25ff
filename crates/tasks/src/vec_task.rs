//! Vectorized task harness.
//!
//! [`VecTask`] owns the backend, the batched [`SimState`] snapshot and the
//! per-env episode buffers, and drives a [`Task`] through the fixed step
//! order: clip actions, `pre_physics_step`, simulate, `post_physics_step`,
//! clip observations.

use physics::{PhysicsBackend, SimState};

use crate::config::TaskConfig;
use crate::error::{Result, TaskError};

/// Per-env slot counts of the state tensors a task needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateLayout {
    pub actors_per_env: usize,
    pub dofs_per_env: usize,
    pub sensors_per_env: usize,
}

/// Episode bookkeeping for every env, flat `[env, ...]` buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeBuffers {
    num_envs: usize,
    pub obs_buf: Vec<f32>,
    pub rew_buf: Vec<f32>,
    /// Nonzero means the env restarts at the next `pre_physics_step`.
    pub reset_buf: Vec<u8>,
    pub progress_buf: Vec<u32>,
}

impl EpisodeBuffers {
    #[must_use]
    pub fn new(num_envs: usize, num_obs: usize) -> Self {
        Self {
            num_envs,
            obs_buf: vec![0.0; num_envs * num_obs],
            rew_buf: vec![0.0; num_envs],
            reset_buf: vec![0; num_envs],
            progress_buf: vec![0; num_envs],
        }
    }

    #[must_use]
    pub const fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Indices of envs flagged for reset, ascending.
    #[must_use]
    pub fn reset_env_ids(&self) -> Vec<usize> {
        self.reset_buf.iter().enumerate().filter(|(_, &flag)| flag != 0).map(|(env, _)| env).collect()
    }
}

/// A task plugged into [`VecTask`].
///
/// Methods are generic over the backend so a task is written once against
/// [`PhysicsBackend`] and runs on any implementation.
pub trait Task {
    fn num_observations(&self) -> usize;

    fn num_actions(&self) -> usize;

    fn state_layout(&self) -> StateLayout;

    /// Load assets and populate `num_envs` envs, including any ground plane.
    ///
    /// # Errors
    ///
    /// Propagates asset and backend failures.
    fn create_envs<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        num_envs: usize,
        spacing: f32,
        num_per_row: usize,
    ) -> Result<()>;

    /// Called once after the sim is prepared with the first refreshed
    /// snapshot. Records initial states and fills the first observations.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn initial_observations<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        state: &SimState,
        buffers: &mut EpisodeBuffers,
    ) -> Result<()>;

    /// Apply resets and actions before the physics step.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn pre_physics_step<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        state: &mut SimState,
        buffers: &mut EpisodeBuffers,
        actions: &[f32],
    ) -> Result<()>;

    /// Refresh state and compute observations, rewards and resets.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn post_physics_step<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        state: &mut SimState,
        buffers: &mut EpisodeBuffers,
    ) -> Result<()>;
}

/// What one [`VecTask::step`] hands back, all `[env, ...]`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutput {
    /// Clipped to `±clipObservations`.
    pub observations: Vec<f32>,
    pub rewards: Vec<f32>,
    pub resets: Vec<u8>,
}

pub struct VecTask<T, B> {
    config: TaskConfig,
    task: T,
    sim: B,
    state: SimState,
    buffers: EpisodeBuffers,
    actions: Vec<f32>,
}

impl<T: Task, B: PhysicsBackend> VecTask<T, B> {
    /// Build the scene and take the first snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid config or any setup failure of the
    /// task or backend.
    pub fn new(config: TaskConfig, mut task: T, mut sim: B) -> Result<Self> {
        config.validate()?;
        let num_envs = config.env.num_envs;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let num_per_row = (num_envs as f64).sqrt() as usize;

        task.create_envs(&mut sim, num_envs, config.env.env_spacing, num_per_row)?;
        sim.prepare()?;

        let layout = task.state_layout();
        let mut state = SimState::new(num_envs, layout.actors_per_env, layout.dofs_per_env, layout.sensors_per_env);
        sim.refresh(&mut state)?;

        let mut buffers = EpisodeBuffers::new(num_envs, task.num_observations());
        task.initial_observations(&mut sim, &state, &mut buffers)?;
        let actions = vec![0.0; num_envs * task.num_actions()];

        tracing::info!(
            "{}: {} envs, {} observations, {} actions",
            config.name,
            num_envs,
            task.num_observations(),
            task.num_actions()
        );
        Ok(Self { config, task, sim, state, buffers, actions })
    }

    /// Current observations, clipped.
    #[must_use]
    pub fn reset(&self) -> Vec<f32> {
        self.clipped_observations()
    }

    /// Advance every env by one control step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::ShapeMismatch`] unless `actions` holds
    /// `num_envs * num_actions` values, or propagates a backend failure.
    pub fn step(&mut self, actions: &[f32]) -> Result<StepOutput> {
        if actions.len() != self.actions.len() {
            return Err(TaskError::ShapeMismatch(format!(
                "expected {} actions, got {}",
                self.actions.len(),
                actions.len()
            )));
        }
        let clip = self.config.env.clip_actions;
        for (dst, &src) in self.actions.iter_mut().zip(actions) {
            *dst = src.clamp(-clip, clip);
        }

        self.task.pre_physics_step(&mut self.sim, &mut self.state, &mut self.buffers, &self.actions)?;
        self.sim.simulate()?;
        self.task.post_physics_step(&mut self.sim, &mut self.state, &mut self.buffers)?;

        Ok(StepOutput {
            observations: self.clipped_observations(),
            rewards: self.buffers.rew_buf.clone(),
            resets: self.buffers.reset_buf.clone(),
        })
    }

    fn clipped_observations(&self) -> Vec<f32> {
        let clip = self.config.env.clip_observations;
        self.buffers.obs_buf.iter().map(|v| v.clamp(-clip, clip)).collect()
    }

    #[must_use]
    pub const fn num_envs(&self) -> usize {
        self.buffers.num_envs()
    }

    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.task.num_observations()
    }

    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.task.num_actions()
    }

    #[must_use]
    pub const fn task(&self) -> &T {
        &self.task
    }

    #[must_use]
    pub const fn sim(&self) -> &B {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut B {
        &mut self.sim
    }

    #[must_use]
    pub const fn state(&self) -> &SimState {
        &self.state
    }

    #[must_use]
    pub const fn buffers(&self) -> &EpisodeBuffers {
        &self.buffers
    }

    /// Mutable access to the episode buffers, e.g. to force resets.
    pub fn buffers_mut(&mut self) -> &mut EpisodeBuffers {
        &mut self.buffers
    }
}
