//! Batched simulation state.
//!
//! [`SimState`] is the host-side copy of the engine's root-state, DOF-state
//! and force-sensor tensors for every env. A backend fills it in
//! [`PhysicsBackend::refresh`](crate::PhysicsBackend::refresh) and reads
//! from it on indexed writes; tasks never touch engine memory directly.

use crate::types::{DofState, ForceSensorReading, RootState};

#[derive(Clone, Debug, PartialEq)]
pub struct SimState {
    num_envs: usize,
    actors_per_env: usize,
    dofs_per_env: usize,
    sensors_per_env: usize,
    /// `[env, actor]`
    pub root_states: Vec<RootState>,
    /// `[env, dof]`
    pub dof_states: Vec<DofState>,
    /// `[env, sensor]`
    pub sensors: Vec<ForceSensorReading>,
}

impl SimState {
    #[must_use]
    pub fn new(num_envs: usize, actors_per_env: usize, dofs_per_env: usize, sensors_per_env: usize) -> Self {
        Self {
            num_envs,
            actors_per_env,
            dofs_per_env,
            sensors_per_env,
            root_states: vec![RootState::default(); num_envs * actors_per_env],
            dof_states: vec![DofState::default(); num_envs * dofs_per_env],
            sensors: vec![ForceSensorReading::default(); num_envs * sensors_per_env],
        }
    }

    #[must_use]
    pub const fn num_envs(&self) -> usize {
        self.num_envs
    }

    #[must_use]
    pub const fn actors_per_env(&self) -> usize {
        self.actors_per_env
    }

    #[must_use]
    pub const fn dofs_per_env(&self) -> usize {
        self.dofs_per_env
    }

    #[must_use]
    pub const fn sensors_per_env(&self) -> usize {
        self.sensors_per_env
    }

    /// Flat actor index used by indexed root-state writes.
    #[must_use]
    pub fn actor_index(&self, env: usize, slot: usize) -> u32 {
        u32::try_from(env * self.actors_per_env + slot).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn root(&self, env: usize, slot: usize) -> &RootState {
        &self.root_states[env * self.actors_per_env + slot]
    }

    pub fn root_mut(&mut self, env: usize, slot: usize) -> &mut RootState {
        &mut self.root_states[env * self.actors_per_env + slot]
    }

    #[must_use]
    pub fn env_roots(&self, env: usize) -> &[RootState] {
        let start = env * self.actors_per_env;
        &self.root_states[start..start + self.actors_per_env]
    }

    #[must_use]
    pub fn dof(&self, env: usize, dof: usize) -> &DofState {
        &self.dof_states[env * self.dofs_per_env + dof]
    }

    pub fn dof_mut(&mut self, env: usize, dof: usize) -> &mut DofState {
        &mut self.dof_states[env * self.dofs_per_env + dof]
    }

    #[must_use]
    pub fn env_dofs(&self, env: usize) -> &[DofState] {
        let start = env * self.dofs_per_env;
        &self.dof_states[start..start + self.dofs_per_env]
    }

    #[must_use]
    pub fn sensor(&self, env: usize, sensor: usize) -> &ForceSensorReading {
        &self.sensors[env * self.sensors_per_env + sensor]
    }

    pub fn sensor_mut(&mut self, env: usize, sensor: usize) -> &mut ForceSensorReading {
        &mut self.sensors[env * self.sensors_per_env + sensor]
    }

    /// Copy one env's roots and DOFs from `other`, which must share the layout.
    pub fn copy_env_from(&mut self, other: &SimState, env: usize) {
        let roots = env * self.actors_per_env..(env + 1) * self.actors_per_env;
        self.root_states[roots.clone()].copy_from_slice(&other.root_states[roots]);
        let dofs = env * self.dofs_per_env..(env + 1) * self.dofs_per_env;
        self.dof_states[dofs.clone()].copy_from_slice(&other.dof_states[dofs]);
    }

    /// Root states as a flat `[env * actor * 13]` tensor.
    #[must_use]
    pub fn root_tensor(&self) -> &[f32] {
        bytemuck::cast_slice(&self.root_states)
    }

    /// DOF states as a flat `[env * dof * 2]` tensor.
    #[must_use]
    pub fn dof_tensor(&self) -> &[f32] {
        bytemuck::cast_slice(&self.dof_states)
    }

    /// Sensor readings as a flat `[env * sensor * 6]` tensor.
    #[must_use]
    pub fn sensor_tensor(&self) -> &[f32] {
        bytemuck::cast_slice(&self.sensors)
    }
}
