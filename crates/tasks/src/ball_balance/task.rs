use std::path::PathBuf;

use glam::Vec3;
use physics::{PhysicsBackend, SimState};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::asset::BotGeometry;
use super::joints::Leg;
use super::observations::compute_observations;
use super::populate::{populate, Population};
use super::reset::{reset_idx, ResetRanges};
use super::reward::{compute_bot_reward, RewardInputs};
use super::{ACTORS_PER_ENV, BALL_RADIUS, BALL_SLOT, DOFS_PER_ENV, NUM_ACTIONS, NUM_OBSERVATIONS, SENSORS_PER_ENV};
use crate::config::{EnvConfig, TaskConfig};
use crate::error::{Result, TaskError};
use crate::vec_task::{EpisodeBuffers, StateLayout, Task};

const AXES_SCALE: f32 = 0.2;

pub struct BallBalance {
    env: EnvConfig,
    asset_dir: PathBuf,
    geometry: BotGeometry,
    ranges: ResetRanges,
    rng: StdRng,
    dt: f32,
    population: Option<Population>,
    initial: Option<SimState>,
    dof_targets: Vec<f32>,
    ball_positions: Vec<[f32; 3]>,
    ball_velocities: Vec<[f32; 3]>,
}

impl BallBalance {
    /// The bot asset is written to `asset_dir` when envs are created. `seed`
    /// drives every reset sample.
    #[must_use]
    pub fn new(config: &TaskConfig, asset_dir: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            env: config.env.clone(),
            asset_dir: asset_dir.into(),
            geometry: BotGeometry::default(),
            ranges: ResetRanges::default(),
            rng: StdRng::seed_from_u64(seed),
            dt: config.sim.dt,
            population: None,
            initial: None,
            dof_targets: Vec::new(),
            ball_positions: Vec::new(),
            ball_velocities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reset_ranges(mut self, ranges: ResetRanges) -> Self {
        self.ranges = ranges;
        self
    }

    #[must_use]
    pub const fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Integrated joint targets, `[env, dof]`.
    #[must_use]
    pub fn dof_position_targets(&self) -> &[f32] {
        &self.dof_targets
    }

    fn draw_leg_frames<B: PhysicsBackend>(&self, sim: &mut B) {
        let Some(population) = &self.population else {
            return;
        };
        sim.clear_lines();
        for actors in &population.envs {
            for &body in &actors.upper_legs {
                if let Some(pose) = sim.rigid_transform(actors.env, body) {
                    sim.draw_axes(actors.env, &pose, AXES_SCALE);
                }
            }
        }
    }
}

impl Task for BallBalance {
    fn num_observations(&self) -> usize {
        NUM_OBSERVATIONS
    }

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn state_layout(&self) -> StateLayout {
        StateLayout { actors_per_env: ACTORS_PER_ENV, dofs_per_env: DOFS_PER_ENV, sensors_per_env: SENSORS_PER_ENV }
    }

    fn create_envs<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        num_envs: usize,
        spacing: f32,
        num_per_row: usize,
    ) -> Result<()> {
        self.dt = sim.params().dt;
        sim.add_ground(Vec3::Z);
        let population = populate(sim, &self.asset_dir, &self.geometry, num_envs, spacing, num_per_row)?;
        self.population = Some(population);
        Ok(())
    }

    fn initial_observations<B: PhysicsBackend>(
        &mut self,
        _sim: &mut B,
        state: &SimState,
        buffers: &mut EpisodeBuffers,
    ) -> Result<()> {
        self.initial = Some(state.clone());
        self.dof_targets = vec![0.0; state.num_envs() * DOFS_PER_ENV];
        compute_observations(state, &mut buffers.obs_buf);
        Ok(())
    }

    fn pre_physics_step<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        state: &mut SimState,
        buffers: &mut EpisodeBuffers,
        actions: &[f32],
    ) -> Result<()> {
        let population = self.population.as_ref().ok_or(TaskError::NotCreated)?;
        let initial = self.initial.as_ref().ok_or(TaskError::NotCreated)?;
        if actions.len() != state.num_envs() * NUM_ACTIONS {
            return Err(TaskError::ShapeMismatch(format!(
                "expected {} actions, got {}",
                state.num_envs() * NUM_ACTIONS,
                actions.len()
            )));
        }

        let reset_ids = buffers.reset_env_ids();
        reset_idx(sim, state, initial, &reset_ids, &self.ranges, &mut self.rng, buffers)?;

        let scale = self.dt * self.env.action_speed_scale;
        for (targets, actions) in self.dof_targets.chunks_exact_mut(DOFS_PER_ENV).zip(actions.chunks_exact(NUM_ACTIONS)) {
            for (leg, &action) in Leg::ALL.iter().zip(actions) {
                targets[leg.actuated_dof()] += scale * action;
            }
            for (target, &(lower, upper)) in targets.iter_mut().zip(&population.dof_limits) {
                *target = target.max(lower).min(upper);
            }
        }
        // restarted envs begin from a neutral pose
        for &env in &reset_ids {
            self.dof_targets[env * DOFS_PER_ENV..(env + 1) * DOFS_PER_ENV].fill(0.0);
        }

        sim.set_dof_position_targets(&self.dof_targets)?;
        Ok(())
    }

    fn post_physics_step<B: PhysicsBackend>(
        &mut self,
        sim: &mut B,
        state: &mut SimState,
        buffers: &mut EpisodeBuffers,
    ) -> Result<()> {
        for progress in &mut buffers.progress_buf {
            *progress = progress.saturating_add(1);
        }
        sim.refresh(state)?;

        compute_observations(state, &mut buffers.obs_buf);

        self.ball_positions.clear();
        self.ball_velocities.clear();
        for env in 0..state.num_envs() {
            let ball = state.root(env, BALL_SLOT);
            self.ball_positions.push(ball.pos);
            self.ball_velocities.push(ball.lin_vel);
        }
        let inputs = RewardInputs {
            ball_positions: &self.ball_positions,
            ball_velocities: &self.ball_velocities,
            progress: &buffers.progress_buf,
            ball_radius: BALL_RADIUS,
            max_episode_length: self.env.max_episode_length,
        };
        compute_bot_reward(&inputs, &mut buffers.rew_buf, &mut buffers.reset_buf);

        if self.env.enable_debug_vis && sim.has_viewer() {
            self.draw_leg_frames(sim);
        }
        Ok(())
    }
}
