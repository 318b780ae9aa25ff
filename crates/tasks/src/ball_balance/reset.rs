//! Episode restarts for a subset of envs.

use std::f32::consts::PI;

use physics::{PhysicsBackend, RootState, SimState};
use rand::Rng;

use super::{BALL_SLOT, BOT_SLOT};
use crate::error::Result;
use crate::vec_task::EpisodeBuffers;

/// Sampling bounds for the ball's restart state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResetRanges {
    pub min_dist: f32,
    pub max_dist: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Horizontal speed toward the tray center, scaled by how far out the
    /// ball starts.
    pub min_speed_xy: f32,
    pub max_speed_xy: f32,
    /// Downward speed.
    pub vertical_speed: f32,
}

impl Default for ResetRanges {
    fn default() -> Self {
        Self {
            min_dist: 0.001,
            max_dist: 0.5,
            min_height: 1.0,
            max_height: 2.0,
            min_speed_xy: 0.0,
            max_speed_xy: 0.0,
            vertical_speed: 5.0,
        }
    }
}

/// Uniform in `[lo, hi)`, or exactly `lo` when the range is empty.
fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.gen::<f32>()
}

impl ResetRanges {
    /// Ball root state for one restart.
    #[must_use]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> RootState {
        let dist = uniform(rng, self.min_dist, self.max_dist);
        let (sin, cos) = uniform(rng, -PI, PI).sin_cos();
        let height = uniform(rng, self.min_height, self.max_height);

        let span = self.max_dist - self.min_dist;
        let speed_scale = if span > 0.0 { (dist - self.min_dist) / span } else { 0.0 };
        let speed_xy = uniform(rng, self.min_speed_xy, self.max_speed_xy);
        let vel_scale = -speed_scale * speed_xy;

        RootState {
            pos: [dist * cos, dist * sin, height],
            rot: RootState::IDENTITY_ROT,
            lin_vel: [vel_scale * cos, vel_scale * sin, -self.vertical_speed],
            ang_vel: [0.0; 3],
        }
    }
}

/// Restart `env_ids`: restore their initial roots and DOFs from `initial`,
/// place a freshly sampled ball, push the listed actors to the backend and
/// clear their episode counters. Other envs are not touched.
///
/// # Errors
///
/// Propagates failures of the indexed state writes.
pub fn reset_idx<B: PhysicsBackend, R: Rng>(
    sim: &mut B,
    state: &mut SimState,
    initial: &SimState,
    env_ids: &[usize],
    ranges: &ResetRanges,
    rng: &mut R,
    buffers: &mut EpisodeBuffers,
) -> Result<()> {
    if env_ids.is_empty() {
        return Ok(());
    }
    let mut actor_indices = Vec::with_capacity(env_ids.len() * state.actors_per_env());
    let mut bot_indices = Vec::with_capacity(env_ids.len());
    for &env in env_ids {
        state.copy_env_from(initial, env);
        *state.root_mut(env, BALL_SLOT) = ranges.sample(rng);
        actor_indices.extend((0..state.actors_per_env()).map(|slot| state.actor_index(env, slot)));
        bot_indices.push(state.actor_index(env, BOT_SLOT));
    }

    sim.set_actor_root_state_indexed(state, &actor_indices)?;
    sim.set_dof_state_indexed(state, &bot_indices)?;

    for &env in env_ids {
        buffers.reset_buf[env] = 0;
        buffers.progress_buf[env] = 0;
    }
    tracing::debug!("reset {} envs", env_ids.len());
    Ok(())
}
