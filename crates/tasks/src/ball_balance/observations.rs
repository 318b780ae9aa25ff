//! Observation layout, 24 floats per env:
//!
//! | range   | content                          |
//! |---------|----------------------------------|
//! | 0..3    | actuated joint positions         |
//! | 3..6    | actuated joint velocities        |
//! | 6..9    | ball position                    |
//! | 9..12   | ball linear velocity             |
//! | 12..15  | sensor 0 force                   |
//! | 15..18  | sensor 0 torque                  |
//! | 18..21  | sensor 1 torque                  |
//! | 21..24  | sensor 2 torque                  |
//!
//! Sensor readings are passed through raw; their scale depends on the ball
//! mass and the backend.

use std::ops::Range;

use physics::SimState;

use super::joints::Leg;
use super::{BALL_SLOT, NUM_OBSERVATIONS};

pub const ACTUATED_POS: Range<usize> = 0..3;
pub const ACTUATED_VEL: Range<usize> = 3..6;
pub const BALL_POS: Range<usize> = 6..9;
pub const BALL_LIN_VEL: Range<usize> = 9..12;
pub const SENSOR0_FORCE: Range<usize> = 12..15;
pub const SENSOR_TORQUES: [Range<usize>; Leg::COUNT] = [15..18, 18..21, 21..24];

/// Fill `obs` (`num_envs * 24`) from the snapshot.
///
/// # Panics
///
/// Panics if `obs` is not `state.num_envs() * 24` long.
pub fn compute_observations(state: &SimState, obs: &mut [f32]) {
    assert_eq!(obs.len(), state.num_envs() * NUM_OBSERVATIONS, "observation buffer size");
    for (env, row) in obs.chunks_exact_mut(NUM_OBSERVATIONS).enumerate() {
        for (k, leg) in Leg::ALL.iter().enumerate() {
            let dof = state.dof(env, leg.actuated_dof());
            row[ACTUATED_POS.start + k] = dof.pos;
            row[ACTUATED_VEL.start + k] = dof.vel;
        }

        let ball = state.root(env, BALL_SLOT);
        row[BALL_POS].copy_from_slice(&ball.pos);
        row[BALL_LIN_VEL].copy_from_slice(&ball.lin_vel);

        row[SENSOR0_FORCE].copy_from_slice(&state.sensor(env, 0).force);
        for (sensor, range) in SENSOR_TORQUES.iter().enumerate() {
            row[range.clone()].copy_from_slice(&state.sensor(env, sensor).torque);
        }
    }
}
