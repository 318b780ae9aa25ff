//! Reward and termination, evaluated for all envs at once.

/// Height above the ground the ball should hover at.
pub const TARGET_HEIGHT: f32 = 0.7;

/// Batched inputs, one entry per env.
#[derive(Clone, Copy, Debug)]
pub struct RewardInputs<'a> {
    pub ball_positions: &'a [[f32; 3]],
    pub ball_velocities: &'a [[f32; 3]],
    pub progress: &'a [u32],
    pub ball_radius: f32,
    pub max_episode_length: u32,
}

/// `reward = 1/(1+dist) * 1/(1+speed)` where `dist` is measured from
/// `(0, 0, 0.7)`. Sets the reset flag on timeout or when the ball drops below
/// `1.5 * ball_radius`; otherwise the existing flag is kept.
///
/// # Panics
///
/// Panics if the slices disagree in length.
pub fn compute_bot_reward(inputs: &RewardInputs<'_>, rewards: &mut [f32], resets: &mut [u8]) {
    let n = rewards.len();
    assert!(
        inputs.ball_positions.len() == n
            && inputs.ball_velocities.len() == n
            && inputs.progress.len() == n
            && resets.len() == n,
        "reward inputs must all have one entry per env"
    );

    let envs = inputs.ball_positions.iter().zip(inputs.ball_velocities).zip(inputs.progress);
    for (((pos, vel), &progress), (reward, reset)) in envs.zip(rewards.iter_mut().zip(resets.iter_mut())) {
        let [x, y, z] = *pos;
        let [vx, vy, vz] = *vel;
        let ball_dist = (x * x + (z - TARGET_HEIGHT) * (z - TARGET_HEIGHT) + y * y).sqrt();
        let ball_speed = (vx * vx + vy * vy + vz * vz).sqrt();
        let pos_reward = 1.0 / (1.0 + ball_dist);
        let speed_reward = 1.0 / (1.0 + ball_speed);
        *reward = pos_reward * speed_reward;

        let timed_out = progress.saturating_add(1) >= inputs.max_episode_length;
        let fell = z < inputs.ball_radius * 1.5;
        if timed_out || fell {
            *reset = 1;
        }
    }
}
