use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tasks::ball_balance::{compute_bot_reward, RewardInputs, BALL_RADIUS};

const MAX_LEN: u32 = 500;

fn run(positions: &[[f32; 3]], velocities: &[[f32; 3]], progress: &[u32], flags: &[u8]) -> (Vec<f32>, Vec<u8>) {
    let mut rewards = vec![0.0; positions.len()];
    let mut resets = flags.to_vec();
    let inputs = RewardInputs {
        ball_positions: positions,
        ball_velocities: velocities,
        progress,
        ball_radius: BALL_RADIUS,
        max_episode_length: MAX_LEN,
    };
    compute_bot_reward(&inputs, &mut rewards, &mut resets);
    (rewards, resets)
}

#[test]
fn reward_stays_in_the_unit_interval() {
    let mut rng = StdRng::seed_from_u64(3);
    let n = 2048;
    let positions: Vec<[f32; 3]> = (0..n).map(|_| [rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-1.0..4.0)]).collect();
    let velocities: Vec<[f32; 3]> = (0..n).map(|_| [rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)]).collect();
    let (rewards, _) = run(&positions, &velocities, &vec![0; n], &vec![0; n]);
    assert!(rewards.iter().all(|&r| r > 0.0 && r <= 1.0));
}

#[test]
fn ball_at_rest_on_target_scores_exactly_one() {
    let (rewards, resets) = run(&[[0.0, 0.0, 0.7]], &[[0.0; 3]], &[0], &[0]);
    assert_eq!(rewards[0], 1.0);
    assert_eq!(resets[0], 0);
}

#[test]
fn reward_approaches_one_near_the_target() {
    let far = run(&[[0.1, 0.0, 0.7]], &[[0.0, 0.0, 0.1]], &[0], &[0]).0[0];
    let near = run(&[[0.001, 0.0, 0.7]], &[[0.0, 0.0, 0.001]], &[0], &[0]).0[0];
    assert!(near > far);
    assert!(1.0 - near < 3e-3);
}

#[test]
fn timeout_forces_reset_wherever_the_ball_is() {
    let positions = [[0.0, 0.0, 0.7], [0.3, 0.2, 1.5], [0.0, 0.0, 0.7]];
    let velocities = [[0.0; 3]; 3];
    let progress = [MAX_LEN - 1, MAX_LEN - 1, MAX_LEN - 2];
    let (_, resets) = run(&positions, &velocities, &progress, &[0, 0, 0]);
    assert_eq!(resets, vec![1, 1, 0]);
}

#[test]
fn falling_ball_forces_reset_at_any_progress() {
    let positions = [[0.0, 0.0, 1.5 * BALL_RADIUS - 1e-4], [0.0, 0.0, 1.5 * BALL_RADIUS], [2.0, 0.0, 0.0]];
    let (_, resets) = run(&positions, &[[0.0; 3]; 3], &[0, 0, 10], &[0, 0, 0]);
    assert_eq!(resets, vec![1, 0, 1]);
}

#[test]
fn pending_flags_are_kept() {
    let (_, resets) = run(&[[0.0, 0.0, 0.7]; 2], &[[0.0; 3]; 2], &[1, 1], &[1, 0]);
    assert_eq!(resets, vec![1, 0]);
}

#[test]
fn reward_is_deterministic() {
    let positions = [[0.123, -0.456, 0.789]; 4];
    let velocities = [[1.5, -0.25, 3.0]; 4];
    let a = run(&positions, &velocities, &[0; 4], &[0; 4]);
    let b = run(&positions, &velocities, &[0; 4], &[0; 4]);
    assert_eq!(a.0.iter().map(|r| r.to_bits()).collect::<Vec<_>>(), b.0.iter().map(|r| r.to_bits()).collect::<Vec<_>>());
    assert!(a.0.windows(2).all(|w| w[0].to_bits() == w[1].to_bits()));
}
