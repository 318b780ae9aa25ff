//! Rollout loop behind the `balance` binary.

use anyhow::{Context, Result};
use physics::CpuSim;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tasks::{BallBalance, TaskConfig, VecTask};

use crate::{Args, Policy};

/// Totals over the whole rollout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RolloutStats {
    pub steps: u64,
    pub resets: u64,
    pub mean_reward: f32,
}

/// # Errors
///
/// Fails when the config cannot be loaded or the task cannot be built or
/// stepped.
pub fn run(args: &Args) -> Result<RolloutStats> {
    let mut config = match &args.config {
        Some(path) => TaskConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => TaskConfig::default(),
    };
    if let Some(num_envs) = args.num_envs {
        config.env.num_envs = num_envs;
    }
    let asset_dir = args.asset_dir.clone().unwrap_or_else(|| std::env::temp_dir().join("ball_balance_assets"));

    tracing::info!("Initializing {} with {} envs...", config.name, config.env.num_envs);
    let sim = CpuSim::new(config.sim_params());
    let task = BallBalance::new(&config, asset_dir, args.seed);
    let mut vec_task = VecTask::new(config, task, sim).context("building ball balance task")?;

    let num_envs = vec_task.num_envs();
    let mut actions = vec![0.0_f32; num_envs * vec_task.num_actions()];
    let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(1));
    let log_every = args.log_every.max(1);

    let mut stats = RolloutStats::default();
    let mut reward_sum = 0.0_f64;
    let mut window_reward = 0.0_f64;
    let mut window_resets = 0_u64;

    tracing::info!("Starting rollout for {} steps with {:?} policy...", args.steps, args.policy);
    for i in 0..args.steps {
        if args.policy == Policy::Random {
            for action in &mut actions {
                *action = rng.gen_range(-1.0..=1.0);
            }
        }
        let out = vec_task.step(&actions).with_context(|| format!("step {i}"))?;

        let step_reward: f64 = out.rewards.iter().map(|&r| f64::from(r)).sum();
        let step_resets = out.resets.iter().filter(|&&flag| flag != 0).count() as u64;
        reward_sum += step_reward;
        window_reward += step_reward;
        window_resets += step_resets;
        stats.resets += step_resets;
        stats.steps += 1;

        if (i + 1) % log_every == 0 {
            #[allow(clippy::cast_precision_loss)]
            let mean = window_reward / (log_every as f64 * num_envs as f64);
            tracing::info!("Step {} complete. Mean reward: {:.4}, resets: {}", i + 1, mean, window_resets);
            window_reward = 0.0;
            window_resets = 0;
        }
    }

    if stats.steps > 0 {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        {
            stats.mean_reward = (reward_sum / (stats.steps as f64 * num_envs as f64)) as f32;
        }
    }
    tracing::info!(
        "Rollout finished after {} steps. Mean reward: {:.4}, total resets: {}",
        stats.steps,
        stats.mean_reward,
        stats.resets
    );
    Ok(stats)
}
