#![deny(clippy::all, clippy::pedantic)]
//! # Ball balance runtime
//!
//! Headless rollout driver. Builds the vectorized ball balance task on the
//! CPU backend, drives it with a fixed policy and logs episode statistics.
//!
//! ```text
//! balance --config configs/ball_balance.json --num-envs 64 --steps 1000 --policy random
//! ```

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

/// Action source for the rollout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Hold every joint target still.
    Zero,
    /// Uniform actions in `[-1, 1]`.
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "balance", about = "Roll out the ball balance task headless")]
pub struct Args {
    /// Task config JSON. Defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides `env.numEnvs` from the config.
    #[arg(long)]
    pub num_envs: Option<usize>,

    #[arg(long, default_value_t = 1000)]
    pub steps: u64,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Where the generated bot asset is written.
    #[arg(long)]
    pub asset_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Policy::Zero)]
    pub policy: Policy,

    /// Log statistics every this many steps.
    #[arg(long, default_value_t = 100)]
    pub log_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let stats = app::run(&Args::parse())?;
    if stats.steps == 0 {
        tracing::warn!("No steps were run.");
    }
    Ok(())
}
