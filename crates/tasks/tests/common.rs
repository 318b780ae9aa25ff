#![allow(dead_code)]

use std::path::PathBuf;

use physics::{CpuSim, SimParams};
use tasks::{BallBalance, TaskConfig, VecTask};

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tasks-tests-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn small_config(num_envs: usize) -> TaskConfig {
    let mut config = TaskConfig::default();
    config.env.num_envs = num_envs;
    config
}

pub fn ball_balance(name: &str, config: &TaskConfig, sim: CpuSim) -> VecTask<BallBalance, CpuSim> {
    let task = BallBalance::new(config, scratch_dir(name), 42);
    VecTask::new(config.clone(), task, sim).unwrap()
}

pub fn headless(name: &str, config: &TaskConfig) -> VecTask<BallBalance, CpuSim> {
    ball_balance(name, config, CpuSim::new(config.sim_params()))
}

pub fn with_viewer(name: &str, config: &TaskConfig) -> VecTask<BallBalance, CpuSim> {
    ball_balance(name, config, CpuSim::with_viewer(config.sim_params()))
}

pub fn default_params() -> SimParams {
    TaskConfig::default().sim_params()
}
