//! Task configuration.
//!
//! Loaded from JSON with the same camelCase keys the task YAML files use, so
//! an existing `env`/`sim` section can be converted without renaming. Missing
//! keys fall back to the ball balance defaults.

use std::path::Path;

use physics::glam::Vec3;
use physics::SimParams;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskConfig {
    pub name: String,
    pub env: EnvConfig,
    pub sim: SimConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvConfig {
    pub num_envs: usize,
    pub env_spacing: f32,
    pub max_episode_length: u32,
    pub action_speed_scale: f32,
    pub enable_debug_vis: bool,
    pub clip_observations: f32,
    pub clip_actions: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    pub dt: f32,
    pub substeps: u32,
    pub gravity: [f32; 3],
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self { name: "BallBalance".to_string(), env: EnvConfig::default(), sim: SimConfig::default() }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            num_envs: 4096,
            env_spacing: 2.0,
            max_episode_length: 500,
            action_speed_scale: 20.0,
            enable_debug_vis: false,
            clip_observations: 5.0,
            clip_actions: 1.0,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { dt: 0.01, substeps: 1, gravity: [0.0, 0.0, -9.81] }
    }
}

impl TaskConfig {
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail
    /// [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file can not be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| TaskError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// # Errors
    ///
    /// Returns [`TaskError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(TaskError::InvalidConfig(msg.to_string()));
        if self.env.num_envs == 0 {
            return invalid("numEnvs must be positive");
        }
        if self.env.max_episode_length == 0 {
            return invalid("maxEpisodeLength must be positive");
        }
        if !positive(self.sim.dt) {
            return invalid("dt must be positive");
        }
        if !positive(self.env.clip_observations) || !positive(self.env.clip_actions) {
            return invalid("clip limits must be positive");
        }
        Ok(())
    }

    #[must_use]
    pub fn sim_params(&self) -> SimParams {
        SimParams { dt: self.sim.dt, substeps: self.sim.substeps.max(1), gravity: Vec3::from(self.sim.gravity) }
    }
}

/// False for NaN.
fn positive(value: f32) -> bool {
    value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = TaskConfig::from_json_str(r#"{"env": {"numEnvs": 16, "enableDebugVis": true}}"#).unwrap();
        assert_eq!(config.env.num_envs, 16);
        assert!(config.env.enable_debug_vis);
        assert_eq!(config.env.max_episode_length, 500);
        assert_eq!(config.env.action_speed_scale, 20.0);
        assert_eq!(config.sim.gravity, [0.0, 0.0, -9.81]);
        assert_eq!(config.name, "BallBalance");
    }

    #[test]
    fn zero_envs_is_rejected() {
        let err = TaskConfig::from_json_str(r#"{"env": {"numEnvs": 0}}"#).unwrap_err();
        assert!(matches!(err, TaskError::InvalidConfig(msg) if msg.contains("numEnvs")));
    }

    #[test]
    fn sim_params_follow_the_sim_section() {
        let config = TaskConfig::from_json_str(r#"{"sim": {"dt": 0.02, "substeps": 0}}"#).unwrap();
        let params = config.sim_params();
        assert_eq!(params.dt, 0.02);
        assert_eq!(params.substeps, 1);
        assert_eq!(params.gravity, Vec3::new(0.0, 0.0, -9.81));
    }
}
