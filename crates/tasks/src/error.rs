use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Physics(#[from] physics::PhysicsError),
    #[error(transparent)]
    Asset(#[from] mjcf::MjcfError),
    #[error("failed to parse task config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid task config: {0}")]
    InvalidConfig(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("rigid body {0} not found")]
    MissingBody(String),
    #[error("task used before its envs were created")]
    NotCreated,
}

pub type Result<T> = std::result::Result<T, TaskError>;
