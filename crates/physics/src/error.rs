use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("asset description error: {0}")]
    Asset(#[from] mjcf::MjcfError),
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown asset handle {0}")]
    UnknownAsset(usize),
    #[error("unknown env handle {0}")]
    UnknownEnv(usize),
    #[error("unknown actor {actor} in env {env}")]
    UnknownActor { env: usize, actor: usize },
    #[error("tensor shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("simulation has not been prepared; call prepare() after creating actors")]
    NotPrepared,
    #[error("actors can not be added after prepare()")]
    AlreadyPrepared,
}
