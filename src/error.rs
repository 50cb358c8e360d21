use thiserror::Error;

pub type Result<T> = std::result::Result<T, QaFlowError>;

#[derive(Debug, Error)]
pub enum QaFlowError {
    #[error("unknown node `{0}` in flow")]
    UnknownNode(String),
    #[error("node `{node}` from subgraph `{incoming}` collides with subgraph `{existing}`")]
    NodeCollision {
        node: String,
        existing: String,
        incoming: String,
    },
    #[error("invalid transition from `{from}` to `{to}`")]
    InvalidTransition { from: String, to: String },
    #[error("session has not been started")]
    NotStarted,
    #[error("flow graph has no `start` node")]
    MissingStart,
    #[error("node `{0}` cannot reach `start`")]
    StartUnreachable(String),
    #[error("node `{0}` has no file upload surface")]
    NoUploadSurface(String),
    #[error("no uploaded file at index {0}")]
    FileIndex(usize),
    #[error("failed to read file `{name}`")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("maximum auto transitions {0} exceeded")]
    MaxIterationsExceeded(u32),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
