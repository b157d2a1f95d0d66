use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeError {
    #[error("Unknown node id: {0}")]
    UnknownNode(usize),

    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    #[error("Invalid stage count: {0}")]
    InvalidStageCount(String),

    #[error("Batch needs at least one tree")]
    EmptyBatch,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SpeResult<T> = Result<T, SpeError>;
