use thiserror::Error;

pub type MemberResult<T> = Result<T, MemberError>;

#[derive(Error, Debug)]
pub enum MemberError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Member store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
