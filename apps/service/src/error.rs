use thiserror::Error;
use uuid::Uuid;

/// Input validation failures surfaced to the caller at registration time.
///
/// No state is mutated when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("input string cannot be empty")]
    Empty,
    #[error("input string cannot be longer than {max} characters")]
    TooLong { max: usize },
    #[error("input string can only contain ASCII")]
    NonAscii,
    #[error("URL must begin with http:// or https://")]
    UnsupportedScheme,
    #[error("invalid URL: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("no such target: {0}")]
    NotFound(Uuid),
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }
}
