use thiserror::Error;

/// Errors surfaced by the controllability models
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// `calculate` was called before a graph was attached
    #[error("no graph attached to the controllability model")]
    NoGraphAttached,

    /// The model does not support the requested operation in its current configuration
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, ControlError>;
