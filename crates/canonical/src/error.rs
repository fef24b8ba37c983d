use thiserror::Error;

/// Errors that can occur while tokenizing with a custom configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
