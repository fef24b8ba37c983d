use thiserror::Error;

/// Errors surfaced by a knowledge base accessor.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The store could not serve the request (poisoned lock, remote down, ...).
    #[error("knowledge base unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    /// Reference data broke an ownership rule (dangling id, duplicate name, ...).
    #[error("dataset integrity violation: {0}")]
    Integrity(String),
}

impl KnowledgeError {
    pub fn unavailable<E: std::fmt::Display>(err: E) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn integrity<E: std::fmt::Display>(err: E) -> Self {
        Self::Integrity(err.to_string())
    }
}
