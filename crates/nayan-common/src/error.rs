use thiserror::Error;

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The page lost its connection to the extension host (e.g. after a reload).
    #[error("Extension context invalidated")]
    ContextInvalidated,

    #[error("Unexpected value under key {key}: expected {expected}")]
    UnexpectedValue { key: String, expected: &'static str },
}

impl StoreError {
    pub fn is_context_invalidated(&self) -> bool {
        matches!(self, StoreError::ContextInvalidated)
    }
}
