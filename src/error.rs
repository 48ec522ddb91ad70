// Error types for diddit

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("task not found: {0}")]
    NotFound(Uuid),

    #[error("validation failed: {0}")]
    Validation(String),

    /// A stored entry exists but cannot be decoded. Callers decide whether
    /// to mask this with a default or surface it.
    #[error("corrupt entry '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Validation("duplicate task id".to_string());
        assert_eq!(err.to_string(), "validation failed: duplicate task id");

        let err = Error::Corrupt {
            key: "tasks".to_string(),
            reason: "expected value".to_string(),
        };
        assert_eq!(err.to_string(), "corrupt entry 'tasks': expected value");
    }
}
