use std::fmt;

/// Failure reported by any backing store (entities, votes, results).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    LockPoisoned(&'static str),
    Serde(String),
    NotFound { collection: &'static str, id: String },
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StorageError::Serde(message) => write!(f, "store serialization error: {}", message),
            StorageError::NotFound { collection, id } => {
                write!(f, "not found in {}: {}", collection, id)
            }
            StorageError::Backend(message) => write!(f, "store backend error: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<bitcode::Error> for StorageError {
    fn from(err: bitcode::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}
