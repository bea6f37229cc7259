use fernweh_api::ApiError;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures surfaced by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// An insert collided with a unique field.
    #[error("{field} already exists")]
    Duplicate { field: &'static str },

    /// The backend itself failed.
    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl StorageError {
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::not_found("Resource not found"),
            StorageError::Duplicate { .. } => ApiError::conflict(err.to_string()),
            StorageError::Backend { .. } => ApiError::internal(err.to_string()),
        }
    }
}
