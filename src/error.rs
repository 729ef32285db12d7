use crate::domain::playback::PlaybackError;
use crate::domain::provider::ProviderError;
use crate::domain::vocabulary::VocabularyServiceError;
use crate::infrastructure::repositories::StorageError;
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Missing or rejected API key: {0}")]
    Credential(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure notice shown to the learner
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential(_) | ProviderError::Unauthorized(_) => {
                AppError::Credential(err.to_string())
            }
            ProviderError::Quota(msg) => AppError::RateLimitExceeded(msg),
            ProviderError::Transport(_)
            | ProviderError::InvalidResponse(_)
            | ProviderError::Unsupported(_) => AppError::ExternalService(err.to_string()),
        }
    }
}

impl From<VocabularyServiceError> for AppError {
    fn from(err: VocabularyServiceError) -> Self {
        match err {
            VocabularyServiceError::Invalid(msg) => AppError::BadRequest(msg),
            VocabularyServiceError::NotFound(id) => AppError::NotFound(format!("vocabulary item {}", id)),
            VocabularyServiceError::Provider(e) => AppError::from(e),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
