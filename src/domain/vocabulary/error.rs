use crate::domain::provider::ProviderError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum VocabularyServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("vocabulary item not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
