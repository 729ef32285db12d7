use crate::{
    domain::{
        language::LanguageCode,
        vocabulary::{ReviewOutcome, VocabularyItem, VocabularyService},
    },
    error::{AppError, AppResult},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct VocabularyController {
    vocabulary_service: Arc<VocabularyService>,
}

impl VocabularyController {
    pub fn new(vocabulary_service: Arc<VocabularyService>) -> Self {
        Self { vocabulary_service }
    }

    /// Double-click on a word: define it, pronounce it, save it
    pub async fn lookup(&self, word: &str, language: &str, context: &str) -> AppResult<VocabularyItem> {
        let language = LanguageCode::from_display_name(language)
            .ok_or_else(|| AppError::BadRequest(format!("unsupported language: {}", language)))?;

        if word.chars().count() > 64 {
            return Err(AppError::BadRequest("select a single word or short phrase".to_string()));
        }

        Ok(self.vocabulary_service.lookup(word, language, context).await?)
    }

    pub async fn review(&self, id: Uuid, outcome: ReviewOutcome) -> AppResult<VocabularyItem> {
        Ok(self.vocabulary_service.review(id, outcome, Utc::now()).await?)
    }

    /// Items due for review now
    pub async fn due(&self) -> Vec<VocabularyItem> {
        self.vocabulary_service.due(Utc::now()).await
    }
}
