use super::error::VocabularyServiceError;
use super::model::VocabularyItem;
use super::review::{due_items, review, ReviewOutcome};
use crate::domain::language::LanguageCode;
use crate::domain::orchestrator::FallbackOrchestrator;
use crate::infrastructure::repositories::LibraryRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct VocabularyService {
    orchestrator: Arc<FallbackOrchestrator>,
    library: Arc<LibraryRepository>,
    /// Serialises load-modify-save of the vocabulary blob
    write_lock: Mutex<()>,
}

impl VocabularyService {
    pub fn new(orchestrator: Arc<FallbackOrchestrator>, library: Arc<LibraryRepository>) -> Self {
        Self {
            orchestrator,
            library,
            write_lock: Mutex::new(()),
        }
    }

    /// Define a word and save it. A word already in the list is returned as is.
    pub async fn lookup(
        &self,
        word: &str,
        language: LanguageCode,
        context: &str,
    ) -> Result<VocabularyItem, VocabularyServiceError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(VocabularyServiceError::Invalid("empty word".to_string()));
        }

        if let Some(existing) = self
            .library
            .load_vocabulary()
            .await
            .into_iter()
            .find(|item| item.matches(word, language))
        {
            tracing::debug!(word, language = %language, "Word already saved");
            return Ok(existing);
        }

        tracing::info!(word, language = %language, "Looking up word");

        let (definition, pronunciation) = tokio::join!(
            self.orchestrator.analyze_word(word, language, context),
            self.orchestrator.synthesize_speech(word, language),
        );

        let mut definition = definition?;
        if definition.word.trim().is_empty() {
            definition.word = word.to_string();
        }
        let pronunciation = match pronunciation {
            Ok(speech) => Some(speech.audio),
            Err(e) => {
                tracing::warn!(word, language = %language, error = %e, "Pronunciation unavailable");
                None
            }
        };

        let item = VocabularyItem::from_definition(definition, language, pronunciation, Utc::now());

        let _guard = self.write_lock.lock().await;
        let mut items = self.library.load_vocabulary().await;
        if let Some(existing) = items.iter().find(|existing| existing.matches(word, language)) {
            return Ok(existing.clone());
        }
        items.push(item.clone());
        self.library.save_vocabulary(&items).await;

        Ok(item)
    }

    pub async fn review(
        &self,
        id: Uuid,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<VocabularyItem, VocabularyServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.library.load_vocabulary().await;

        let slot = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(VocabularyServiceError::NotFound(id))?;
        *slot = review(slot, outcome, now);
        let updated = slot.clone();

        self.library.save_vocabulary(&items).await;
        tracing::info!(word = %updated.word, stage = updated.stage, outcome = ?outcome, "Word reviewed");
        Ok(updated)
    }

    pub async fn due(&self, now: DateTime<Utc>) -> Vec<VocabularyItem> {
        due_items(&self.library.load_vocabulary().await, now)
    }

    pub async fn all(&self) -> Vec<VocabularyItem> {
        self.library.load_vocabulary().await
    }
}
