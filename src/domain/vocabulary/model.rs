use crate::domain::article::InlineAudio;
use crate::domain::language::LanguageCode;
use crate::domain::provider::WordDefinition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: Uuid,
    pub word: String,
    pub language: LanguageCode,
    pub phonetic: String,
    pub guidance: String,
    pub examples: Vec<String>,
    pub definition_target: String,
    pub definition_native: String,
    /// Index into the review interval table
    pub stage: usize,
    pub next_review_at: DateTime<Utc>,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<InlineAudio>,
}

impl VocabularyItem {
    pub fn from_definition(
        definition: WordDefinition,
        language: LanguageCode,
        pronunciation: Option<InlineAudio>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            word: definition.word,
            language,
            phonetic: definition.phonetic,
            guidance: definition.guidance,
            examples: definition.examples,
            definition_target: definition.definition_target,
            definition_native: definition.definition_native,
            stage: 0,
            next_review_at: now + super::review::interval_for(0),
            last_reviewed_at: None,
            created_at: now,
            pronunciation,
        }
    }

    /// Same word in the same language, ignoring case
    pub fn matches(&self, word: &str, language: LanguageCode) -> bool {
        self.language == language && self.word.to_lowercase() == word.trim().to_lowercase()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}
