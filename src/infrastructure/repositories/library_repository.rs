use super::blob_store::{BlobStore, StorageError};
use crate::domain::article::Article;
use crate::domain::provider::ApiSettings;
use crate::domain::vocabulary::VocabularyItem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub const HISTORY_KEY: &str = "reader.history";
pub const VOCABULARY_KEY: &str = "reader.vocabulary";
pub const SETTINGS_KEY: &str = "reader.settings";

/// Most recent articles kept in the reading history
pub const HISTORY_LIMIT: usize = 50;

/// Reading history, vocabulary and settings as three independent blobs.
///
/// Writes never fail the caller; a failed write is logged and dropped.
/// Missing or unreadable blobs load as defaults.
pub struct LibraryRepository {
    store: Arc<dyn BlobStore>,
}

impl LibraryRepository {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Newest first
    pub async fn load_history(&self) -> Vec<Article> {
        self.load(HISTORY_KEY).await.unwrap_or_default()
    }

    /// Persist history without inline audio payloads
    pub async fn save_history(&self, articles: &[Article]) {
        let stripped: Vec<Article> = articles
            .iter()
            .take(HISTORY_LIMIT)
            .map(Article::without_inline_audio)
            .collect();
        self.save(HISTORY_KEY, &stripped).await;
    }

    /// Move an article to the front of the history
    pub async fn append_history(&self, article: &Article) {
        let mut history = self.load_history().await;
        history.retain(|existing| existing.id != article.id);
        history.insert(0, article.clone());
        self.save_history(&history).await;
    }

    pub async fn load_vocabulary(&self) -> Vec<VocabularyItem> {
        self.load(VOCABULARY_KEY).await.unwrap_or_default()
    }

    pub async fn save_vocabulary(&self, items: &[VocabularyItem]) {
        self.save(VOCABULARY_KEY, items).await;
    }

    pub async fn load_settings(&self) -> Option<ApiSettings> {
        self.load(SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &ApiSettings) {
        self.save(SETTINGS_KEY, settings).await;
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read blob");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable blob");
                None
            }
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = match serde_json::to_string(value) {
            Ok(raw) => {
                let size_bytes = raw.len();
                self.store
                    .put(key, raw)
                    .await
                    .map(|_| size_bytes)
            }
            Err(e) => Err(StorageError::from(e)),
        };

        match result {
            Ok(size_bytes) => tracing::debug!(key, size_bytes, "Blob saved"),
            Err(e) => tracing::error!(key, error = %e, "Failed to save blob"),
        }
    }
}
