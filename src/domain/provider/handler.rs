use super::error::ProviderError;
use super::settings::{Credentials, ProviderId};
use crate::domain::article::{GeneralArticle, InlineAudio, NewsArticle};
use crate::domain::language::LanguageCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Narration produced by a speech model
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechResult {
    pub audio: InlineAudio,
}

/// Word analysis as normalized from any provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDefinition {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub guidance: String,
    #[serde(default)]
    pub examples: Vec<String>,
    /// Definition written in the word's own language
    #[serde(default)]
    pub definition_target: String,
    /// Definition written in the learner's language
    #[serde(default)]
    pub definition_native: String,
}

/// One AI backend. Only normalized shapes leave a handler.
#[async_trait]
pub trait ProviderHandler: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Whether speech can be produced, natively or through a sibling
    fn supports_speech(&self) -> bool;

    async fn synthesize_speech(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<SpeechResult, ProviderError>;

    async fn analyze_word(
        &self,
        word: &str,
        language: LanguageCode,
        context: &str,
    ) -> Result<WordDefinition, ProviderError>;

    async fn fetch_news_article(&self, language: LanguageCode)
        -> Result<NewsArticle, ProviderError>;

    async fn fetch_general_articles(
        &self,
        language: LanguageCode,
    ) -> Result<Vec<GeneralArticle>, ProviderError>;
}

/// Builds the handler for a provider from a resolved key set.
///
/// Fails with `MissingCredential` when no key resolves for `provider`.
pub trait HandlerFactory: Send + Sync {
    fn create(
        &self,
        provider: ProviderId,
        credentials: &Credentials,
    ) -> Result<Arc<dyn ProviderHandler>, ProviderError>;
}
