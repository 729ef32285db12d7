use super::openai_compat::JsonChat;
use super::payload;
use crate::domain::article::{GeneralArticle, NewsArticle};
use crate::domain::language::LanguageCode;
use crate::domain::provider::{
    prompts, ProviderError, ProviderHandler, ProviderId, SpeechResult, WordDefinition,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::sync::Arc;

/// DeepSeek through its OpenAI-compatible endpoint. It has neither search
/// nor speech; speech goes to a sibling built from the same credentials.
pub struct DeepSeekHandler {
    chat: JsonChat,
    speech_delegate: Option<Arc<dyn ProviderHandler>>,
    general_article_count: usize,
}

impl DeepSeekHandler {
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self {
            chat: JsonChat::new(client, model, ProviderId::DeepSeek),
            speech_delegate: None,
            general_article_count: 2,
        }
    }

    pub fn with_speech_delegate(mut self, delegate: Option<Arc<dyn ProviderHandler>>) -> Self {
        self.speech_delegate = delegate;
        self
    }

    pub fn with_general_article_count(mut self, count: usize) -> Self {
        self.general_article_count = count;
        self
    }
}

#[async_trait]
impl ProviderHandler for DeepSeekHandler {
    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
    }

    fn supports_speech(&self) -> bool {
        self.speech_delegate.is_some()
    }

    async fn synthesize_speech(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<SpeechResult, ProviderError> {
        match &self.speech_delegate {
            Some(delegate) => {
                tracing::debug!(delegate = %delegate.id(), "DeepSeek delegating speech");
                delegate.synthesize_speech(text, language).await
            }
            None => Err(ProviderError::Unsupported(
                "deepseek has no speech synthesis and no gemini or openai key is configured"
                    .to_string(),
            )),
        }
    }

    async fn analyze_word(
        &self,
        word: &str,
        language: LanguageCode,
        context: &str,
    ) -> Result<WordDefinition, ProviderError> {
        let raw = self
            .chat
            .complete(prompts::word_analysis(word, language, context))
            .await?;
        payload::word_definition(&raw, word)
    }

    async fn fetch_news_article(&self, language: LanguageCode) -> Result<NewsArticle, ProviderError> {
        tracing::info!(provider = "deepseek", language = %language, "Fetching news article without search");
        let raw = self.chat.complete(prompts::news_article(language, false)).await?;
        payload::news_article(&raw)
    }

    async fn fetch_general_articles(
        &self,
        language: LanguageCode,
    ) -> Result<Vec<GeneralArticle>, ProviderError> {
        let raw = self
            .chat
            .complete(prompts::general_articles(language, self.general_article_count))
            .await?;
        payload::general_articles(&raw)
    }
}
