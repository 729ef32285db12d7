use super::deepseek::DeepSeekHandler;
use super::gemini::GeminiHandler;
use super::openai::OpenAiHandler;
use super::openai_compat::build_client;
use crate::domain::provider::{
    Credentials, HandlerFactory, ProviderError, ProviderHandler, ProviderId,
};
use crate::infrastructure::config::ProviderEndpoints;
use std::sync::Arc;

/// Builds the concrete handlers from configured endpoints
pub struct DefaultHandlerFactory {
    endpoints: ProviderEndpoints,
    http: reqwest::Client,
    general_article_count: usize,
}

impl DefaultHandlerFactory {
    pub fn new(endpoints: ProviderEndpoints, general_article_count: usize) -> Self {
        Self {
            endpoints,
            http: reqwest::Client::new(),
            general_article_count,
        }
    }

    fn gemini(&self, api_key: &str) -> GeminiHandler {
        GeminiHandler::new(
            self.http.clone(),
            self.endpoints.gemini_base_url.clone(),
            api_key.to_string(),
            self.endpoints.gemini_text_model.clone(),
            self.endpoints.gemini_tts_model.clone(),
            self.endpoints.gemini_voice.clone(),
        )
        .with_general_article_count(self.general_article_count)
    }

    fn openai(&self, api_key: &str) -> OpenAiHandler {
        OpenAiHandler::new(
            build_client(&self.endpoints.openai_base_url, api_key),
            self.endpoints.openai_text_model.clone(),
            self.endpoints.openai_tts_model.clone(),
            self.endpoints.openai_voice.clone(),
        )
        .with_general_article_count(self.general_article_count)
    }

    /// First sibling with native speech, Gemini preferred
    fn speech_sibling(&self, credentials: &Credentials) -> Option<Arc<dyn ProviderHandler>> {
        if let Some(key) = credentials.get(ProviderId::Gemini) {
            return Some(Arc::new(self.gemini(key)));
        }
        if let Some(key) = credentials.get(ProviderId::OpenAi) {
            return Some(Arc::new(self.openai(key)));
        }
        None
    }
}

impl HandlerFactory for DefaultHandlerFactory {
    fn create(
        &self,
        provider: ProviderId,
        credentials: &Credentials,
    ) -> Result<Arc<dyn ProviderHandler>, ProviderError> {
        let api_key = credentials
            .get(provider)
            .ok_or(ProviderError::MissingCredential(provider))?;

        let handler: Arc<dyn ProviderHandler> = match provider {
            ProviderId::Gemini => Arc::new(self.gemini(api_key)),
            ProviderId::OpenAi => Arc::new(self.openai(api_key)),
            ProviderId::DeepSeek => Arc::new(
                DeepSeekHandler::new(
                    build_client(&self.endpoints.deepseek_base_url, api_key),
                    self.endpoints.deepseek_model.clone(),
                )
                .with_speech_delegate(self.speech_sibling(credentials))
                .with_general_article_count(self.general_article_count),
            ),
        };

        Ok(handler)
    }
}
