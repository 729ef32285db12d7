use crate::domain::article::{GeneralArticle, NewsArticle};
use crate::domain::language::LanguageCode;
use crate::domain::provider::{
    ApiSettings, Credentials, HandlerFactory, ProviderError, ProviderHandler, ProviderId,
    SpeechResult, WordDefinition,
};
use crate::infrastructure::repositories::LibraryRepository;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Runs every provider call against the primary handler and, on a quota or
/// credential failure, exactly once against the configured backup.
pub struct FallbackOrchestrator {
    factory: Arc<dyn HandlerFactory>,
    settings: RwLock<ApiSettings>,
    env_defaults: HashMap<ProviderId, String>,
    library: Option<Arc<LibraryRepository>>,
}

impl FallbackOrchestrator {
    pub fn new(
        factory: Arc<dyn HandlerFactory>,
        settings: ApiSettings,
        env_defaults: HashMap<ProviderId, String>,
    ) -> Self {
        Self {
            factory,
            settings: RwLock::new(settings),
            env_defaults,
            library: None,
        }
    }

    /// Persist settings changes through the library
    pub fn with_library(mut self, library: Arc<LibraryRepository>) -> Self {
        self.library = Some(library);
        self
    }

    pub async fn settings(&self) -> ApiSettings {
        self.settings.read().await.clone()
    }

    /// Adopt and persist new settings (explicit save or credential refresh)
    pub async fn update_settings(&self, settings: ApiSettings) {
        tracing::info!(
            primary = %settings.primary,
            backup = ?settings.backup,
            "Provider settings updated"
        );
        *self.settings.write().await = settings.clone();

        if let Some(library) = &self.library {
            library.save_settings(&settings).await;
        }
    }

    /// Keys resolved against user settings and environment defaults
    pub fn resolve_credentials(&self, settings: &ApiSettings) -> Credentials {
        Credentials::resolve(settings, &self.env_defaults)
    }

    pub async fn synthesize_speech(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<SpeechResult, ProviderError> {
        self.with_fallback("synthesize_speech", |handler| async move {
            handler.synthesize_speech(text, language).await
        })
        .await
    }

    pub async fn analyze_word(
        &self,
        word: &str,
        language: LanguageCode,
        context: &str,
    ) -> Result<WordDefinition, ProviderError> {
        self.with_fallback("analyze_word", |handler| async move {
            handler.analyze_word(word, language, context).await
        })
        .await
    }

    pub async fn fetch_news_article(
        &self,
        language: LanguageCode,
    ) -> Result<NewsArticle, ProviderError> {
        self.with_fallback("fetch_news_article", |handler| async move {
            handler.fetch_news_article(language).await
        })
        .await
    }

    pub async fn fetch_general_articles(
        &self,
        language: LanguageCode,
    ) -> Result<Vec<GeneralArticle>, ProviderError> {
        self.with_fallback("fetch_general_articles", |handler| async move {
            handler.fetch_general_articles(language).await
        })
        .await
    }

    async fn with_fallback<T, F, Fut>(
        &self,
        operation: &'static str,
        call: F,
    ) -> Result<T, ProviderError>
    where
        F: Fn(Arc<dyn ProviderHandler>) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let settings = self.settings().await;
        let credentials = self.resolve_credentials(&settings);

        let primary_result = match self.factory.create(settings.primary, &credentials) {
            Ok(handler) => call(handler).await,
            Err(e) => Err(e),
        };

        let primary_err = match primary_result {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !primary_err.warrants_fallback() {
            tracing::error!(
                operation,
                provider = %settings.primary,
                error = %primary_err,
                "Provider call failed"
            );
            return Err(primary_err);
        }

        let Some(backup) = settings
            .effective_backup()
            .filter(|backup| credentials.has(*backup))
        else {
            tracing::error!(
                operation,
                provider = %settings.primary,
                error = %primary_err,
                "Provider call failed and no usable backup is configured"
            );
            return Err(primary_err);
        };

        tracing::warn!(
            operation,
            primary = %settings.primary,
            backup = %backup,
            error = %primary_err,
            "Primary provider failed, retrying with backup"
        );

        // Backup failures propagate as they are
        let handler = self.factory.create(backup, &credentials)?;
        call(handler).await
    }
}
