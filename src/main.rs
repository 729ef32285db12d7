use anyhow::Context;
use polyglot_reader::domain::orchestrator::{FallbackOrchestrator, LanguageState, PreloadCoordinator};
use polyglot_reader::infrastructure::config::{Config, LogFormat};
use polyglot_reader::infrastructure::providers::DefaultHandlerFactory;
use polyglot_reader::infrastructure::repositories::{
    DisabledCredentialStore, FileBlobStore, LibraryRepository, RemoteCredentialStore,
    SupabaseCredentialStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        data_dir = %config.data_dir.display(),
        primary = %config.primary_provider,
        backup = ?config.backup_provider,
        "Starting polyglot reader"
    );

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Storage
    let library = Arc::new(LibraryRepository::new(Arc::new(FileBlobStore::new(
        config.data_dir.clone(),
    ))));

    // 2. Remote credential store, absent config means no remote config
    let remote: Arc<dyn RemoteCredentialStore> = match config.remote_config() {
        Some((url, key)) => {
            tracing::info!(app_id = %config.remote_config_app_id, "Remote credential store configured");
            Arc::new(SupabaseCredentialStore::new(
                url,
                key,
                config.remote_config_app_id.clone(),
            ))
        }
        None => Arc::new(DisabledCredentialStore),
    };

    // 3. Orchestrator, with saved settings taking precedence over config
    let settings = match library.load_settings().await {
        Some(settings) => settings,
        None => config.default_settings(),
    };
    let factory = Arc::new(DefaultHandlerFactory::new(
        config.endpoints.clone(),
        config.general_article_count,
    ));
    let orchestrator = Arc::new(
        FallbackOrchestrator::new(factory, settings, config.default_keys()).with_library(library.clone()),
    );

    // 4. Preload every language once
    let coordinator = PreloadCoordinator::new(orchestrator, remote, config.preload_options());
    let report = coordinator.run_cycle().await;
    let states = coordinator.states().await;

    for language in &config.preload_languages {
        match states.get(*language) {
            Some(LanguageState::Ready(articles)) => {
                tracing::info!(language = %language, articles = articles.len(), "Language ready");
                // Oldest first so the news piece ends up on top
                for article in articles.iter().rev() {
                    library.append_history(article).await;
                }
            }
            Some(LanguageState::Failed(reason)) => {
                tracing::warn!(language = %language, reason = %reason, "Language not ready");
            }
            _ => tracing::warn!(language = %language, "Language not loaded"),
        }
    }

    tracing::info!(
        cycle = report.cycle,
        ready = report.ready.len(),
        failed = report.failed.len(),
        restarts = report.restarts,
        "Preload complete"
    );

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "polyglot_reader=debug"
    } else {
        "polyglot_reader=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
