use super::fallback::FallbackOrchestrator;
use crate::domain::article::{Article, Narration};
use crate::domain::language::LanguageCode;
use crate::domain::provider::{ProviderError, ProviderId};
use crate::infrastructure::repositories::RemoteCredentialStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum LanguageState {
    Idle,
    Loading,
    Ready(Vec<Article>),
    Failed(String),
}

/// Loading state per language, owned by one coordinator
#[derive(Debug, Clone, Default, Serialize)]
pub struct LanguageStateTable {
    states: HashMap<LanguageCode, LanguageState>,
}

impl LanguageStateTable {
    fn reset(&mut self, languages: &[LanguageCode]) {
        self.states = languages
            .iter()
            .map(|language| (*language, LanguageState::Idle))
            .collect();
    }

    fn apply(&mut self, language: LanguageCode, kind: &PreloadEventKind) {
        let state = match kind {
            PreloadEventKind::Started => LanguageState::Loading,
            PreloadEventKind::Succeeded(articles) => LanguageState::Ready(articles.clone()),
            PreloadEventKind::Failed(reason) => LanguageState::Failed(reason.clone()),
        };
        self.states.insert(language, state);
    }

    pub fn get(&self, language: LanguageCode) -> Option<&LanguageState> {
        self.states.get(&language)
    }

    pub fn is_ready(&self, language: LanguageCode) -> bool {
        matches!(self.get(language), Some(LanguageState::Ready(_)))
    }

    /// Articles of one ready language
    pub fn articles(&self, language: LanguageCode) -> &[Article] {
        match self.get(language) {
            Some(LanguageState::Ready(articles)) => articles,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LanguageCode, &LanguageState)> {
        self.states.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum PreloadEventKind {
    Started,
    Succeeded(Vec<Article>),
    Failed(String),
}

/// Transition for one language, tagged with the cycle that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreloadEvent {
    pub cycle: u64,
    pub language: LanguageCode,
    pub kind: PreloadEventKind,
}

#[derive(Debug, Clone)]
pub struct PreloadOptions {
    pub languages: Vec<LanguageCode>,
    /// Pause between two languages
    pub delay: Duration,
    pub general_article_count: usize,
}

impl Default for PreloadOptions {
    fn default() -> Self {
        Self {
            languages: LanguageCode::ALL[..8].to_vec(),
            delay: Duration::from_millis(1500),
            general_article_count: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreloadReport {
    /// Cycle the report describes (the last one, after restarts)
    pub cycle: u64,
    pub ready: Vec<LanguageCode>,
    pub failed: Vec<(LanguageCode, String)>,
    /// Restarts triggered by refreshed remote credentials
    pub restarts: usize,
    /// Another cycle took over before this one finished
    pub superseded: bool,
}

enum CycleOutcome {
    Completed,
    Restart,
    Superseded,
}

enum LoadError {
    Provider(ProviderError),
    Superseded,
}

impl From<ProviderError> for LoadError {
    fn from(err: ProviderError) -> Self {
        LoadError::Provider(err)
    }
}

enum Recovery {
    Adopted,
    Unchanged,
}

/// Fetches and narrates content for every language, one language at a time
pub struct PreloadCoordinator {
    orchestrator: Arc<FallbackOrchestrator>,
    remote: Arc<dyn RemoteCredentialStore>,
    options: PreloadOptions,
    cycle: AtomicU64,
    table: RwLock<LanguageStateTable>,
    events: broadcast::Sender<PreloadEvent>,
}

impl PreloadCoordinator {
    pub fn new(
        orchestrator: Arc<FallbackOrchestrator>,
        remote: Arc<dyn RemoteCredentialStore>,
        options: PreloadOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            orchestrator,
            remote,
            options,
            cycle: AtomicU64::new(0),
            table: RwLock::new(LanguageStateTable::default()),
            events,
        }
    }

    pub fn current_cycle(&self) -> u64 {
        self.cycle.load(Ordering::SeqCst)
    }

    /// Start a new cycle id. Any in-flight cycle stops at its next await
    /// point and its late events are discarded.
    pub fn supersede(&self) -> u64 {
        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(cycle, "Preload cycle superseded");
        cycle
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreloadEvent> {
        self.events.subscribe()
    }

    pub async fn states(&self) -> LanguageStateTable {
        self.table.read().await.clone()
    }

    /// Apply an event if it belongs to the current cycle
    pub async fn apply(&self, event: PreloadEvent) -> bool {
        let mut table = self.table.write().await;
        if event.cycle != self.current_cycle() {
            tracing::debug!(
                cycle = event.cycle,
                current = self.current_cycle(),
                language = %event.language,
                "Discarding stale preload event"
            );
            return false;
        }

        table.apply(event.language, &event.kind);
        drop(table);

        // Nobody listening is fine
        let _ = self.events.send(event);
        true
    }

    /// Run a full preload, restarting once per fresh remote credential set
    pub async fn run_cycle(&self) -> PreloadReport {
        let mut attempted: HashSet<(ProviderId, String)> = HashSet::new();
        let mut restarts = 0;

        loop {
            let cycle = self.begin_cycle().await;

            let settings = self.orchestrator.settings().await;
            let credentials = self.orchestrator.resolve_credentials(&settings);
            if let Some(key) = credentials.get(settings.primary) {
                attempted.insert((settings.primary, key.to_string()));
            }

            tracing::info!(
                cycle,
                primary = %settings.primary,
                languages = self.options.languages.len(),
                "Preload cycle started"
            );

            match self.load_all(cycle, &mut attempted).await {
                CycleOutcome::Restart => {
                    restarts += 1;
                    tracing::info!(cycle, restarts, "Restarting preload with refreshed credentials");
                    continue;
                }
                CycleOutcome::Completed => {
                    let report = self.report(cycle, restarts, false).await;
                    tracing::info!(
                        cycle,
                        ready = report.ready.len(),
                        failed = report.failed.len(),
                        restarts,
                        "Preload cycle finished"
                    );
                    return report;
                }
                CycleOutcome::Superseded => {
                    tracing::info!(cycle, "Preload cycle abandoned, a newer cycle took over");
                    return self.report(cycle, restarts, true).await;
                }
            }
        }
    }

    async fn begin_cycle(&self) -> u64 {
        let mut table = self.table.write().await;
        let cycle = self.supersede();
        // Partial results of an aborted cycle are discarded
        table.reset(&self.options.languages);
        cycle
    }

    fn is_stale(&self, cycle: u64) -> bool {
        self.current_cycle() != cycle
    }

    async fn load_all(
        &self,
        cycle: u64,
        attempted: &mut HashSet<(ProviderId, String)>,
    ) -> CycleOutcome {
        for (index, language) in self.options.languages.iter().copied().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.options.delay).await;
            }
            if self.is_stale(cycle) {
                return CycleOutcome::Superseded;
            }

            self.apply(PreloadEvent {
                cycle,
                language,
                kind: PreloadEventKind::Started,
            })
            .await;

            let kind = match self.load_language(cycle, language).await {
                Ok(articles) => {
                    tracing::info!(cycle, language = %language, articles = articles.len(), "Language ready");
                    PreloadEventKind::Succeeded(articles)
                }
                Err(LoadError::Superseded) => return CycleOutcome::Superseded,
                Err(LoadError::Provider(err)) if err.is_quota() => {
                    match self.recover(&err, attempted).await {
                        Recovery::Adopted => return CycleOutcome::Restart,
                        Recovery::Unchanged => {
                            tracing::warn!(cycle, language = %language, error = %err, "Language not ready");
                            PreloadEventKind::Failed(err.to_string())
                        }
                    }
                }
                Err(LoadError::Provider(err)) => {
                    tracing::warn!(cycle, language = %language, error = %err, "Language not ready");
                    PreloadEventKind::Failed(err.to_string())
                }
            };

            if !self.apply(PreloadEvent { cycle, language, kind }).await {
                return CycleOutcome::Superseded;
            }
        }

        CycleOutcome::Completed
    }

    /// News then general articles, each narrated before the next request
    async fn load_language(
        &self,
        cycle: u64,
        language: LanguageCode,
    ) -> Result<Vec<Article>, LoadError> {
        let news = self.orchestrator.fetch_news_article(language).await?;
        self.ensure_current(cycle)?;

        let article = Article::new(news.title, news.content, language).with_source_url(news.source_url);
        let mut articles = vec![match news.audio_url {
            Some(url) => article.with_narration(Narration::Stream { url }),
            None => self.narrate(cycle, article).await?,
        }];

        let general = self.orchestrator.fetch_general_articles(language).await?;
        self.ensure_current(cycle)?;

        for piece in general.into_iter().take(self.options.general_article_count) {
            let article = Article::new(piece.title, piece.content, language);
            articles.push(self.narrate(cycle, article).await?);
        }

        Ok(articles)
    }

    /// Attach synthesized narration. Only quota failures abort the language.
    async fn narrate(&self, cycle: u64, article: Article) -> Result<Article, LoadError> {
        let result = self
            .orchestrator
            .synthesize_speech(&article.body, article.language)
            .await;
        self.ensure_current(cycle)?;

        match result {
            Ok(speech) => Ok(article.with_narration(Narration::Inline(speech.audio))),
            Err(err) if err.is_quota() => Err(err.into()),
            Err(err) => {
                tracing::warn!(
                    language = %article.language,
                    title = %article.title,
                    error = %err,
                    "Narration failed, keeping article without audio"
                );
                Ok(article)
            }
        }
    }

    fn ensure_current(&self, cycle: u64) -> Result<(), LoadError> {
        if self.is_stale(cycle) {
            Err(LoadError::Superseded)
        } else {
            Ok(())
        }
    }

    /// Pull remote credentials after a quota failure. Adopted only when
    /// the primary key differs from every key already tried.
    async fn recover(
        &self,
        err: &ProviderError,
        attempted: &mut HashSet<(ProviderId, String)>,
    ) -> Recovery {
        tracing::warn!(error = %err, "Quota exhausted during preload, checking remote credentials");

        let rows = match self.remote.fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Remote credentials unavailable");
                return Recovery::Unchanged;
            }
        };
        if rows.is_empty() {
            tracing::warn!("No remote credentials configured");
            return Recovery::Unchanged;
        }

        let current = self.orchestrator.settings().await;
        let merged = current.merge_remote(&rows);
        let credentials = self.orchestrator.resolve_credentials(&merged);

        let Some(key) = credentials.get(merged.primary) else {
            tracing::warn!(primary = %merged.primary, "Remote credentials carry no key for the primary");
            return Recovery::Unchanged;
        };

        if !attempted.insert((merged.primary, key.to_string())) {
            tracing::warn!(primary = %merged.primary, "Remote credentials unchanged, giving up on this language");
            return Recovery::Unchanged;
        }

        self.orchestrator.update_settings(merged).await;
        Recovery::Adopted
    }

    async fn report(&self, cycle: u64, restarts: usize, superseded: bool) -> PreloadReport {
        let table = self.table.read().await;
        let mut report = PreloadReport {
            cycle,
            restarts,
            superseded,
            ..Default::default()
        };

        for language in &self.options.languages {
            match table.get(*language) {
                Some(LanguageState::Ready(_)) => report.ready.push(*language),
                Some(LanguageState::Failed(reason)) => report.failed.push((*language, reason.clone())),
                _ => {}
            }
        }

        report
    }
}
