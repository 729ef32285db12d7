use crate::{
    domain::{
        alignment::{segment, RawSentence, SentenceSpan, Timeline},
        article::{Article, Narration},
        playback::{
            decode_narration_async, AudioDevice, ClockSnapshot, DecodedAudio, LoopRange,
            PlaybackBackend, PlaybackError, PlaybackSession, PlaybackState, SyncClock,
        },
    },
    error::{AppError, AppResult},
    infrastructure::repositories::LibraryRepository,
};
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

/// What the view renders after an article is opened
#[derive(Debug, Clone, Serialize)]
pub struct ReaderView {
    pub article_id: Uuid,
    pub title: String,
    pub has_narration: bool,
    /// Visible sentences. Times stay at zero until the duration is known.
    pub sentences: Vec<SentenceSpan>,
}

struct OpenArticle {
    article: Article,
    sentences: Vec<RawSentence>,
    playback: Option<Playback>,
}

struct Playback {
    session: Arc<Mutex<PlaybackSession>>,
    clock: SyncClock,
}

/// Drives the article view: segmentation, playback and highlighting for
/// the one article on screen
pub struct ArticleReaderController {
    device: Arc<dyn AudioDevice>,
    library: Arc<LibraryRepository>,
    decode_cache: Option<Cache<Uuid, Arc<DecodedAudio>>>,
    current: Mutex<Option<OpenArticle>>,
}

impl ArticleReaderController {
    pub fn new(
        device: Arc<dyn AudioDevice>,
        library: Arc<LibraryRepository>,
        decode_cache_enabled: bool,
    ) -> Self {
        let decode_cache = if decode_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(16)
                    .time_to_idle(Duration::from_secs(30 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            device,
            library,
            decode_cache,
            current: Mutex::new(None),
        }
    }

    /// Show an article. The previous article's playback is torn down first.
    pub async fn open(&self, article: Article) -> AppResult<ReaderView> {
        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            teardown(previous).await;
        }

        let sentences = segment(&article.body, article.language.display_name());
        tracing::info!(
            article_id = %article.id,
            language = %article.language,
            sentences = sentences.len(),
            narration = ?article.narration.as_ref().map(Narration::is_inline),
            "Opening article"
        );

        let playback = match &article.narration {
            Some(narration) => {
                let backend = self.build_backend(article.id, narration).await?;
                let session = Arc::new(Mutex::new(PlaybackSession::new(
                    article.id,
                    sentences.clone(),
                    backend,
                )));
                let clock = SyncClock::spawn(session.clone());
                Some(Playback { session, clock })
            }
            None => None,
        };

        self.library.append_history(&article).await;

        let opened = OpenArticle {
            article,
            sentences,
            playback,
        };
        let view = ReaderView {
            article_id: opened.article.id,
            title: opened.article.title.clone(),
            has_narration: opened.playback.is_some(),
            sentences: visible_sentences(&opened).await,
        };
        *current = Some(opened);

        Ok(view)
    }

    async fn build_backend(&self, article_id: Uuid, narration: &Narration) -> AppResult<PlaybackBackend> {
        match narration {
            Narration::Stream { url } => Ok(PlaybackBackend::streamed(
                self.device.create_media_element(),
                url.clone(),
            )),
            Narration::Inline(audio) => {
                let buffer = match &self.decode_cache {
                    Some(cache) => cache
                        .try_get_with(article_id, async {
                            decode_narration_async(audio.clone()).await.map(Arc::new)
                        })
                        .await
                        .map_err(|e| (*e).clone())?,
                    None => Arc::new(decode_narration_async(audio.clone()).await?),
                };
                Ok(PlaybackBackend::buffered(self.device.create_output(), buffer))
            }
        }
    }

    /// Pause if playing, otherwise resume from the current position
    pub async fn toggle_play(&self) -> AppResult<PlaybackState> {
        self.with_session(|session| {
            let backend = session.backend_mut();
            if backend.is_playing() {
                backend.stop();
            } else {
                let state = backend.state();
                backend.play(state.position, state.loop_range)?;
            }
            Ok(backend.state())
        })
        .await
    }

    /// Play from the start of a sentence, leaving any loop
    pub async fn play_sentence(&self, id: usize) -> AppResult<PlaybackState> {
        self.with_session(|session| {
            let start = sentence(session, id)?.start_time;
            session.backend_mut().play(start, None)?;
            Ok(session.backend().state())
        })
        .await
    }

    /// Repeat one sentence until the loop is cleared
    pub async fn loop_sentence(&self, id: usize) -> AppResult<PlaybackState> {
        self.with_session(|session| {
            let span = sentence(session, id)?;
            let range = LoopRange::new(span.start_time, span.end_time).ok_or_else(|| {
                AppError::BadRequest(format!("sentence {} has an empty time range", id))
            })?;
            session.backend_mut().play(range.start, Some(range))?;
            Ok(session.backend().state())
        })
        .await
    }

    pub async fn seek(&self, position: f64) -> AppResult<PlaybackState> {
        if !position.is_finite() {
            return Err(AppError::BadRequest("seek position must be a number".to_string()));
        }
        self.with_session(|session| {
            session.backend_mut().seek(position);
            Ok(session.backend().state())
        })
        .await
    }

    pub async fn set_volume(&self, volume: f32) -> AppResult<PlaybackState> {
        self.with_session(|session| {
            session.backend_mut().set_volume(volume);
            Ok(session.backend().state())
        })
        .await
    }

    pub async fn clear_loop(&self) -> AppResult<PlaybackState> {
        self.with_session(|session| {
            session.backend_mut().clear_loop();
            Ok(session.backend().state())
        })
        .await
    }

    /// Visible sentences of the open article
    pub async fn sentences(&self) -> AppResult<Vec<SentenceSpan>> {
        let current = self.current.lock().await;
        let opened = current
            .as_ref()
            .ok_or_else(|| AppError::NotFound("no article is open".to_string()))?;
        Ok(visible_sentences(opened).await)
    }

    /// Fresh clock reading, including the active sentence
    pub async fn snapshot(&self) -> AppResult<ClockSnapshot> {
        self.with_session(|session| Ok(session.tick())).await
    }

    /// Per-frame updates published by the clock
    pub async fn subscribe(&self) -> AppResult<watch::Receiver<ClockSnapshot>> {
        let current = self.current.lock().await;
        current
            .as_ref()
            .and_then(|opened| opened.playback.as_ref())
            .map(|playback| playback.clock.subscribe())
            .ok_or_else(|| AppError::Playback(PlaybackError::NoNarration))
    }

    pub async fn current_article(&self) -> Option<Article> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|opened| opened.article.clone())
    }

    /// Release playback resources of the open article
    pub async fn close(&self) {
        if let Some(previous) = self.current.lock().await.take() {
            teardown(previous).await;
        }
    }

    async fn with_session<T>(
        &self,
        command: impl FnOnce(&mut PlaybackSession) -> AppResult<T>,
    ) -> AppResult<T> {
        let current = self.current.lock().await;
        let opened = current
            .as_ref()
            .ok_or_else(|| AppError::NotFound("no article is open".to_string()))?;
        let playback = opened
            .playback
            .as_ref()
            .ok_or(AppError::Playback(PlaybackError::NoNarration))?;

        let mut session = playback.session.lock().await;
        command(&mut session)
    }
}

fn sentence(session: &PlaybackSession, id: usize) -> AppResult<SentenceSpan> {
    let timeline = session.timeline().ok_or_else(|| {
        AppError::BadRequest("narration duration is not known yet".to_string())
    })?;
    timeline
        .get(id)
        .filter(|span| !span.is_whitespace)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("sentence {}", id)))
}

async fn visible_sentences(opened: &OpenArticle) -> Vec<SentenceSpan> {
    if let Some(playback) = &opened.playback {
        if let Some(timeline) = playback.session.lock().await.timeline() {
            return timeline.visible().cloned().collect();
        }
    }
    Timeline::map(&opened.sentences, 0.0).visible().cloned().collect()
}

async fn teardown(opened: OpenArticle) {
    if let Some(playback) = opened.playback {
        playback.clock.stop();
        playback.session.lock().await.teardown();
        tracing::debug!(article_id = %opened.article.id, "Playback torn down");
    }
}
