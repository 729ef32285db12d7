use super::backend::PlaybackBackend;
use crate::domain::alignment::{RawSentence, Timeline};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Roughly one display frame
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// What the clock publishes every frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClockSnapshot {
    pub position: f64,
    pub duration: Option<f64>,
    pub playing: bool,
    pub looping: bool,
    /// Id of the sentence being spoken, if any
    pub active_sentence: Option<usize>,
}

/// The displayed article's backend plus its sentence timeline
pub struct PlaybackSession {
    article_id: Uuid,
    sentences: Vec<RawSentence>,
    timeline: Option<Timeline>,
    backend: PlaybackBackend,
}

impl PlaybackSession {
    pub fn new(article_id: Uuid, sentences: Vec<RawSentence>, backend: PlaybackBackend) -> Self {
        let mut session = Self {
            article_id,
            sentences,
            timeline: None,
            backend,
        };
        session.ensure_timeline();
        session
    }

    pub fn article_id(&self) -> Uuid {
        self.article_id
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn backend(&self) -> &PlaybackBackend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut PlaybackBackend {
        &mut self.backend
    }

    /// Build the timeline once the narration duration is known. Buffered
    /// audio knows it up front; a streamed source learns it from metadata.
    pub fn ensure_timeline(&mut self) -> bool {
        if self.timeline.is_some() {
            return true;
        }
        match self.backend.duration() {
            Some(duration) => {
                self.timeline = Some(Timeline::map(&self.sentences, duration));
                tracing::debug!(
                    article_id = %self.article_id,
                    duration_secs = duration,
                    sentences = self.sentences.len(),
                    "Sentence timeline mapped"
                );
                true
            }
            None => false,
        }
    }

    /// One clock frame: reconcile the backend, then resolve the active sentence
    pub fn tick(&mut self) -> ClockSnapshot {
        let position = self.backend.tick();
        self.ensure_timeline();

        let state = self.backend.state();
        let active_sentence = self
            .timeline
            .as_ref()
            .and_then(|timeline| timeline.active_at(position))
            .map(|span| span.id);

        ClockSnapshot {
            position,
            duration: state.duration,
            playing: state.playing,
            looping: state.loop_range.is_some(),
            active_sentence,
        }
    }

    pub fn teardown(&mut self) {
        self.backend.teardown();
    }
}

/// Frame-driven position tracker. Keeps ticking while paused (reads are
/// idempotent) and stops only on teardown.
pub struct SyncClock {
    handle: JoinHandle<()>,
    snapshots: watch::Receiver<ClockSnapshot>,
}

impl SyncClock {
    pub fn spawn(session: Arc<Mutex<PlaybackSession>>) -> Self {
        let (sender, snapshots) = watch::channel(ClockSnapshot::default());

        let handle = tokio::spawn(async move {
            let mut frames = tokio::time::interval(FRAME_INTERVAL);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                frames.tick().await;
                let snapshot = session.lock().await.tick();
                sender.send_if_modified(|current| {
                    if *current == snapshot {
                        false
                    } else {
                        *current = snapshot;
                        true
                    }
                });
            }
        });

        Self { handle, snapshots }
    }

    pub fn subscribe(&self) -> watch::Receiver<ClockSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> ClockSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SyncClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
