use super::buffered::BufferedEngine;
use super::decode::DecodedAudio;
use super::error::PlaybackError;
use super::native::{AudioOutput, MediaElement};
use super::state::{EngineKind, LoopRange, PlaybackState};
use super::streamed::StreamedEngine;
use std::sync::Arc;

/// The engine chosen for one article, behind a single contract
pub enum PlaybackBackend {
    Streamed(StreamedEngine),
    Buffered(BufferedEngine),
}

impl PlaybackBackend {
    pub fn streamed(element: Box<dyn MediaElement>, url: String) -> Self {
        PlaybackBackend::Streamed(StreamedEngine::new(element, url))
    }

    pub fn buffered(output: Box<dyn AudioOutput>, buffer: Arc<DecodedAudio>) -> Self {
        PlaybackBackend::Buffered(BufferedEngine::new(output, buffer))
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            PlaybackBackend::Streamed(_) => EngineKind::Streamed,
            PlaybackBackend::Buffered(_) => EngineKind::Buffered,
        }
    }

    /// Start at `offset`. With a loop range, offsets outside it start at
    /// the range start and playback repeats the range.
    pub fn play(&mut self, offset: f64, loop_range: Option<LoopRange>) -> Result<(), PlaybackError> {
        match self {
            PlaybackBackend::Streamed(engine) => engine.play(offset, loop_range),
            PlaybackBackend::Buffered(engine) => {
                engine.play(offset, loop_range);
                Ok(())
            }
        }
    }

    pub fn stop(&mut self) {
        match self {
            PlaybackBackend::Streamed(engine) => engine.stop(),
            PlaybackBackend::Buffered(engine) => engine.stop(),
        }
    }

    pub fn seek(&mut self, offset: f64) {
        match self {
            PlaybackBackend::Streamed(engine) => engine.seek(offset),
            PlaybackBackend::Buffered(engine) => engine.seek(offset),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        match self {
            PlaybackBackend::Streamed(engine) => engine.set_volume(volume),
            PlaybackBackend::Buffered(engine) => engine.set_volume(volume),
        }
    }

    pub fn clear_loop(&mut self) {
        match self {
            PlaybackBackend::Streamed(engine) => engine.clear_loop(),
            PlaybackBackend::Buffered(engine) => engine.clear_loop(),
        }
    }

    pub fn position(&self) -> f64 {
        match self {
            PlaybackBackend::Streamed(engine) => engine.position(),
            PlaybackBackend::Buffered(engine) => engine.position(),
        }
    }

    pub fn duration(&self) -> Option<f64> {
        match self {
            PlaybackBackend::Streamed(engine) => engine.duration(),
            PlaybackBackend::Buffered(engine) => Some(engine.duration()),
        }
    }

    pub fn tick(&mut self) -> f64 {
        match self {
            PlaybackBackend::Streamed(engine) => engine.tick(),
            PlaybackBackend::Buffered(engine) => engine.tick(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self {
            PlaybackBackend::Streamed(engine) => engine.state(),
            PlaybackBackend::Buffered(engine) => engine.state(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state().playing
    }

    /// Stop playback and release native resources
    pub fn teardown(&mut self) {
        match self {
            PlaybackBackend::Streamed(engine) => engine.teardown(),
            PlaybackBackend::Buffered(engine) => engine.teardown(),
        }
    }
}
