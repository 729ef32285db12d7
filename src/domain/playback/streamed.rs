use super::error::PlaybackError;
use super::native::MediaElement;
use super::state::{EngineKind, LoopRange, PlaybackState};

/// Plays an external recording through a streaming media element.
///
/// The element has no loop points of its own, so loop wrap is detected on
/// every clock tick (`position >= loop end`) and the element is rewound.
pub struct StreamedEngine {
    element: Box<dyn MediaElement>,
    url: String,
    playing: bool,
    loop_range: Option<LoopRange>,
    volume: f32,
}

impl StreamedEngine {
    pub fn new(mut element: Box<dyn MediaElement>, url: String) -> Self {
        element.load(&url);
        element.set_volume(1.0);
        Self {
            element,
            url,
            playing: false,
            loop_range: None,
            volume: 1.0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn play(&mut self, offset: f64, loop_range: Option<LoopRange>) -> Result<(), PlaybackError> {
        let offset = match loop_range {
            Some(range) => range.clamp(offset),
            None => offset.max(0.0),
        };

        self.element.set_current_time(offset);
        self.element.play()?;
        self.playing = true;
        self.loop_range = loop_range;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.element.pause();
        self.playing = false;
    }

    pub fn seek(&mut self, offset: f64) {
        let offset = match self.loop_range {
            Some(range) => range.clamp(offset),
            None => offset.max(0.0),
        };
        self.element.set_current_time(offset);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.element.set_volume(self.volume);
    }

    pub fn clear_loop(&mut self) {
        self.loop_range = None;
    }

    pub fn position(&self) -> f64 {
        self.element.current_time()
    }

    pub fn duration(&self) -> Option<f64> {
        self.element.duration()
    }

    /// Per-frame reconciliation: manual loop wrap and end detection
    pub fn tick(&mut self) -> f64 {
        let position = self.element.current_time();

        if !self.playing {
            return position;
        }

        if let Some(range) = self.loop_range {
            if position >= range.end {
                self.element.set_current_time(range.start);
                return range.start;
            }
        } else if self.element.ended() {
            self.playing = false;
        }

        position
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            engine: EngineKind::Streamed,
            playing: self.playing,
            position: self.position(),
            duration: self.duration(),
            loop_range: self.loop_range,
            volume: self.volume,
        }
    }

    pub fn teardown(&mut self) {
        self.element.pause();
        self.element.release();
        self.playing = false;
    }
}
