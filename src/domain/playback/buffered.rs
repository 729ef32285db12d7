use super::decode::DecodedAudio;
use super::native::{AudioOutput, SourceNode};
use super::state::{EngineKind, LoopRange, PlaybackState};
use std::sync::Arc;

/// Plays a fully decoded buffer through one-shot source nodes.
///
/// Every play starts a fresh node at an offset. Pausing stops the node and
/// remembers the position. While playing, position is reconstructed from
/// the output clock: `offset + elapsed`, wrapped into the loop range when
/// native looping is on.
pub struct BufferedEngine {
    output: Box<dyn AudioOutput>,
    buffer: Arc<DecodedAudio>,
    node: Option<Box<dyn SourceNode>>,
    /// Output clock reading when the current node started
    started_at: f64,
    /// Buffer offset the current node started from
    start_offset: f64,
    paused_at: f64,
    playing: bool,
    loop_range: Option<LoopRange>,
    volume: f32,
}

impl BufferedEngine {
    pub fn new(mut output: Box<dyn AudioOutput>, buffer: Arc<DecodedAudio>) -> Self {
        output.set_gain(1.0);
        Self {
            output,
            buffer,
            node: None,
            started_at: 0.0,
            start_offset: 0.0,
            paused_at: 0.0,
            playing: false,
            loop_range: None,
            volume: 1.0,
        }
    }

    pub fn duration(&self) -> f64 {
        self.buffer.duration()
    }

    pub fn play(&mut self, offset: f64, loop_range: Option<LoopRange>) {
        self.stop_node();

        let offset = match loop_range {
            Some(range) => range.clamp(offset),
            // Playing from the end replays from the beginning
            None if offset >= self.duration() => 0.0,
            None => offset,
        }
        .clamp(0.0, self.duration());

        // Nodes are single-use, so loop points go on the new node
        self.node = Some(self.output.start(self.buffer.clone(), offset, loop_range));
        self.started_at = self.output.current_time();
        self.start_offset = offset;
        self.playing = true;
        self.loop_range = loop_range;
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.paused_at = self.position();
            self.playing = false;
        }
        self.stop_node();
    }

    pub fn seek(&mut self, offset: f64) {
        if self.playing {
            self.play(offset, self.loop_range);
        } else {
            let offset = match self.loop_range {
                Some(range) => range.clamp(offset),
                None => offset,
            };
            self.paused_at = offset.clamp(0.0, self.duration());
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_gain(self.volume);
    }

    pub fn clear_loop(&mut self) {
        if self.loop_range.is_none() {
            return;
        }
        if self.playing {
            // Re-base the linear clock at the current wrapped position; the
            // live node keeps playing from there without its loop points
            let position = self.position();
            self.start_offset = position;
            self.started_at = self.output.current_time();
            if let Some(node) = self.node.as_mut() {
                node.set_loop(None);
            }
        }
        self.loop_range = None;
    }

    /// Position for the UI. Linear while looping, never before loop start.
    pub fn position(&self) -> f64 {
        if !self.playing {
            return self.paused_at;
        }

        let elapsed = (self.output.current_time() - self.started_at).max(0.0);
        let linear = self.start_offset + elapsed;

        match self.loop_range {
            Some(range) => range.wrap(linear),
            None => linear.min(self.duration()),
        }
    }

    /// Per-frame reconciliation: detects the natural end of the buffer
    pub fn tick(&mut self) -> f64 {
        let position = self.position();

        if self.playing && self.loop_range.is_none() && position >= self.duration() {
            self.playing = false;
            self.paused_at = self.duration();
            self.node = None;
        }

        position
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            engine: EngineKind::Buffered,
            playing: self.playing,
            position: self.position(),
            duration: Some(self.duration()),
            loop_range: self.loop_range,
            volume: self.volume,
        }
    }

    pub fn teardown(&mut self) {
        self.stop_node();
        self.playing = false;
        self.output.close();
    }

    fn stop_node(&mut self) {
        if let Some(mut node) = self.node.take() {
            node.stop();
        }
    }
}
