use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Streamed,
    Buffered,
}

/// Segment of the narration played repeatedly, `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopRange {
    pub start: f64,
    pub end: f64,
}

impl LoopRange {
    /// `None` unless both bounds are finite and `start < end`
    pub fn new(start: f64, end: f64) -> Option<Self> {
        let start = start.max(0.0);
        if start.is_finite() && end.is_finite() && start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, position: f64) -> bool {
        self.start <= position && position < self.end
    }

    /// Offsets outside the range start playback at the range start
    pub fn clamp(&self, offset: f64) -> f64 {
        if self.contains(offset) {
            offset
        } else {
            self.start
        }
    }

    /// Map a linear playback position into the range, as native looping does
    pub fn wrap(&self, linear: f64) -> f64 {
        if linear < self.end {
            return linear.max(self.start);
        }
        let wrapped = self.start + (linear - self.start).rem_euclid(self.len());
        wrapped.max(self.start)
    }
}

/// Snapshot of the active backend. Only backend commands change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub engine: EngineKind,
    pub playing: bool,
    pub position: f64,
    /// Unknown for a streamed source until its metadata has loaded
    pub duration: Option<f64>,
    pub loop_range: Option<LoopRange>,
    pub volume: f32,
}
