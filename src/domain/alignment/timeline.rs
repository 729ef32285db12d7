use super::segmenter::RawSentence;
use super::weighter::weight;
use serde::Serialize;

/// A sentence with its estimated time range inside the narration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceSpan {
    /// Position in the full partition, stable for one mapping
    pub id: usize,
    pub text: String,
    pub start_char: usize,
    pub end_char: usize,
    pub start_time: f64,
    pub end_time: f64,
    /// Whitespace-only spans are timed but never rendered
    pub is_whitespace: bool,
}

impl SentenceSpan {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Sentence spans mapped over a narration of known duration.
///
/// Boundaries come from cumulative integer weights, so `end_time` of one
/// span is bit-identical to `start_time` of the next, the first span starts
/// at 0 and the last ends exactly at `duration`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    spans: Vec<SentenceSpan>,
    duration: f64,
}

impl Timeline {
    pub fn map(sentences: &[RawSentence], total_duration: f64) -> Self {
        let duration = if total_duration.is_finite() && total_duration > 0.0 {
            total_duration
        } else {
            0.0
        };

        let weights: Vec<usize> = sentences.iter().map(|s| weight(&s.text)).collect();
        let total_weight: usize = weights.iter().sum();

        let boundary = |cumulative: usize| -> f64 {
            if total_weight == 0 {
                0.0
            } else {
                (cumulative as f64 / total_weight as f64) * duration
            }
        };

        let mut cumulative = 0;
        let spans = sentences
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(id, (sentence, sentence_weight))| {
                let start_time = boundary(cumulative);
                cumulative += sentence_weight;
                let end_time = boundary(cumulative);

                SentenceSpan {
                    id,
                    text: sentence.text.clone(),
                    start_char: sentence.start_char,
                    end_char: sentence.end_char(),
                    start_time,
                    end_time,
                    is_whitespace: sentence.is_whitespace(),
                }
            })
            .collect();

        Self { spans, duration }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Every span, whitespace included, in character order
    pub fn spans(&self) -> &[SentenceSpan] {
        &self.spans
    }

    /// Spans that are rendered and clickable
    pub fn visible(&self) -> impl Iterator<Item = &SentenceSpan> {
        self.spans.iter().filter(|span| !span.is_whitespace)
    }

    pub fn get(&self, id: usize) -> Option<&SentenceSpan> {
        self.spans.get(id)
    }

    /// The sentence being spoken at `position`: the visible span with
    /// `start_time <= position < end_time`. The last visible span also
    /// claims trailing whitespace up to and including `duration`.
    pub fn active_at(&self, position: f64) -> Option<&SentenceSpan> {
        let last_visible = self.visible().last().map(|span| span.id);

        self.visible().find(|span| {
            let end = if Some(span.id) == last_visible {
                self.duration.max(span.end_time)
            } else {
                span.end_time
            };
            span.start_time <= position
                && (position < end || (Some(span.id) == last_visible && position <= end))
        })
    }
}
