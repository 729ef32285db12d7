use super::model::VocabularyItem;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minutes until the next review, per stage
pub const REVIEW_INTERVALS: [i64; 9] = [
    10,             // 10 minutes
    60,             // 1 hour
    8 * 60,         // 8 hours
    24 * 60,        // 1 day
    2 * 24 * 60,    // 2 days
    4 * 24 * 60,    // 4 days
    7 * 24 * 60,    // 1 week
    14 * 24 * 60,   // 2 weeks
    30 * 24 * 60,   // 1 month
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Success,
    Failure,
}

/// Interval for a stage; stages past the table use its largest entry
pub fn interval_for(stage: usize) -> Duration {
    let index = stage.min(REVIEW_INTERVALS.len() - 1);
    Duration::minutes(REVIEW_INTERVALS[index])
}

/// Advance on success, reset on failure
pub fn review(item: &VocabularyItem, outcome: ReviewOutcome, now: DateTime<Utc>) -> VocabularyItem {
    let stage = match outcome {
        ReviewOutcome::Success => item.stage + 1,
        ReviewOutcome::Failure => 0,
    };

    VocabularyItem {
        stage,
        next_review_at: now + interval_for(stage),
        last_reviewed_at: Some(now),
        ..item.clone()
    }
}

/// Items due at `now`, most overdue first
pub fn due_items(items: &[VocabularyItem], now: DateTime<Utc>) -> Vec<VocabularyItem> {
    let mut due: Vec<VocabularyItem> = items.iter().filter(|item| item.is_due(now)).cloned().collect();
    due.sort_by_key(|item| item.next_review_at);
    due
}
