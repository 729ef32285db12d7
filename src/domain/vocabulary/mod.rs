pub mod error;
pub mod model;
pub mod review;
pub mod service;

pub use error::VocabularyServiceError;
pub use model::VocabularyItem;
pub use review::{due_items, interval_for, review, ReviewOutcome, REVIEW_INTERVALS};
pub use service::VocabularyService;
