pub mod model;

pub use model::{Article, AudioEncoding, InlineAudio, Narration, PCM_SAMPLE_RATE};

use serde::{Deserialize, Serialize};

/// News piece as normalized by a provider handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Official recording of the piece, preferred over synthesized speech
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// Evergreen reading piece as normalized by a provider handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralArticle {
    pub title: String,
    pub content: String,
}
