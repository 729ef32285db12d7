use crate::domain::language::LanguageCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sample rate of raw PCM narration returned by speech models
pub const PCM_SAMPLE_RATE: u32 = 24_000;

/// How an inline narration payload is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    /// Raw 16-bit little-endian mono PCM at 24 kHz
    Pcm,
    Mp3,
    Wav,
}

impl std::fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioEncoding::Pcm => write!(f, "pcm"),
            AudioEncoding::Mp3 => write!(f, "mp3"),
            AudioEncoding::Wav => write!(f, "wav"),
        }
    }
}

/// Base64 audio carried alongside an article or vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineAudio {
    pub data: String,
    pub encoding: AudioEncoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Narration {
    /// Synthesized audio, decoded fully in memory before playback
    Inline(InlineAudio),
    /// Official recording, played through a streaming media element
    Stream { url: String },
}

impl Narration {
    pub fn is_inline(&self) -> bool {
        matches!(self, Narration::Inline(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub language: LanguageCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<Narration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: String, body: String, language: LanguageCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            body,
            language,
            narration: None,
            source_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_narration(mut self, narration: Narration) -> Self {
        self.narration = Some(narration);
        self
    }

    pub fn with_source_url(mut self, source_url: Option<String>) -> Self {
        self.source_url = source_url;
        self
    }

    /// Copy without inline audio, as stored in the reading history.
    /// Stream URLs are small and kept.
    pub fn without_inline_audio(&self) -> Self {
        let mut copy = self.clone();
        if copy.narration.as_ref().is_some_and(Narration::is_inline) {
            copy.narration = None;
        }
        copy
    }
}
