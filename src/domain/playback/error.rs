#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    #[error("invalid audio payload: {0}")]
    InvalidPayload(String),
    #[error("audio decode failed: {0}")]
    Decode(String),
    #[error("article has no narration")]
    NoNarration,
    #[error("playback backend error: {0}")]
    Backend(String),
}
