use super::settings::ProviderId;

const QUOTA_MARKERS: [&str; 6] = [
    "quota",
    "429",
    "resource exhausted",
    "resource_exhausted",
    "rate limit",
    "limit",
];

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no API key configured for {0}")]
    MissingCredential(ProviderId),
    /// Key present but rejected by the provider (401/403)
    #[error("credential rejected: {0}")]
    Unauthorized(String),
    #[error("quota exceeded: {0}")]
    Quota(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ProviderError {
    /// Quota or rate-limit exhaustion, by variant or by the provider's message
    pub fn is_quota(&self) -> bool {
        match self {
            ProviderError::Quota(_) => true,
            ProviderError::Transport(msg) | ProviderError::InvalidResponse(msg) => {
                is_quota_message(msg)
            }
            ProviderError::MissingCredential(_)
            | ProviderError::Unauthorized(_)
            | ProviderError::Unsupported(_) => false,
        }
    }

    /// No usable key: absent, or rejected by the provider
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingCredential(_) | ProviderError::Unauthorized(_)
        )
    }

    /// Failures a different provider may not share
    pub fn warrants_fallback(&self) -> bool {
        self.is_quota() || self.is_credential_failure()
    }
}

pub fn is_quota_message(message: &str) -> bool {
    let message = message.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| message.contains(marker))
}
