use crate::domain::provider::{ProviderError, ProviderId, RemoteCredential};
use async_trait::async_trait;
use serde::Deserialize;

/// Remote source of provider credentials for this application
#[async_trait]
pub trait RemoteCredentialStore: Send + Sync {
    /// Enabled rows, in the store's order. No configuration means no rows.
    async fn fetch(&self) -> Result<Vec<RemoteCredential>, ProviderError>;
}

/// Used when no remote store is configured
pub struct DisabledCredentialStore;

#[async_trait]
impl RemoteCredentialStore for DisabledCredentialStore {
    async fn fetch(&self) -> Result<Vec<RemoteCredential>, ProviderError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct CredentialRow {
    provider: String,
    api_key: Option<String>,
}

/// PostgREST `api_credentials` table filtered by app id and enabled flag
pub struct SupabaseCredentialStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    app_id: String,
}

impl SupabaseCredentialStore {
    pub fn new(base_url: String, api_key: String, app_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            app_id,
        }
    }
}

#[async_trait]
impl RemoteCredentialStore for SupabaseCredentialStore {
    async fn fetch(&self) -> Result<Vec<RemoteCredential>, ProviderError> {
        let url = format!(
            "{}/rest/v1/api_credentials?app_id=eq.{}&enabled=eq.true&select=provider,api_key",
            self.base_url,
            urlencoding::encode(&self.app_id)
        );

        tracing::debug!(app_id = %self.app_id, "Fetching remote credentials");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("remote config request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transport(format!(
                "remote config returned {}: {}",
                status, body
            )));
        }

        let rows: Vec<CredentialRow> = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let credentials: Vec<RemoteCredential> = rows
            .into_iter()
            .filter_map(|row| {
                let provider = match row.provider.parse::<ProviderId>() {
                    Ok(provider) => provider,
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping remote credential row");
                        return None;
                    }
                };
                let api_key = row.api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())?;
                Some(RemoteCredential { provider, api_key })
            })
            .collect();

        tracing::info!(rows = credentials.len(), "Remote credentials fetched");
        Ok(credentials)
    }
}
