use crate::domain::provider::{is_quota_message, ProviderError, ProviderId};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat},
    Client,
};
use std::time::Duration;

/// Client for an OpenAI-compatible endpoint with the built-in 429 retry
/// turned off, so a quota failure surfaces on the first response
pub fn build_client(base_url: &str, api_key: &str) -> Client<OpenAIConfig> {
    let config = OpenAIConfig::new()
        .with_api_base(base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Client::with_config(config).with_backoff(backoff::ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    })
}

/// Chat completions in JSON mode
pub struct JsonChat {
    client: Client<OpenAIConfig>,
    model: String,
    provider: ProviderId,
}

impl JsonChat {
    pub fn new(client: Client<OpenAIConfig>, model: String, provider: ProviderId) -> Self {
        Self {
            client,
            model,
            provider,
        }
    }

    pub fn client(&self) -> &Client<OpenAIConfig> {
        &self.client
    }

    pub async fn complete(&self, prompt: String) -> Result<String, ProviderError> {
        let start_time = std::time::Instant::now();

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| map_openai_error(self.provider, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| map_openai_error(self.provider, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(provider = %self.provider, model = %self.model, error = %e, "Chat completion failed");
            map_openai_error(self.provider, e)
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse(format!("{} returned no content", self.provider)))?;

        tracing::debug!(
            provider = %self.provider,
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            "Chat completion received"
        );
        Ok(content)
    }
}

/// Map SDK errors onto the provider taxonomy
pub fn map_openai_error(provider: ProviderId, err: OpenAIError) -> ProviderError {
    match err {
        OpenAIError::ApiError(api) => {
            let code = api.code.clone().unwrap_or_default();
            let kind = api.r#type.clone().unwrap_or_default();
            let message = format!("{} api error ({} {}): {}", provider, kind, code, api.message);

            if code == "invalid_api_key" || kind == "authentication_error" {
                ProviderError::Unauthorized(message)
            } else if code == "insufficient_quota"
                || code == "rate_limit_exceeded"
                || kind == "insufficient_quota"
                || is_quota_message(&api.message)
            {
                ProviderError::Quota(message)
            } else {
                ProviderError::Transport(message)
            }
        }
        OpenAIError::JSONDeserialize(e) => ProviderError::InvalidResponse(e.to_string()),
        OpenAIError::InvalidArgument(msg) => ProviderError::InvalidResponse(msg),
        other => {
            let message = format!("{} request failed: {}", provider, other);
            if is_quota_message(&message) {
                ProviderError::Quota(message)
            } else {
                ProviderError::Transport(message)
            }
        }
    }
}
