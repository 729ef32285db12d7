use super::payload;
use crate::domain::article::{AudioEncoding, GeneralArticle, InlineAudio, NewsArticle};
use crate::domain::language::LanguageCode;
use crate::domain::provider::{
    is_quota_message, prompts, ProviderError, ProviderHandler, ProviderId, SpeechResult,
    WordDefinition,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Gemini over the Generative Language REST API. The only handler with
/// web-grounded news and native speech (raw 24 kHz PCM).
pub struct GeminiHandler {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    tts_model: String,
    voice: String,
    general_article_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Result<&Candidate, ProviderError> {
        self.candidates
            .first()
            .ok_or_else(|| ProviderError::InvalidResponse("no candidates returned".to_string()))
    }

    fn text(&self) -> Result<String, ProviderError> {
        let text: String = self
            .first_candidate()?
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("empty text response".to_string()));
        }
        Ok(text)
    }

    fn audio(&self) -> Result<&InlineData, ProviderError> {
        self.first_candidate()?
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.inline_data.as_ref())
            .ok_or_else(|| ProviderError::InvalidResponse("no audio in speech response".to_string()))
    }

    fn grounding_url(&self) -> Option<String> {
        self.candidates
            .first()?
            .grounding_metadata
            .as_ref()?
            .grounding_chunks
            .iter()
            .find_map(|chunk| chunk.web.as_ref()?.uri.clone())
    }
}

impl GeminiHandler {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        text_model: String,
        tts_model: String,
        voice: String,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model,
            tts_model,
            voice,
            general_article_count: 2,
        }
    }

    pub fn with_general_article_count(mut self, count: usize) -> Self {
        self.general_article_count = count;
        self
    }

    async fn generate(&self, model: &str, body: Value) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(model, status = %status, "Gemini API call failed");
            return Err(classify_failure(status, &body));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            provider = "gemini",
            model,
            latency_ms = start_time.elapsed().as_millis(),
            "Gemini response received"
        );
        Ok(parsed)
    }

    async fn generate_json(&self, prompt: String) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        self.generate(&self.text_model, body).await?.text()
    }
}

/// Map an HTTP failure onto the provider taxonomy
fn classify_failure(status: StatusCode, body: &str) -> ProviderError {
    let message = format!("gemini returned {}: {}", status, body);

    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        return ProviderError::Quota(message);
    }
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || body.contains("API_KEY_INVALID")
        || body.contains("API key not valid")
    {
        return ProviderError::Unauthorized(message);
    }
    if is_quota_message(body) {
        return ProviderError::Quota(message);
    }
    ProviderError::Transport(message)
}

#[async_trait]
impl ProviderHandler for GeminiHandler {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn supports_speech(&self) -> bool {
        true
    }

    async fn synthesize_speech(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<SpeechResult, ProviderError> {
        tracing::info!(
            provider = "gemini",
            model = %self.tts_model,
            language = %language,
            text_length = text.len(),
            "Synthesizing speech"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": self.voice } }
                }
            }
        });

        let response = self.generate(&self.tts_model, body).await?;
        let audio = response.audio()?;

        // Gemini answers with raw L16 PCM; containers are passed through
        let encoding = match audio.mime_type.as_str() {
            "audio/mpeg" | "audio/mp3" => AudioEncoding::Mp3,
            "audio/wav" | "audio/x-wav" => AudioEncoding::Wav,
            _ => AudioEncoding::Pcm,
        };

        Ok(SpeechResult {
            audio: InlineAudio {
                data: audio.data.clone(),
                encoding,
            },
        })
    }

    async fn analyze_word(
        &self,
        word: &str,
        language: LanguageCode,
        context: &str,
    ) -> Result<WordDefinition, ProviderError> {
        let raw = self
            .generate_json(prompts::word_analysis(word, language, context))
            .await?;
        payload::word_definition(&raw, word)
    }

    async fn fetch_news_article(&self, language: LanguageCode) -> Result<NewsArticle, ProviderError> {
        tracing::info!(provider = "gemini", language = %language, "Fetching grounded news article");

        // Search grounding cannot be combined with a JSON response type
        let body = json!({
            "contents": [{ "parts": [{ "text": prompts::news_article(language, true) }] }],
            "tools": [{ "google_search": {} }]
        });

        let response = self.generate(&self.text_model, body).await?;
        let mut news = payload::news_article(&response.text()?)?;
        if news.source_url.is_none() {
            news.source_url = response.grounding_url();
        }
        Ok(news)
    }

    async fn fetch_general_articles(
        &self,
        language: LanguageCode,
    ) -> Result<Vec<GeneralArticle>, ProviderError> {
        let raw = self
            .generate_json(prompts::general_articles(language, self.general_article_count))
            .await?;
        payload::general_articles(&raw)
    }
}
