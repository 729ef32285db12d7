use super::openai_compat::{map_openai_error, JsonChat};
use super::payload;
use crate::domain::article::{AudioEncoding, GeneralArticle, InlineAudio, NewsArticle};
use crate::domain::language::LanguageCode;
use crate::domain::provider::{
    prompts, ProviderError, ProviderHandler, ProviderId, SpeechResult, WordDefinition,
};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use std::sync::LazyLock;

/// OpenAI accepts at most 4096 characters per speech request
const MAX_BATCH_SIZE: usize = 4096;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?。！？]+\s+").expect("sentence end pattern"));

/// OpenAI chat (JSON mode, no web search) and speech (mp3)
pub struct OpenAiHandler {
    chat: JsonChat,
    tts_model: String,
    default_voice: String,
    general_article_count: usize,
}

impl OpenAiHandler {
    pub fn new(
        client: Client<OpenAIConfig>,
        text_model: String,
        tts_model: String,
        default_voice: String,
    ) -> Self {
        Self {
            chat: JsonChat::new(client, text_model, ProviderId::OpenAi),
            tts_model,
            default_voice,
            general_article_count: 2,
        }
    }

    pub fn with_general_article_count(mut self, count: usize) -> Self {
        self.general_article_count = count;
        self
    }

    /// Voice suited to each language
    fn voice_for_language(&self, language: LanguageCode) -> Voice {
        if !self.default_voice.is_empty() {
            return parse_voice(&self.default_voice);
        }
        match language {
            LanguageCode::English => Voice::Alloy,
            LanguageCode::Spanish => Voice::Echo,
            LanguageCode::French | LanguageCode::Japanese => Voice::Nova,
            LanguageCode::German | LanguageCode::Russian => Voice::Onyx,
            LanguageCode::Italian => Voice::Fable,
            LanguageCode::Portuguese | LanguageCode::Chinese | LanguageCode::Korean => Voice::Shimmer,
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.tts_model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    async fn speak_batch(&self, text: &str, voice: Voice) -> Result<Vec<u8>, ProviderError> {
        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice,
            response_format: Some(SpeechResponseFormat::Mp3),
            speed: None,
        };

        let response = self
            .chat
            .client()
            .audio()
            .speech(request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.tts_model, text_length = text.len(), "OpenAI speech call failed");
                map_openai_error(ProviderId::OpenAi, e)
            })?;

        Ok(response.bytes.to_vec())
    }
}

fn parse_voice(name: &str) -> Voice {
    match name.to_lowercase().as_str() {
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => Voice::Alloy,
    }
}

/// Split text into batches at sentence ends, each at most `max_chars`
/// characters. Text without sentence ends is split by characters.
fn split_into_batches(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut pieces: Vec<&str> = Vec::new();
    let mut last_end = 0;
    for mat in SENTENCE_END.find_iter(text) {
        pieces.push(&text[last_end..mat.end()]);
        last_end = mat.end();
    }
    if last_end < text.len() {
        pieces.push(&text[last_end..]);
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = piece.chars().count();

        if current_len > 0 && current_len + piece_len > max_chars {
            batches.push(current.trim().to_string());
            current.clear();
            current_len = 0;
        }

        if piece_len > max_chars {
            let chars: Vec<char> = piece.chars().collect();
            for chunk in chars.chunks(max_chars) {
                batches.push(chunk.iter().collect());
            }
            continue;
        }

        current.push_str(piece);
        current_len += piece_len;
    }

    if !current.trim().is_empty() {
        batches.push(current.trim().to_string());
    }

    batches
}

#[async_trait]
impl ProviderHandler for OpenAiHandler {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn supports_speech(&self) -> bool {
        true
    }

    async fn synthesize_speech(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<SpeechResult, ProviderError> {
        let start_time = std::time::Instant::now();
        let voice = self.voice_for_language(language);
        let batches = split_into_batches(text, MAX_BATCH_SIZE);

        tracing::info!(
            provider = "openai",
            model = %self.tts_model,
            language = %language,
            text_length = text.len(),
            batch_count = batches.len(),
            "Synthesizing speech"
        );

        // MP3 frames concatenate cleanly, so batches are merged in order
        let mut merged = Vec::new();
        for batch in &batches {
            merged.extend(self.speak_batch(batch, voice.clone()).await?);
        }

        tracing::info!(
            provider = "openai",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = merged.len(),
            "Speech synthesized"
        );

        Ok(SpeechResult {
            audio: InlineAudio {
                data: STANDARD.encode(&merged),
                encoding: AudioEncoding::Mp3,
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
            .chat
            .complete(prompts::word_analysis(word, language, context))
            .await?;
        payload::word_definition(&raw, word)
    }

    async fn fetch_news_article(&self, language: LanguageCode) -> Result<NewsArticle, ProviderError> {
        tracing::info!(provider = "openai", language = %language, "Fetching news article without search");
        let raw = self.chat.complete(prompts::news_article(language, false)).await?;
        payload::news_article(&raw)
    }

    async fn fetch_general_articles(
        &self,
        language: LanguageCode,
    ) -> Result<Vec<GeneralArticle>, ProviderError> {
        let raw = self
            .chat
            .complete(prompts::general_articles(language, self.general_article_count))
            .await?;
        payload::general_articles(&raw)
    }
}
