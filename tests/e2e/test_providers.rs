use polyglot_reader::domain::article::AudioEncoding;
use polyglot_reader::domain::language::LanguageCode;
use polyglot_reader::domain::orchestrator::FallbackOrchestrator;
use polyglot_reader::domain::provider::{ApiSettings, ProviderError, ProviderHandler, ProviderId};
use polyglot_reader::infrastructure::config::ProviderEndpoints;
use polyglot_reader::infrastructure::providers::{
    openai_compat::build_client, DeepSeekHandler, DefaultHandlerFactory, GeminiHandler,
    OpenAiHandler,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_TEXT: &str = "/v1beta/models/gemini-test:generateContent";
const GEMINI_TTS: &str = "/v1beta/models/gemini-tts-test:generateContent";

fn gemini(server: &MockServer) -> GeminiHandler {
    GeminiHandler::new(
        reqwest::Client::new(),
        server.uri(),
        "gemini-key".to_string(),
        "gemini-test".to_string(),
        "gemini-tts-test".to_string(),
        "Kore".to_string(),
    )
}

fn gemini_text_reply(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
            "logprobs": null
        }]
    })
}

fn endpoints(server: &MockServer) -> ProviderEndpoints {
    ProviderEndpoints {
        gemini_base_url: server.uri(),
        gemini_text_model: "gemini-test".to_string(),
        gemini_tts_model: "gemini-tts-test".to_string(),
        openai_base_url: format!("{}/v1", server.uri()),
        openai_text_model: "gpt-test".to_string(),
        deepseek_base_url: format!("{}/deepseek", server.uri()),
        ..ProviderEndpoints::default()
    }
}

#[tokio::test]
async fn it_should_define_words_with_gemini_json_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_TEXT))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_reply(
            r#"{"word":"perro","phonetic":"ˈpe.ro","guidance":"roll the r","examples":["El perro ladra.","Mi perro duerme."],"definition_target":"animal doméstico","definition_native":"dog"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let definition = gemini(&server)
        .analyze_word("perro", LanguageCode::Spanish, "El perro ladra.")
        .await
        .unwrap();

    assert_eq!(definition.definition_native, "dog");
    assert_eq!(definition.examples.len(), 2);
}

#[tokio::test]
async fn it_should_classify_gemini_quota_and_key_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_TEXT))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded" }
        })))
        .mount(&server)
        .await;

    let err = gemini(&server)
        .fetch_general_articles(LanguageCode::German)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Quota(_)));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_TEXT))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "status": "INVALID_ARGUMENT", "message": "API key not valid. Please pass a valid API key." }
        })))
        .mount(&server)
        .await;

    let err = gemini(&server)
        .fetch_general_articles(LanguageCode::German)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Unauthorized(_)));
    assert!(err.warrants_fallback());
}

#[tokio::test]
async fn it_should_return_gemini_speech_as_pcm() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_TTS))
        .and(body_partial_json(json!({
            "generationConfig": { "responseModalities": ["AUDIO"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{
                "inlineData": { "mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAAAA==" }
            }] } }]
        })))
        .mount(&server)
        .await;

    let speech = gemini(&server)
        .synthesize_speech("Hallo.", LanguageCode::German)
        .await
        .unwrap();

    assert_eq!(speech.audio.encoding, AudioEncoding::Pcm);
    assert_eq!(speech.audio.data, "AAAAAA==");
}

#[tokio::test]
async fn it_should_take_news_source_from_grounding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_TEXT))
        .and(body_partial_json(json!({ "tools": [{ "google_search": {} }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "```json\n{\"title\":\"Titre\",\"content\":\"Premier paragraphe [1].\\n\\nSecond paragraphe.\",\"source_url\":null}\n```" }] },
                "groundingMetadata": { "groundingChunks": [{ "web": { "uri": "https://presse.example/article" } }] }
            }]
        })))
        .mount(&server)
        .await;

    let news = gemini(&server)
        .fetch_news_article(LanguageCode::French)
        .await
        .unwrap();

    assert_eq!(news.title, "Titre");
    assert_eq!(news.content, "Premier paragraphe.\n\nSecond paragraphe.");
    assert_eq!(news.source_url.as_deref(), Some("https://presse.example/article"));
    assert_eq!(news.audio_url, None);
}

#[tokio::test]
async fn it_should_parse_openai_general_articles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer openai-key"))
        .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"articles":[{"title":"Il mare","content":"Il mare è calmo. Le onde sono piccole."},{"title":"La città","content":"Roma è antica."}]}"#,
        )))
        .mount(&server)
        .await;

    let handler = OpenAiHandler::new(
        build_client(&format!("{}/v1", server.uri()), "openai-key"),
        "gpt-test".to_string(),
        "tts-1".to_string(),
        String::new(),
    );
    let articles = handler
        .fetch_general_articles(LanguageCode::Italian)
        .await
        .unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[1].title, "La città");
}

#[tokio::test]
async fn it_should_surface_openai_quota_on_first_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "message": "You exceeded your current quota, please check your plan and billing details.",
                "type": "insufficient_quota",
                "param": null,
                "code": "insufficient_quota"
            }
        })))
        .mount(&server)
        .await;

    let handler = OpenAiHandler::new(
        build_client(&format!("{}/v1", server.uri()), "openai-key"),
        "gpt-test".to_string(),
        "tts-1".to_string(),
        String::new(),
    );
    let err = handler
        .synthesize_speech("Hello there.", LanguageCode::English)
        .await
        .unwrap_err();

    assert!(err.is_quota());
}

#[tokio::test]
async fn it_should_encode_openai_speech_as_mp3() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({ "voice": "nova", "response_format": "mp3" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(vec![0xFF, 0xFB, 0x90, 0x00]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handler = OpenAiHandler::new(
        build_client(&format!("{}/v1", server.uri()), "openai-key"),
        "gpt-test".to_string(),
        "tts-1".to_string(),
        String::new(),
    );
    let speech = handler
        .synthesize_speech("Bonjour tout le monde.", LanguageCode::French)
        .await
        .unwrap();

    assert_eq!(speech.audio.encoding, AudioEncoding::Mp3);
    assert_eq!(speech.audio.data, "//uQAA==");
}

#[tokio::test]
async fn it_should_refuse_speech_on_deepseek_without_a_sibling() {
    let handler = DeepSeekHandler::new(
        build_client("http://127.0.0.1:9", "deepseek-key"),
        "deepseek-chat".to_string(),
    );

    assert!(!handler.supports_speech());
    let err = handler
        .synthesize_speech("Привет.", LanguageCode::Russian)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Unsupported(_)));
}

#[tokio::test]
async fn it_should_fall_back_from_gemini_to_openai_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_TEXT))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"word":"Baum","phonetic":"baʊ̯m","guidance":"","examples":["Der Baum ist hoch."],"definition_target":"Pflanze","definition_native":"tree"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ApiSettings::new(ProviderId::Gemini, Some(ProviderId::OpenAi))
        .with_key(ProviderId::Gemini, "gemini-key")
        .with_key(ProviderId::OpenAi, "openai-key");
    let orchestrator = FallbackOrchestrator::new(
        Arc::new(DefaultHandlerFactory::new(endpoints(&server), 2)),
        settings,
        HashMap::new(),
    );

    let definition = orchestrator
        .analyze_word("Baum", LanguageCode::German, "")
        .await
        .unwrap();

    assert_eq!(definition.definition_native, "tree");
}
