use polyglot_reader::domain::provider::{ApiSettings, ProviderError, ProviderId};
use polyglot_reader::infrastructure::repositories::{
    DisabledCredentialStore, RemoteCredentialStore, SupabaseCredentialStore,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> SupabaseCredentialStore {
    SupabaseCredentialStore::new(server.uri(), "anon-key".to_string(), "polyglot".to_string())
}

#[tokio::test]
async fn it_should_fetch_enabled_rows_for_the_app() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/api_credentials"))
        .and(query_param("app_id", "eq.polyglot"))
        .and(query_param("enabled", "eq.true"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "provider": "openai", "api_key": "sk-remote" },
            { "provider": "claude", "api_key": "ignored" },
            { "provider": "gemini", "api_key": "  " },
            { "provider": "google", "api_key": "g-remote" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = store(&server).fetch().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].provider, ProviderId::OpenAi);
    assert_eq!(rows[0].api_key, "sk-remote");
    assert_eq!(rows[1].provider, ProviderId::Gemini);

    // The first row becomes the primary
    let merged = ApiSettings::default().merge_remote(&rows);
    assert_eq!(merged.primary, ProviderId::OpenAi);
    assert_eq!(merged.key(ProviderId::Gemini), Some("g-remote"));
}

#[tokio::test]
async fn it_should_report_remote_failures_as_transport_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/api_credentials"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid JWT"))
        .mount(&server)
        .await;

    let err = store(&server).fetch().await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport(ref msg) if msg.contains("401")));
}

#[tokio::test]
async fn it_should_return_nothing_when_remote_is_disabled() {
    assert!(DisabledCredentialStore.fetch().await.unwrap().is_empty());
}
