use crate::e2e::helpers::{
    fake_handlers::{FakeFactory, FakeRemoteStore, Mode},
    TestContext,
};
use polyglot_reader::domain::article::Narration;
use polyglot_reader::domain::language::LanguageCode;
use polyglot_reader::domain::orchestrator::{
    LanguageState, PreloadEvent, PreloadEventKind, PreloadOptions,
};
use polyglot_reader::domain::provider::{ApiSettings, ProviderId};
use std::sync::Arc;
use std::time::Duration;

fn options(languages: &[LanguageCode]) -> PreloadOptions {
    PreloadOptions {
        languages: languages.to_vec(),
        delay: Duration::from_millis(1500),
        general_article_count: 2,
    }
}

fn gemini(key: &str) -> ApiSettings {
    ApiSettings::new(ProviderId::Gemini, None).with_key(ProviderId::Gemini, key)
}

#[tokio::test(start_paused = true)]
async fn it_should_load_languages_one_at_a_time() {
    let ctx = TestContext::new(FakeFactory::new(), gemini("key"));
    let preloader = ctx.preloader(
        Arc::new(FakeRemoteStore::default()),
        options(&[LanguageCode::Spanish, LanguageCode::French]),
    );

    let started = tokio::time::Instant::now();
    let report = preloader.run_cycle().await;

    assert_eq!(report.ready, vec![LanguageCode::Spanish, LanguageCode::French]);
    assert!(report.failed.is_empty());
    assert_eq!(report.restarts, 0);
    assert!(started.elapsed() >= Duration::from_millis(1500));

    // Every Spanish request completes before the first French one
    let entries = ctx.factory.log.entries();
    let last_spanish = entries.iter().rposition(|e| e.ends_with(":es")).unwrap();
    let first_french = entries.iter().position(|e| e.ends_with(":fr")).unwrap();
    assert!(last_spanish < first_french);
    assert_eq!(
        &entries[..5],
        &[
            "gemini:key:news:es".to_string(),
            "gemini:key:speech:es".to_string(),
            "gemini:key:general:es".to_string(),
            "gemini:key:speech:es".to_string(),
            "gemini:key:speech:es".to_string(),
        ]
    );

    let states = preloader.states().await;
    let articles = states.articles(LanguageCode::Spanish);
    assert_eq!(articles.len(), 3);
    assert!(articles
        .iter()
        .all(|article| matches!(article.narration, Some(Narration::Inline(_)))));
}

#[tokio::test(start_paused = true)]
async fn it_should_publish_started_and_succeeded_events() {
    let ctx = TestContext::new(FakeFactory::new(), gemini("key"));
    let preloader = ctx.preloader(
        Arc::new(FakeRemoteStore::default()),
        options(&[LanguageCode::German]),
    );
    let mut events = preloader.subscribe();

    preloader.run_cycle().await;

    let first = events.recv().await.unwrap();
    assert_eq!(first.language, LanguageCode::German);
    assert_eq!(first.kind, PreloadEventKind::Started);
    let second = events.recv().await.unwrap();
    assert!(matches!(second.kind, PreloadEventKind::Succeeded(ref articles) if articles.len() == 3));
    assert_eq!(first.cycle, second.cycle);
}

#[tokio::test(start_paused = true)]
async fn it_should_give_up_when_remote_credentials_are_unchanged() {
    let factory = FakeFactory::new().key(ProviderId::Gemini, "stale", Mode::Quota);
    let ctx = TestContext::new(factory, gemini("stale"));
    let remote = Arc::new(FakeRemoteStore::with_rows(vec![(ProviderId::Gemini, "stale")]));
    let preloader = ctx.preloader(
        remote.clone(),
        options(&[LanguageCode::Japanese, LanguageCode::Chinese]),
    );

    let report = preloader.run_cycle().await;

    assert_eq!(report.restarts, 0);
    assert!(report.ready.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert!(report.failed[0].1.contains("RESOURCE_EXHAUSTED"));
    // One refresh attempt per failing language, no retry loop
    assert_eq!(remote.fetch_count(), 2);
    assert_eq!(ctx.factory.log.count("news"), 2);
}

#[tokio::test(start_paused = true)]
async fn it_should_restart_with_refreshed_credentials() {
    let factory = FakeFactory::new().key(ProviderId::Gemini, "stale", Mode::Quota);
    let ctx = TestContext::new(factory, gemini("stale"));
    let remote = Arc::new(FakeRemoteStore::with_rows(vec![(ProviderId::Gemini, "fresh")]));
    let preloader = ctx.preloader(
        remote.clone(),
        options(&[LanguageCode::Korean, LanguageCode::Russian]),
    );

    let report = preloader.run_cycle().await;

    assert_eq!(report.restarts, 1);
    assert_eq!(report.ready, vec![LanguageCode::Korean, LanguageCode::Russian]);
    assert_eq!(report.cycle, preloader.current_cycle());
    assert_eq!(remote.fetch_count(), 1);

    let settings = ctx.orchestrator.settings().await;
    assert_eq!(settings.key(ProviderId::Gemini), Some("fresh"));
    assert_eq!(ctx.library.load_settings().await, Some(settings));
    assert_eq!(ctx.factory.log.count("stale"), 1);
}

#[tokio::test(start_paused = true)]
async fn it_should_keep_articles_when_narration_fails() {
    let factory = FakeFactory::new().speech(ProviderId::Gemini, Mode::Transport);
    let ctx = TestContext::new(factory, gemini("key"));
    let preloader = ctx.preloader(
        Arc::new(FakeRemoteStore::default()),
        options(&[LanguageCode::Portuguese]),
    );

    let report = preloader.run_cycle().await;

    assert_eq!(report.ready, vec![LanguageCode::Portuguese]);
    let states = preloader.states().await;
    let articles = states.articles(LanguageCode::Portuguese);
    assert_eq!(articles.len(), 3);
    assert!(articles.iter().all(|article| article.narration.is_none()));
}

#[tokio::test(start_paused = true)]
async fn it_should_fail_language_when_narration_hits_quota() {
    let factory = FakeFactory::new().speech(ProviderId::Gemini, Mode::Quota);
    let ctx = TestContext::new(factory, gemini("key"));
    let preloader = ctx.preloader(
        Arc::new(FakeRemoteStore::default()),
        options(&[LanguageCode::Italian]),
    );

    let report = preloader.run_cycle().await;

    assert!(report.ready.is_empty());
    assert_eq!(report.failed[0].0, LanguageCode::Italian);
    assert!(matches!(
        preloader.states().await.get(LanguageCode::Italian),
        Some(LanguageState::Failed(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn it_should_stream_official_recordings_instead_of_synthesizing() {
    let factory = FakeFactory::new().news_audio_url("https://radio.example/bulletin.mp3");
    let ctx = TestContext::new(factory, gemini("key"));
    let preloader = ctx.preloader(
        Arc::new(FakeRemoteStore::default()),
        options(&[LanguageCode::English]),
    );

    preloader.run_cycle().await;

    let states = preloader.states().await;
    let articles = states.articles(LanguageCode::English);
    assert_eq!(
        articles[0].narration,
        Some(Narration::Stream {
            url: "https://radio.example/bulletin.mp3".to_string()
        })
    );
    assert_eq!(articles[0].source_url.as_deref(), Some("https://news.example/story"));
    // Only the two general articles were synthesized
    assert_eq!(ctx.factory.log.count("speech"), 2);
}

#[tokio::test(start_paused = true)]
async fn it_should_discard_events_from_superseded_cycles() {
    let ctx = TestContext::new(FakeFactory::new(), gemini("key"));
    let preloader = Arc::new(ctx.preloader(
        Arc::new(FakeRemoteStore::default()),
        options(&[LanguageCode::Spanish, LanguageCode::German]),
    ));
    let mut events = preloader.subscribe();

    let running = tokio::spawn({
        let preloader = preloader.clone();
        async move { preloader.run_cycle().await }
    });

    // Wait for Spanish to finish, then take over before German starts
    loop {
        let event = events.recv().await.unwrap();
        if matches!(event.kind, PreloadEventKind::Succeeded(_)) {
            assert_eq!(event.language, LanguageCode::Spanish);
            break;
        }
    }
    let old_cycle = preloader.current_cycle();
    preloader.supersede();

    let report = running.await.unwrap();
    assert!(report.superseded);
    assert_eq!(ctx.factory.log.count(":de"), 0);

    let late = PreloadEvent {
        cycle: old_cycle,
        language: LanguageCode::German,
        kind: PreloadEventKind::Failed("late".to_string()),
    };
    assert!(!preloader.apply(late).await);
    assert_ne!(
        preloader.states().await.get(LanguageCode::German),
        Some(&LanguageState::Failed("late".to_string()))
    );
}
