use crate::e2e::helpers::{
    fake_handlers::{FakeFactory, Mode},
    TestContext,
};
use chrono::{Duration, Utc};
use polyglot_reader::controllers::VocabularyController;
use polyglot_reader::domain::language::LanguageCode;
use polyglot_reader::domain::provider::{ApiSettings, ProviderId};
use polyglot_reader::domain::vocabulary::{interval_for, ReviewOutcome, VocabularyServiceError};
use polyglot_reader::error::AppError;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use uuid::Uuid;

fn gemini() -> ApiSettings {
    ApiSettings::new(ProviderId::Gemini, None).with_key(ProviderId::Gemini, "key")
}

#[tokio::test]
async fn it_should_define_pronounce_and_save_a_word() {
    let ctx = TestContext::new(FakeFactory::new(), gemini());
    let service = ctx.vocabulary();

    let item = service
        .lookup("  gato ", LanguageCode::Spanish, "El gato duerme.")
        .await
        .unwrap();

    assert_eq!(item.word, "gato");
    assert_eq!(item.language, LanguageCode::Spanish);
    assert_eq!(item.examples.len(), 2);
    assert_eq!(item.stage, 0);
    assert!(item.pronunciation.is_some());
    assert_eq!(ctx.factory.log.count("word:es"), 1);
    assert_eq!(ctx.factory.log.count("speech:es"), 1);

    let saved = ctx.library.load_vocabulary().await;
    assert_eq!(saved, vec![item]);
}

#[tokio::test]
async fn it_should_save_without_audio_when_pronunciation_fails() {
    let factory = FakeFactory::new().speech(ProviderId::Gemini, Mode::Transport);
    let ctx = TestContext::new(factory, gemini());

    let item = ctx
        .vocabulary()
        .lookup("Katze", LanguageCode::German, "")
        .await
        .unwrap();

    assert!(item.pronunciation.is_none());
    assert_eq!(ctx.library.load_vocabulary().await.len(), 1);
}

#[tokio::test]
async fn it_should_fail_lookup_when_definition_fails() {
    let factory = FakeFactory::new().key(ProviderId::Gemini, "key", Mode::Transport);
    let ctx = TestContext::new(factory, gemini());

    let err = ctx
        .vocabulary()
        .lookup("chien", LanguageCode::French, "")
        .await
        .unwrap_err();

    assert!(matches!(err, VocabularyServiceError::Provider(_)));
    assert!(ctx.library.load_vocabulary().await.is_empty());
}

#[tokio::test]
async fn it_should_reuse_a_word_already_saved() {
    let ctx = TestContext::new(FakeFactory::new(), gemini());
    let service = ctx.vocabulary();

    let first = service.lookup("Haus", LanguageCode::German, "").await.unwrap();
    let second = service.lookup("haus", LanguageCode::German, "").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(ctx.factory.log.count("word"), 1);
    assert_eq!(ctx.library.load_vocabulary().await.len(), 1);
}

#[tokio::test]
async fn it_should_advance_and_reset_review_stages() {
    let ctx = TestContext::new(FakeFactory::new(), gemini());
    let service = ctx.vocabulary();
    let item = service.lookup("libro", LanguageCode::Spanish, "").await.unwrap();

    let now = Utc::now();
    service.review(item.id, ReviewOutcome::Success, now).await.unwrap();
    let at_two = service.review(item.id, ReviewOutcome::Success, now).await.unwrap();
    assert_eq!(at_two.stage, 2);

    let at_three = service.review(item.id, ReviewOutcome::Success, now).await.unwrap();
    assert_eq!(at_three.stage, 3);
    assert_eq!(at_three.next_review_at, now + interval_for(3));
    assert_eq!(at_three.last_reviewed_at, Some(now));

    let reset = service.review(item.id, ReviewOutcome::Failure, now).await.unwrap();
    assert_eq!(reset.stage, 0);
    assert_eq!(reset.next_review_at, now + interval_for(0));

    assert_eq!(ctx.library.load_vocabulary().await[0].stage, 0);
}

#[tokio::test]
async fn it_should_list_due_items_oldest_first() {
    let ctx = TestContext::new(FakeFactory::new(), gemini());
    let service = ctx.vocabulary();
    let older = service.lookup("uno", LanguageCode::Spanish, "").await.unwrap();
    let newer = service.lookup("dos", LanguageCode::Spanish, "").await.unwrap();

    let now = Utc::now();
    assert!(service.due(now).await.is_empty());

    let later = now + Duration::days(1);
    let due: Vec<Uuid> = service.due(later).await.iter().map(|item| item.id).collect();
    assert_eq!(due, vec![older.id, newer.id]);
}

#[tokio::test]
async fn it_should_validate_lookups_at_the_controller() {
    let ctx = TestContext::new(FakeFactory::new(), gemini());
    let controller = VocabularyController::new(Arc::new(ctx.vocabulary()));

    let err = controller.lookup("word", "Klingon", "").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let long = "a".repeat(65);
    let err = controller.lookup(&long, "English", "").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = controller.lookup("   ", "English", "").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = controller.review(Uuid::new_v4(), ReviewOutcome::Success).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let item = controller.lookup("house", "English", "").await.unwrap();
    assert_eq!(item.language, LanguageCode::English);
}
