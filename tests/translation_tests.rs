// tests/translation_tests.rs
// MyMemory translator and its cache against a fake translation service

mod common;

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use common::{http, start_server, Recorder};
use nays_dreams::web_app::api::{CachedTranslator, MyMemoryTranslator, TranslationCache, Translator};
use nays_dreams::web_app::error::FetchError;

async fn translate(State(recorder): State<Recorder>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    recorder.record(query.clone());
    let text = query.get("q").cloned().unwrap_or_default();
    let pair = query.get("langpair").cloned().unwrap_or_default();
    match (text.as_str(), pair.as_str()) {
        ("Taza mágica", "es|en") => Json(json!({
            "responseData": { "translatedText": "Magic mug", "match": 1 },
            "responseStatus": 200,
            "responseDetails": "",
        })),
        (_, "es|xx") => Json(json!({
            "responseData": { "translatedText": "'XX' IS AN INVALID TARGET LANGUAGE" },
            "responseStatus": "403",
            "responseDetails": "'XX' IS AN INVALID TARGET LANGUAGE",
        })),
        _ => Json(json!({ "responseData": { "translatedText": "" }, "responseStatus": 200 })),
    }
}

async fn translation_server() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/get", get(translate))
        .with_state(recorder.clone());
    let base = start_server(app).await;
    (format!("{base}/get"), recorder)
}

#[tokio::test]
async fn test_translates_with_language_pair() {
    let (url, recorder) = translation_server().await;
    let translator = MyMemoryTranslator::new(http(), &url).unwrap();

    let text = translator.translate("Taza mágica", "es", "en").await.unwrap();
    assert_eq!(text, "Magic mug");
    assert_eq!(recorder.last().get("langpair").map(String::as_str), Some("es|en"));
}

#[tokio::test]
async fn test_status_in_body_is_an_error() {
    let (url, _) = translation_server().await;
    let translator = MyMemoryTranslator::new(http(), &url).unwrap();

    let err = translator.translate("Taza", "es", "xx").await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Server {
            status: 403,
            message: "'XX' IS AN INVALID TARGET LANGUAGE".to_string(),
        }
    );
}

#[tokio::test]
async fn test_empty_translation_is_a_decode_error() {
    let (url, _) = translation_server().await;
    let translator = MyMemoryTranslator::new(http(), &url).unwrap();

    let err = translator.translate("Cojín", "es", "en").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_cached_translator_calls_service_once() {
    let (url, recorder) = translation_server().await;
    let translator = CachedTranslator::new(
        MyMemoryTranslator::new(http(), &url).unwrap(),
        TranslationCache::new(100, Duration::from_secs(60)),
    );

    for _ in 0..3 {
        let translation = translator.translate("Taza mágica", "es", "en").await;
        assert_eq!(translation.text, "Magic mug");
        assert_eq!(translation.error, None);
    }
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn test_failures_fall_back_to_original_text() {
    let (url, recorder) = translation_server().await;
    let translator = CachedTranslator::new(
        MyMemoryTranslator::new(http(), &url).unwrap(),
        TranslationCache::default(),
    );

    let translation = translator.translate("Taza", "es", "xx").await;
    assert_eq!(translation.text, "Taza");
    assert!(translation.error.is_some());

    // Failures are not remembered
    translator.translate("Taza", "es", "xx").await;
    assert_eq!(recorder.count(), 2);
}

#[tokio::test]
async fn test_same_language_skips_the_service() {
    let (url, recorder) = translation_server().await;
    let translator = CachedTranslator::new(
        MyMemoryTranslator::new(http(), &url).unwrap(),
        TranslationCache::default(),
    );

    let translation = translator.translate("Taza mágica", "es", "es").await;
    assert_eq!(translation.text, "Taza mágica");
    assert_eq!(recorder.count(), 0);
}
