//! Router-level tests: handlers, status codes and JSON shapes, with a
//! stub backend so no model weights are touched.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use translator_backend::config::Config;
use translator_backend::error::TranslateError;
use translator_backend::routes;
use translator_backend::state::AppState;
use translator_backend::translate::{TranslationBackend, TranslationService};

struct StubBackend;

#[async_trait]
impl TranslationBackend for StubBackend {
    async fn translate_with_model(
        &self,
        text: &str,
        model_id: &str,
    ) -> Result<String, TranslateError> {
        Ok(format!("<{model_id}>{text}"))
    }

    fn loaded_models(&self) -> usize {
        0
    }

    fn device(&self) -> String {
        "mock".to_string()
    }
}

fn app() -> Router {
    let config = Config::default();
    let translator = Arc::new(TranslationService::with_backend(
        config.translation_config.clone(),
        Arc::new(StubBackend),
    ));
    let state = AppState::with_translator(config, translator);
    Router::new().merge(routes::create_routes()).with_state(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_catalog_metrics() {
    let response = app().oneshot(get("/api/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["metrics"]["supported_languages"], 26);
    assert_eq!(body["metrics"]["loaded_models"], 0);
}

#[tokio::test]
async fn status_reports_device_and_mapping_counts() {
    let response = app().oneshot(get("/api/status")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["system"]["device"], "mock");
    assert_eq!(body["translation_service"]["supported_languages"], 26);
    assert_eq!(body["translation_service"]["loaded_models"], 0);
    assert!(
        body["translation_service"]["model_mappings"]
            .as_u64()
            .expect("count")
            > 0
    );
}

#[tokio::test]
async fn translate_returns_shaped_response() {
    let request = post_json(
        "/api/translate",
        json!({"text": "Hello, how are you?", "source_lang": "en", "target_lang": "ny"}),
    );
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["cached"], false);
    assert_eq!(body["translation_type"], "direct");
    assert_eq!(
        body["translated_text"],
        "<Helsinki-NLP/opus-mt-en-ny>Hello, how are you?"
    );
}

#[tokio::test]
async fn repeat_translate_is_cached() {
    let app = app();
    let payload = json!({"text": "Hello", "source_lang": "en", "target_lang": "sw"});

    let first = app
        .clone()
        .oneshot(post_json("/api/translate", payload.clone()))
        .await
        .expect("first");
    let first = body_json(first).await;
    assert_eq!(first["cached"], false);

    let second = app
        .oneshot(post_json("/api/translate", payload))
        .await
        .expect("second");
    let second = body_json(second).await;
    assert_eq!(second["cached"], true);
    assert_eq!(second["translated_text"], first["translated_text"]);
}

#[tokio::test]
async fn unsupported_language_is_bad_request() {
    let request = post_json(
        "/api/translate",
        json!({"text": "Hello", "source_lang": "xx", "target_lang": "en"}),
    );
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unsupported_language");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let request = post_json(
        "/api/translate",
        json!({"text": "", "source_lang": "en", "target_lang": "fr"}),
    );
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn routeless_pair_is_service_unavailable() {
    let request = post_json(
        "/api/translate",
        json!({"text": "Sawubona", "source_lang": "zu", "target_lang": "en"}),
    );
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "model_unavailable");
}

#[tokio::test]
async fn batch_translates_each_text() {
    let request = post_json(
        "/api/translate/batch",
        json!({"texts": ["one", "two"], "source_lang": "en", "target_lang": "fr"}),
    );
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["batch_metrics"]["total_texts"], 2);
    assert_eq!(body["batch_metrics"]["successful"], 2);
    assert_eq!(body["translations"][0]["success"], true);
}

#[tokio::test]
async fn languages_catalog_is_grouped_and_counted() {
    let response = app()
        .oneshot(get("/api/languages"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["languages"]["all"]["ny"], "Chichewa");
    assert_eq!(body["languages"]["by_region"]["african"]["sw"], "Swahili");
    assert_eq!(body["languages"]["unavailable"]["zu"], "Zulu");
    assert_eq!(body["statistics"]["total_languages"], 26);
}

#[tokio::test]
async fn language_details_and_unknown_code() {
    let response = app()
        .oneshot(get("/api/languages/sw"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Swahili");
    assert_eq!(body["region"], "african");
    assert_eq!(body["available"], true);

    let response = app()
        .oneshot(get("/api/languages/xx"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unsupported_language");
}

#[tokio::test]
async fn translate_info_describes_pivot() {
    let response = app()
        .oneshot(get("/api/translate/info?source_lang=sw&target_lang=ny"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["translation_info"]["translation_type"], "pivot");
    assert_eq!(body["translation_info"]["path"], "sw -> en -> ny");
    assert_eq!(body["language_names"]["source"], "Swahili");
}
