use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::TranslateError;
use crate::state::AppState;
use crate::translate::languages::{self, Region, LANGUAGES};
use crate::translate::TranslateRequest;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/translate", post(translate))
        .route("/api/translate/batch", post(translate_batch))
        .route("/api/translate/info", get(translate_info))
        .route("/api/languages", get(list_languages))
        .route("/api/languages/:code", get(language_details))
        .route("/api/health", get(health_check))
        .route("/api/status", get(system_status))
}

#[derive(Debug, Deserialize)]
struct ApiTranslateRequest {
    #[serde(default)]
    text: String,
    #[serde(default = "default_source")]
    source_lang: String,
    #[serde(default = "default_target")]
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct ApiBatchRequest {
    #[serde(default)]
    texts: Vec<String>,
    #[serde(default = "default_source")]
    source_lang: String,
    #[serde(default = "default_target")]
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct RoutePairParams {
    #[serde(default = "default_source")]
    source_lang: String,
    #[serde(default = "default_target")]
    target_lang: String,
}

fn default_source() -> String {
    "en".to_string()
}

fn default_target() -> String {
    "es".to_string()
}

async fn translate(
    State(state): State<AppState>,
    Json(payload): Json<ApiTranslateRequest>,
) -> Result<Json<Value>, TranslateError> {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let request = TranslateRequest::new(payload.text, payload.source_lang, payload.target_lang);
    let outcome = state.translator.translate(&request).await?;
    let response_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        %request_id,
        source = %outcome.source_lang,
        target = %outcome.target_lang,
        cached = outcome.cached,
        response_time_ms,
        "translate request served"
    );

    Ok(Json(json!({
        "original_text": request.text.trim(),
        "translated_text": outcome.translated_text,
        "source_lang": outcome.source_lang,
        "target_lang": outcome.target_lang,
        "translation_type": outcome.translation_type,
        "translation_path": outcome.translation_path,
        "response_time_ms": response_time_ms,
        "cached": outcome.cached,
        "success": true,
    })))
}

async fn translate_batch(
    State(state): State<AppState>,
    Json(payload): Json<ApiBatchRequest>,
) -> Result<Json<Value>, TranslateError> {
    let batch = state
        .translator
        .translate_batch(&payload.texts, &payload.source_lang, &payload.target_lang)
        .await?;

    let success_rate = if batch.total > 0 {
        (batch.successful as f64 / batch.total as f64) * 100.0
    } else {
        0.0
    };

    Ok(Json(json!({
        "translations": batch.items,
        "source_lang": payload.source_lang.trim().to_lowercase(),
        "target_lang": payload.target_lang.trim().to_lowercase(),
        "batch_metrics": {
            "total_texts": batch.total,
            "successful": batch.successful,
            "failed": batch.failed,
            "success_rate": (success_rate * 10.0).round() / 10.0,
            "response_time_ms": batch.elapsed_ms,
        },
        "success": true,
    })))
}

async fn translate_info(
    State(state): State<AppState>,
    Query(params): Query<RoutePairParams>,
) -> Result<Json<Value>, TranslateError> {
    let info = state
        .translator
        .route_info(&params.source_lang, &params.target_lang)?;
    let source = params.source_lang.trim().to_lowercase();
    let target = params.target_lang.trim().to_lowercase();

    Ok(Json(json!({
        "source_lang": source,
        "target_lang": target,
        "translation_info": info,
        "language_names": {
            "source": languages::language(&source).map(|l| l.name),
            "target": languages::language(&target).map(|l| l.name),
        },
        "success": true,
    })))
}

async fn list_languages() -> Json<Value> {
    let available = languages::available_codes();

    let mut all = BTreeMap::new();
    let mut by_region: BTreeMap<&str, BTreeMap<&str, &str>> = BTreeMap::new();
    let mut unavailable = BTreeMap::new();
    for lang in LANGUAGES {
        all.insert(lang.code, lang.name);
        let region = match lang.region {
            Region::European => "european",
            Region::Asian => "asian",
            Region::MiddleEastern => "middle_eastern",
            Region::African => "african",
        };
        by_region.entry(region).or_default().insert(lang.code, lang.name);
        if !available.contains(&lang.code) {
            unavailable.insert(lang.code, lang.name);
        }
    }

    let total = LANGUAGES.len();
    let total_available = available.len();
    let coverage = (total_available as f64 / total as f64) * 100.0;

    Json(json!({
        "languages": {
            "all": all,
            "by_region": by_region,
            "available": available,
            "unavailable": unavailable,
        },
        "statistics": {
            "total_languages": total,
            "total_available": total_available,
            "total_unavailable": total - total_available,
            "coverage_percentage": (coverage * 10.0).round() / 10.0,
        },
        "success": true,
    }))
}

async fn language_details(
    Path(code): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let code = code.trim().to_lowercase();
    let lang = languages::language(&code).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("language \"{code}\" is not supported"),
                "code": "unsupported_language",
                "success": false,
            })),
        )
    })?;

    let pairs: Vec<Value> = languages::direct_pairs_for(&code)
        .into_iter()
        .map(|(s, t)| json!({ "source": s, "target": t }))
        .collect();
    let available = languages::available_codes().contains(&lang.code);
    let total_direct_pairs = pairs.len();

    Ok(Json(json!({
        "code": lang.code,
        "name": lang.name,
        "region": lang.region,
        "available": available,
        "direct_pairs": pairs,
        "total_direct_pairs": total_direct_pairs,
        "success": true,
    })))
}

async fn system_status(State(state): State<AppState>) -> Json<Value> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds();
    Json(json!({
        "system": {
            "service": "translator-backend",
            "version": env!("CARGO_PKG_VERSION"),
            "device": state.translator.device(),
            "uptime_secs": uptime_secs,
        },
        "translation_service": {
            "supported_languages": LANGUAGES.len(),
            "available_languages": languages::available_codes().len(),
            "model_mappings": languages::MODEL_PAIRS.len(),
            "loaded_models": state.translator.loaded_models(),
            "cached_results": state.translator.cached_results(),
        },
        "timestamp": Utc::now().to_rfc3339(),
        "success": true,
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds();
    Json(json!({
        "status": "healthy",
        "service": "translator-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_secs": uptime_secs,
        "metrics": {
            "supported_languages": LANGUAGES.len(),
            "available_languages": languages::available_codes().len(),
            "loaded_models": state.translator.loaded_models(),
            "cached_results": state.translator.cached_results(),
        },
        "success": true,
    }))
}
