//! Translation service: validation, result caching and route policy on
//! top of a [`TranslationBackend`].
//!
//! Pivot policy: pairs without a direct model translate through
//! English when both legs exist; anything else fails with
//! `model_unavailable` before any model work starts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::translate::cache::ResultCache;
use crate::translate::interface::{
    BatchItem, BatchOutcome, TranslateRequest, TranslationBackend, TranslationOutcome,
};
use crate::translate::languages::{self, Route};
use crate::translate::registry::MarianBackend;

/// Route description for the introspection endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RouteInfo {
    pub translation_type: String,
    pub path: String,
    pub available: bool,
}

pub struct TranslationService {
    backend: Arc<dyn TranslationBackend>,
    cache: ResultCache,
    limits: TranslationConfig,
}

impl TranslationService {
    pub fn new(cfg: &TranslationConfig) -> Self {
        Self::with_backend(cfg.clone(), Arc::new(MarianBackend::new(cfg)))
    }

    pub fn with_backend(limits: TranslationConfig, backend: Arc<dyn TranslationBackend>) -> Self {
        let cache = ResultCache::new(Duration::from_secs(limits.cache_ttl_secs));
        Self {
            backend,
            cache,
            limits,
        }
    }

    /// Translate one request. See the module docs for the route policy.
    pub async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslationOutcome, TranslateError> {
        let start = Instant::now();
        let (source, target) = self.validate_pair(&request.source_lang, &request.target_lang)?;
        let text = self.validate_text(&request.text, self.limits.max_text_length)?;

        let route = languages::resolve_route(&source, &target).ok_or_else(|| {
            TranslateError::ModelUnavailable(format!(
                "no translation model available for {source} -> {target}"
            ))
        })?;

        let cache_key = ResultCache::key(&source, &target, &text);
        if let Some(translated_text) = self.cache.get(&cache_key) {
            debug!(%source, %target, "cache hit");
            return Ok(self.outcome(translated_text, &source, &target, &route, start, true));
        }

        let translated_text = self.run_route(&text, &route).await?;
        self.cache.insert(cache_key, translated_text.clone());

        info!(
            %source,
            %target,
            kind = route.kind(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "translation completed"
        );
        Ok(self.outcome(translated_text, &source, &target, &route, start, false))
    }

    /// Translate up to `max_batch_size` texts independently; per-item
    /// failures do not abort the batch.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<BatchOutcome, TranslateError> {
        let start = Instant::now();
        let (source, target) = self.validate_pair(source_lang, target_lang)?;

        if texts.is_empty() {
            return Err(TranslateError::InvalidInput("texts array is required".into()));
        }
        if texts.len() > self.limits.max_batch_size {
            return Err(TranslateError::InvalidInput(format!(
                "maximum {} texts allowed per batch",
                self.limits.max_batch_size
            )));
        }
        for (i, text) in texts.iter().enumerate() {
            if text.chars().count() > self.limits.max_batch_text_length {
                return Err(TranslateError::InvalidInput(format!(
                    "text {} too long, maximum {} characters per text",
                    i + 1,
                    self.limits.max_batch_text_length
                )));
            }
        }
        // The route must exist before any model work begins.
        languages::resolve_route(&source, &target).ok_or_else(|| {
            TranslateError::ModelUnavailable(format!(
                "no translation model available for {source} -> {target}"
            ))
        })?;

        let mut items = Vec::with_capacity(texts.len());
        for text in texts {
            let request = TranslateRequest::new(text.clone(), source.clone(), target.clone());
            match self.translate(&request).await {
                Ok(outcome) => items.push(BatchItem {
                    original: text.clone(),
                    translated: Some(outcome.translated_text),
                    error: None,
                    success: true,
                }),
                Err(e) => items.push(BatchItem {
                    original: text.clone(),
                    translated: None,
                    error: Some(e.to_string()),
                    success: false,
                }),
            }
        }

        let successful = items.iter().filter(|i| i.success).count();
        Ok(BatchOutcome {
            total: items.len(),
            successful,
            failed: items.len() - successful,
            items,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Describe how a pair would be translated, without loading models.
    pub fn route_info(
        &self,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<RouteInfo, TranslateError> {
        let (source, target) = self.validate_pair(source_lang, target_lang)?;
        Ok(match languages::resolve_route(&source, &target) {
            Some(route) => RouteInfo {
                translation_type: route.kind().to_string(),
                path: route.describe(&source, &target),
                available: true,
            },
            None => RouteInfo {
                translation_type: "unavailable".to_string(),
                path: format!("{source} -> {target}"),
                available: false,
            },
        })
    }

    pub fn loaded_models(&self) -> usize {
        self.backend.loaded_models()
    }

    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    pub fn device(&self) -> String {
        self.backend.device()
    }

    async fn run_route(&self, text: &str, route: &Route) -> Result<String, TranslateError> {
        match route {
            Route::Direct(model) => self.backend.translate_with_model(text, model).await,
            Route::Pivot { to_english, from_english } => {
                let english = self.backend.translate_with_model(text, to_english).await?;
                self.backend.translate_with_model(&english, from_english).await
            }
        }
    }

    fn outcome(
        &self,
        translated_text: String,
        source: &str,
        target: &str,
        route: &Route,
        start: Instant,
        cached: bool,
    ) -> TranslationOutcome {
        TranslationOutcome {
            translated_text,
            source_lang: source.to_string(),
            target_lang: target.to_string(),
            translation_type: route.kind().to_string(),
            translation_path: route.describe(source, target),
            elapsed_ms: start.elapsed().as_millis() as u64,
            cached,
        }
    }

    fn validate_pair(
        &self,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<(String, String), TranslateError> {
        let source = source_lang.trim().to_lowercase();
        let target = target_lang.trim().to_lowercase();
        if !languages::is_supported(&source) {
            return Err(TranslateError::UnsupportedLanguage(source));
        }
        if !languages::is_supported(&target) {
            return Err(TranslateError::UnsupportedLanguage(target));
        }
        if source == target {
            return Err(TranslateError::InvalidInput(
                "source and target languages cannot be the same".into(),
            ));
        }
        Ok((source, target))
    }

    fn validate_text(&self, text: &str, max_len: usize) -> Result<String, TranslateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslateError::InvalidInput("text is required".into()));
        }
        if text.chars().count() > max_len {
            return Err(TranslateError::InvalidInput(format!(
                "text too long, maximum {max_len} characters allowed"
            )));
        }
        Ok(text.to_string())
    }
}
