//! Types and the backend trait for the translation service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// A single translation request as validated by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslateRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Outcome of a successful translation.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    /// "direct" or "pivot".
    pub translation_type: String,
    /// Human-readable route, e.g. "sw -> en -> yo".
    pub translation_path: String,
    pub elapsed_ms: u64,
    pub cached: bool,
}

/// One item of a batch translation; failed items carry an error
/// message instead of failing the whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub items: Vec<BatchItem>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

/// Mechanism seam: runs one model pass for a pair that has a direct
/// model. The service layers validation, caching, and pivot routing on
/// top of this.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate_with_model(
        &self,
        text: &str,
        model_id: &str,
    ) -> Result<String, TranslateError>;

    /// Number of models currently resident in memory.
    fn loaded_models(&self) -> usize;

    /// Label of the compute device backing the models.
    fn device(&self) -> String;
}
