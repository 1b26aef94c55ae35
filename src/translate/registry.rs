//! Lazy model registry.
//!
//! Models are loaded on first use and stay resident for the life of
//! the process. Concurrent first access for the same model identifier
//! joins a single in-flight load instead of downloading weights twice;
//! a failed load leaves the slot empty so a later request retries.

use std::sync::Arc;

use async_trait::async_trait;
use candle_core::Device;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::translate::interface::TranslationBackend;
use crate::translate::marian::{select_device, MarianModel};

/// Produces resident model handles for the registry. The seam keeps
/// the registry's concurrency behavior independent of the hub.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    type Handle: Send + Sync + 'static;

    async fn load(&self, model_id: &str) -> Result<Self::Handle, TranslateError>;
}

pub struct ModelRegistry<L: ModelLoader> {
    loader: L,
    cells: DashMap<String, Arc<OnceCell<Arc<L::Handle>>>>,
}

impl<L: ModelLoader> ModelRegistry<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            cells: DashMap::new(),
        }
    }

    /// Return the resident handle for `model_id`, loading it first if
    /// needed. At most one load per identifier is in flight.
    pub async fn get_or_load(&self, model_id: &str) -> Result<Arc<L::Handle>, TranslateError> {
        let cell = self
            .cells
            .entry(model_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let handle = cell
            .get_or_try_init(|| async { self.loader.load(model_id).await.map(Arc::new) })
            .await?;
        Ok(handle.clone())
    }

    pub fn loaded(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.value().initialized())
            .count()
    }
}

/// Loads Marian weights off the async runtime onto the selected
/// compute device.
pub struct MarianLoader {
    device: Device,
    max_input_tokens: usize,
    max_output_tokens: usize,
}

impl MarianLoader {
    pub fn new(cfg: &TranslationConfig) -> Self {
        let device = select_device(&cfg.device);
        info!(device = ?device, "model loader initialized");
        Self {
            device,
            max_input_tokens: cfg.max_input_tokens,
            max_output_tokens: cfg.max_output_tokens,
        }
    }

    pub fn device_label(&self) -> String {
        format!("{:?}", self.device)
    }
}

#[async_trait]
impl ModelLoader for MarianLoader {
    type Handle = MarianModel;

    async fn load(&self, model_id: &str) -> Result<MarianModel, TranslateError> {
        let id = model_id.to_string();
        let device = self.device.clone();
        let max_input = self.max_input_tokens;
        let max_output = self.max_output_tokens;
        tokio::task::spawn_blocking(move || MarianModel::load(&id, &device, max_input, max_output))
            .await
            .map_err(|e| TranslateError::ModelUnavailable(format!("model load task failed: {e}")))?
    }
}

/// Production backend: resolves model identifiers through the registry
/// and runs inference off the async runtime.
pub struct MarianBackend {
    registry: ModelRegistry<MarianLoader>,
    device_label: String,
}

impl MarianBackend {
    pub fn new(cfg: &TranslationConfig) -> Self {
        let loader = MarianLoader::new(cfg);
        let device_label = loader.device_label();
        Self {
            registry: ModelRegistry::new(loader),
            device_label,
        }
    }
}

#[async_trait]
impl TranslationBackend for MarianBackend {
    async fn translate_with_model(
        &self,
        text: &str,
        model_id: &str,
    ) -> Result<String, TranslateError> {
        let model = self.registry.get_or_load(model_id).await?;
        let text = text.to_string();
        let output = tokio::task::spawn_blocking(move || model.translate(&text))
            .await
            .map_err(|e| TranslateError::Inference(format!("inference task failed: {e}")))??;
        if output.is_empty() {
            return Err(TranslateError::Inference(format!(
                "{model_id} produced empty output"
            )));
        }
        Ok(output)
    }

    fn loaded_models(&self) -> usize {
        self.registry.loaded()
    }

    fn device(&self) -> String {
        self.device_label.clone()
    }
}
