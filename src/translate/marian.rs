//! Marian encoder-decoder engine on top of candle.
//!
//! One `MarianModel` wraps the weights and tokenizer for a single
//! Helsinki-NLP direct pair. Loading pulls config, vocab, the source
//! SentencePiece model and safetensors from the HuggingFace hub
//! (cached on disk by hf-hub); decoding is greedy. The inner model is
//! behind a mutex because the decoder KV cache is stateful.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::marian;
use hf_hub::api::sync::Api;
use tracing::{info, warn};

use crate::error::TranslateError;
use crate::translate::tokenizer::MarianTokenizer;

pub struct MarianModel {
    model: Mutex<marian::MTModel>,
    tokenizer: MarianTokenizer,
    config: marian::Config,
    device: Device,
    model_id: String,
    max_input_tokens: usize,
    max_output_tokens: usize,
}

impl MarianModel {
    /// Fetch and build the model for `model_id`. Blocking; callers run
    /// this inside `spawn_blocking`.
    pub fn load(
        model_id: &str,
        device: &Device,
        max_input_tokens: usize,
        max_output_tokens: usize,
    ) -> std::result::Result<Self, TranslateError> {
        info!(model = model_id, "loading translation model");
        Self::fetch_and_build(model_id, device, max_input_tokens, max_output_tokens).map_err(|e| {
            warn!(model = model_id, "model load failed: {e:#}");
            TranslateError::ModelUnavailable(format!("failed to load model {model_id}: {e}"))
        })
    }

    fn fetch_and_build(
        model_id: &str,
        device: &Device,
        max_input_tokens: usize,
        max_output_tokens: usize,
    ) -> Result<Self> {
        let (config, tokenizer, weights_file) = Self::fetch(model_id)?;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_file], DType::F32, device)?
        };
        let model = marian::MTModel::new(&config, vb)?;
        info!(model = model_id, "translation model ready");
        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device: device.clone(),
            model_id: model_id.to_string(),
            max_input_tokens,
            max_output_tokens,
        })
    }

    // The opus-mt repos ship no converted tokenizer.json; the
    // tokenizer is rebuilt from vocab.json plus source.spm.
    fn fetch(model_id: &str) -> Result<(marian::Config, MarianTokenizer, PathBuf)> {
        let api = Api::new()?;
        let repo = api.model(model_id.to_string());
        let config_file = repo
            .get("config.json")
            .with_context(|| format!("fetching config.json for {model_id}"))?;
        let vocab_file = repo
            .get("vocab.json")
            .with_context(|| format!("fetching vocab.json for {model_id}"))?;
        let spm_file = repo
            .get("source.spm")
            .with_context(|| format!("fetching source.spm for {model_id}"))?;
        let weights_file = repo
            .get("model.safetensors")
            .with_context(|| format!("fetching model.safetensors for {model_id}"))?;

        let config: marian::Config =
            serde_json::from_str(&std::fs::read_to_string(&config_file)?)
                .with_context(|| format!("parsing config.json for {model_id}"))?;
        let tokenizer = MarianTokenizer::from_files(&vocab_file, &spm_file)
            .with_context(|| format!("building tokenizer for {model_id}"))?;
        Ok((config, tokenizer, weights_file))
    }

    /// Translate one text. Blocking; callers run this inside
    /// `spawn_blocking`.
    pub fn translate(&self, text: &str) -> std::result::Result<String, TranslateError> {
        self.run(text).map_err(|e| {
            TranslateError::Inference(format!("{}: {e}", self.model_id))
        })
    }

    fn run(&self, text: &str) -> Result<String> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| anyhow!("model mutex poisoned"))?;
        model.reset_kv_cache();

        let mut input_ids = self.tokenizer.encode(text)?;
        if input_ids.len() > self.max_input_tokens {
            input_ids.truncate(self.max_input_tokens);
        }
        input_ids.push(self.config.eos_token_id);

        let input = Tensor::new(input_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let encoder_xs = model.encoder().forward(&input, 0)?;

        // Greedy decode: temperature-free sampling is argmax.
        let mut logits_processor = LogitsProcessor::new(1337, None, None);
        let mut token_ids = vec![self.config.decoder_start_token_id];
        for index in 0..self.max_output_tokens {
            // After the first step only the newest token is fed; the KV
            // cache carries the rest.
            let context_size = if index >= 1 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len().saturating_sub(context_size);
            let step_input = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;
            let logits = model.decode(&step_input, &encoder_xs, start_pos)?;
            let logits = logits.squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?.to_dtype(DType::F32)?;
            let token = logits_processor.sample(&logits)?;
            if token == self.config.eos_token_id || token == self.config.forced_eos_token_id {
                break;
            }
            token_ids.push(token);
        }

        let skip = [
            self.config.pad_token_id,
            self.config.eos_token_id,
            self.config.forced_eos_token_id,
            self.tokenizer.unk_id(),
        ];
        Ok(self.tokenizer.decode(&token_ids[1..], &skip))
    }
}

/// Pick the compute device from the configured preference.
pub fn select_device(preference: &str) -> Device {
    match preference {
        "cpu" => Device::Cpu,
        "cuda" => Device::new_cuda(0).unwrap_or_else(|e| {
            warn!("failed to initialize CUDA ({e}), falling back to CPU");
            Device::Cpu
        }),
        "metal" => Device::new_metal(0).unwrap_or_else(|e| {
            warn!("failed to initialize Metal ({e}), falling back to CPU");
            Device::Cpu
        }),
        _ => {
            if candle_core::utils::cuda_is_available() {
                Device::new_cuda(0).unwrap_or_else(|e| {
                    warn!("failed to initialize CUDA ({e}), falling back to CPU");
                    Device::Cpu
                })
            } else if candle_core::utils::metal_is_available() {
                Device::new_metal(0).unwrap_or_else(|e| {
                    warn!("failed to initialize Metal ({e}), falling back to CPU");
                    Device::Cpu
                })
            } else {
                Device::Cpu
            }
        }
    }
}
