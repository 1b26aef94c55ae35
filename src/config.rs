use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translation_config: TranslationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Maximum characters for a single translation request.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    /// Maximum texts per batch request.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Maximum characters per text inside a batch.
    #[serde(default = "default_max_batch_text_length")]
    pub max_batch_text_length: usize,
    /// Result cache lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Token budget for encoder input; longer inputs are truncated.
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,
    /// Decode budget per model pass.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: usize,
    /// "auto", "cpu", "cuda" or "metal".
    #[serde(default = "default_device")]
    pub device: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_text_length() -> usize {
    1000
}

fn default_max_batch_size() -> usize {
    10
}

fn default_max_batch_text_length() -> usize {
    500
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_max_input_tokens() -> usize {
    512
}

fn default_max_output_tokens() -> usize {
    512
}

fn default_device() -> String {
    "auto".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            max_batch_size: default_max_batch_size(),
            max_batch_text_length: default_max_batch_text_length(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_input_tokens: default_max_input_tokens(),
            max_output_tokens: default_max_output_tokens(),
            device: default_device(),
        }
    }
}

impl Config {
    /// Load from a YAML or JSON file, decided by extension.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }
}
