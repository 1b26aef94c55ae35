use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::translate::TranslationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: Arc<TranslationService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let translator = Arc::new(TranslationService::new(&config.translation_config));
        Self::with_translator(config, translator)
    }

    /// Build state around an existing service; used by tests to inject
    /// a mock backend.
    pub fn with_translator(config: Config, translator: Arc<TranslationService>) -> Self {
        Self {
            config,
            translator,
            started_at: Utc::now(),
        }
    }
}
