pub mod cache;
pub mod interface;
pub mod languages;
pub mod marian;
pub mod registry;
pub mod service;
pub mod tokenizer;

pub use interface::{TranslateRequest, TranslationBackend, TranslationOutcome};
pub use service::TranslationService;
