// Translation layer
//
// - Translator: the backend seam, one batch call per target language
// - DeepL: REST implementation of the seam
// - Orchestrator: concurrent fan-out of one batch across many languages
// - Language: code normalization and catalog/backend mapping

pub mod deepl;
pub mod language;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use orchestrator::{LanguageTranslation, Orchestrator, OutcomeStatus, TranslationJob, TranslationOutcome};
use crate::config::TranslateConfig;
use crate::error::Result;

/// Main trait for translation backends
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate an ordered batch; the result should have one entry per input
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>>;

    /// Target languages the backend supports, in catalog form
    async fn languages(&self) -> Result<Vec<String>>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the default translator implementation (DeepL-compatible REST)
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn Translator>> {
        Ok(Box::new(deepl::DeeplTranslator::new(config)?))
    }
}
