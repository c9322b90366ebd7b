//! In-process translator double for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CcError, Result};
use super::Translator;

pub(crate) struct StubTranslator {
    transform: fn(&str, &str) -> String,
    failing: Vec<String>,
    dropping_last: Vec<String>,
    delays: HashMap<String, Duration>,
    languages: Vec<String>,
    calls: AtomicUsize,
}

impl StubTranslator {
    pub(crate) fn new(transform: fn(&str, &str) -> String) -> Self {
        Self {
            transform,
            failing: Vec::new(),
            dropping_last: Vec::new(),
            delays: HashMap::new(),
            languages: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// `Hello` -> `[de] Hello`
    pub(crate) fn tagging() -> Self {
        Self::new(|text, target| format!("[{}] {}", target, text))
    }

    pub(crate) fn uppercase() -> Self {
        Self::new(|text, _| text.to_uppercase())
    }

    pub(crate) fn exclaiming() -> Self {
        Self::new(|text, _| format!("{}!", text))
    }

    pub(crate) fn failing(mut self, language: &str) -> Self {
        self.failing.push(language.to_string());
        self
    }

    pub(crate) fn dropping_last(mut self, language: &str) -> Self {
        self.dropping_last.push(language.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, language: &str, delay: Duration) -> Self {
        self.delays.insert(language.to_string(), delay);
        self
    }

    pub(crate) fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(target_language) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|l| l == target_language) {
            return Err(CcError::Backend(format!("stub refuses {}", target_language)));
        }

        let mut translated: Vec<String> = texts
            .iter()
            .map(|text| (self.transform)(text, target_language))
            .collect();
        if self.dropping_last.iter().any(|l| l == target_language) {
            translated.pop();
        }
        Ok(translated)
    }

    async fn languages(&self) -> Result<Vec<String>> {
        Ok(self.languages.clone())
    }
}
