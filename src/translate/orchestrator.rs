use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CcError, Result};
use super::Translator;

/// One fan-out run: the same ordered texts translated into every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub source_language: String,
    pub source_texts: Vec<String>,
    /// Outcome entries follow this order
    pub target_languages: Vec<String>,
}

impl TranslationJob {
    pub fn new(
        source_language: impl Into<String>,
        source_texts: Vec<String>,
        target_languages: Vec<String>,
    ) -> Self {
        Self {
            source_language: source_language.into(),
            source_texts,
            target_languages,
        }
    }
}

/// Result of translating the whole batch into one target language.
#[derive(Debug)]
pub struct LanguageTranslation {
    pub language: String,
    pub result: Result<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Every target language succeeded
    Complete,
    /// Some languages succeeded, some failed
    Partial,
    /// No language succeeded
    Failed,
}

#[derive(Debug)]
pub struct TranslationOutcome {
    results: Vec<LanguageTranslation>,
}

impl TranslationOutcome {
    pub fn results(&self) -> &[LanguageTranslation] {
        &self.results
    }

    pub fn into_results(self) -> Vec<LanguageTranslation> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.results.iter().filter_map(|r| match &r.result {
            Ok(texts) => Some((r.language.as_str(), texts.as_slice())),
            Err(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CcError)> {
        self.results.iter().filter_map(|r| match &r.result {
            Ok(_) => None,
            Err(e) => Some((r.language.as_str(), e)),
        })
    }

    pub fn status(&self) -> OutcomeStatus {
        let succeeded = self.successes().count();
        if succeeded == self.results.len() {
            OutcomeStatus::Complete
        } else if succeeded == 0 {
            OutcomeStatus::Failed
        } else {
            OutcomeStatus::Partial
        }
    }
}

/// Fans a job out to the translator, one concurrent call per language.
pub struct Orchestrator<'a> {
    translator: &'a dyn Translator,
}

impl<'a> Orchestrator<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self { translator }
    }

    /// Translate into every target and wait for all calls to settle.
    pub async fn translate(&self, job: &TranslationJob) -> TranslationOutcome {
        info!(
            "Translating {} texts from {} into {} languages",
            job.source_texts.len(),
            job.source_language,
            job.target_languages.len()
        );

        let calls = job
            .target_languages
            .iter()
            .map(|target| self.translate_one(job, target));
        let settled = join_all(calls).await;

        let results = job
            .target_languages
            .iter()
            .zip(settled)
            .map(|(language, result)| LanguageTranslation {
                language: language.clone(),
                result,
            })
            .collect();

        let outcome = TranslationOutcome { results };
        debug!("Translation outcome: {:?}", outcome.status());
        outcome
    }

    /// Like `translate`, but resolves to `Cancelled` as soon as the token
    /// fires. Pending calls are dropped and no partial results escape.
    pub async fn translate_with_cancel(
        &self,
        job: &TranslationJob,
        cancel: &CancellationToken,
    ) -> Result<TranslationOutcome> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Translation job from {} cancelled", job.source_language);
                Err(CcError::Cancelled)
            }
            outcome = self.translate(job) => Ok(outcome),
        }
    }

    async fn translate_one(&self, job: &TranslationJob, target: &str) -> Result<Vec<String>> {
        let translated = self
            .translator
            .translate(&job.source_texts, &job.source_language, target)
            .await
            .inspect_err(|e| warn!("Translation to {} failed: {}", target, e))?;

        if translated.len() != job.source_texts.len() {
            warn!(
                "Translation to {} returned {} texts for {} inputs",
                target,
                translated.len(),
                job.source_texts.len()
            );
            return Err(CcError::TranslationSizeMismatch {
                language: target.to_string(),
                expected: job.source_texts.len(),
                actual: translated.len(),
            });
        }

        debug!("Translation to {} completed", target);
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::testing::StubTranslator;
    use std::time::Duration;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn job(targets: &[&str]) -> TranslationJob {
        TranslationJob::new("en", strings(&["Hello", "World"]), strings(targets))
    }

    #[tokio::test]
    async fn test_all_languages_succeed() {
        let translator = StubTranslator::tagging();
        let outcome = Orchestrator::new(&translator).translate(&job(&["de", "fr"])).await;

        assert_eq!(outcome.status(), OutcomeStatus::Complete);
        let successes: Vec<_> = outcome.successes().collect();
        assert_eq!(successes[0].0, "de");
        assert_eq!(successes[0].1, strings(&["[de] Hello", "[de] World"]).as_slice());
        assert_eq!(successes[1].1, strings(&["[fr] Hello", "[fr] World"]).as_slice());
        assert_eq!(translator.calls(), 2);
    }

    #[tokio::test]
    async fn test_order_follows_request_not_completion() {
        let translator = StubTranslator::tagging()
            .with_delay("de", Duration::from_millis(80))
            .with_delay("fr", Duration::from_millis(40));
        let outcome = Orchestrator::new(&translator)
            .translate(&job(&["de", "fr", "ja"]))
            .await;

        let languages: Vec<&str> = outcome.results().iter().map(|r| r.language.as_str()).collect();
        assert_eq!(languages, vec!["de", "fr", "ja"]);
        for result in outcome.results() {
            let texts = result.result.as_ref().unwrap();
            assert!(texts[0].starts_with(&format!("[{}]", result.language)));
        }
    }

    #[tokio::test]
    async fn test_calls_run_concurrently() {
        let translator = StubTranslator::tagging()
            .with_delay("de", Duration::from_millis(200))
            .with_delay("fr", Duration::from_millis(200))
            .with_delay("ja", Duration::from_millis(200));

        let started = std::time::Instant::now();
        let outcome = Orchestrator::new(&translator)
            .translate(&job(&["de", "fr", "ja"]))
            .await;

        assert_eq!(outcome.status(), OutcomeStatus::Complete);
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let without_b = {
            let translator = StubTranslator::tagging();
            Orchestrator::new(&translator).translate(&job(&["de", "ja"])).await
        };

        let translator = StubTranslator::tagging()
            .failing("fr")
            .with_delay("de", Duration::from_millis(30));
        let outcome = Orchestrator::new(&translator)
            .translate(&job(&["de", "fr", "ja"]))
            .await;

        assert_eq!(outcome.status(), OutcomeStatus::Partial);
        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "fr");
        assert!(matches!(failures[0].1, CcError::Backend(_)));

        let with_b: Vec<_> = outcome.successes().collect();
        let expected: Vec<_> = without_b.successes().collect();
        assert_eq!(with_b, expected);
    }

    #[tokio::test]
    async fn test_short_batch_is_a_failure() {
        let translator = StubTranslator::tagging().dropping_last("de");
        let outcome = Orchestrator::new(&translator).translate(&job(&["de", "fr"])).await;

        match &outcome.results()[0].result {
            Err(CcError::TranslationSizeMismatch { language, expected, actual }) => {
                assert_eq!(language, "de");
                assert_eq!(*expected, 2);
                assert_eq!(*actual, 1);
            }
            other => panic!("expected size mismatch, got {:?}", other),
        }
        assert!(outcome.results()[1].result.is_ok());
        assert_eq!(outcome.status(), OutcomeStatus::Partial);
    }

    #[tokio::test]
    async fn test_every_language_failing() {
        let translator = StubTranslator::tagging().failing("de").failing("fr");
        let outcome = Orchestrator::new(&translator).translate(&job(&["de", "fr"])).await;
        assert_eq!(outcome.status(), OutcomeStatus::Failed);
        assert_eq!(outcome.failures().count(), 2);
    }

    #[tokio::test]
    async fn test_cancel_discards_pending_results() {
        let translator = StubTranslator::tagging().with_delay("fr", Duration::from_secs(30));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = Orchestrator::new(&translator)
            .translate_with_cancel(&job(&["de", "fr"]), &cancel)
            .await;
        assert!(matches!(result, Err(CcError::Cancelled)));
    }

    #[tokio::test]
    async fn test_uncancelled_job_completes() {
        let translator = StubTranslator::tagging();
        let cancel = CancellationToken::new();
        let outcome = Orchestrator::new(&translator)
            .translate_with_cancel(&job(&["de"]), &cancel)
            .await
            .unwrap();
        assert_eq!(outcome.status(), OutcomeStatus::Complete);
    }
}
