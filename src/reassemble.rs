//! Maps translated batches back onto the structure they were taken from.

use tracing::warn;

use crate::error::Result;
use crate::metadata::{FieldLayout, FieldPacker};
use crate::subtitle::SegmentedDocument;
use crate::translate::TranslationOutcome;

/// A source structure that can rebuild itself from a translated batch.
pub trait Reassemble {
    type Artifact;

    fn reassemble(&self, translated: &[String]) -> Result<Self::Artifact>;
}

impl Reassemble for SegmentedDocument {
    type Artifact = SegmentedDocument;

    fn reassemble(&self, translated: &[String]) -> Result<SegmentedDocument> {
        self.with_texts(translated)
    }
}

/// Packed metadata fields awaiting their translation.
#[derive(Debug, Clone)]
pub struct PackedFields {
    packer: FieldPacker,
    layout: FieldLayout,
}

impl PackedFields {
    pub fn new(packer: FieldPacker, layout: FieldLayout) -> Self {
        Self { packer, layout }
    }
}

impl Reassemble for PackedFields {
    type Artifact = Vec<String>;

    fn reassemble(&self, translated: &[String]) -> Result<Vec<String>> {
        self.packer.unpack_fields(&self.layout, translated)
    }
}

/// Artifact for one target language, or why there is none.
#[derive(Debug)]
pub struct LanguageArtifact<A> {
    pub language: String,
    pub artifact: Result<A>,
}

/// Reassemble every successful language of an outcome, keeping each
/// failure in place so positions still line up with the requested order.
pub fn reassemble_outcome<R: Reassemble>(
    source: &R,
    outcome: TranslationOutcome,
) -> Vec<LanguageArtifact<R::Artifact>> {
    outcome
        .into_results()
        .into_iter()
        .map(|translation| {
            let artifact = translation
                .result
                .and_then(|texts| source.reassemble(&texts))
                .inspect_err(|e| warn!("No artifact for {}: {}", translation.language, e));
            LanguageArtifact {
                language: translation.language,
                artifact,
            }
        })
        .collect()
}
