use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::catalog::{CatalogFactory, VideoCatalog};
use crate::config::{Config, PipelineConfig};
use crate::error::{CcError, Result};
use crate::metadata::{FieldPacker, VideoMetadata};
use crate::reassemble::{reassemble_outcome, LanguageArtifact, PackedFields};
use crate::subtitle::SegmentedDocument;
use crate::translate::{language, Orchestrator, OutcomeStatus, TranslationJob, Translator, TranslatorFactory};

/// Which languages to translate into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Every language the translation backend supports
    All,
    List(Vec<String>),
}

impl Targets {
    /// `all` or a comma-separated list
    pub fn parse(list: &str) -> Self {
        if list.trim().eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::List(language::parse_list(list))
        }
    }
}

#[derive(Debug)]
pub enum Delivery {
    Delivered,
    TranslationFailed(CcError),
    /// The artifact was produced but could not be stored; it is kept in the
    /// report so the upload alone can be retried
    UploadFailed(CcError),
}

#[derive(Debug)]
pub struct LanguageReport<A> {
    pub language: String,
    pub artifact: Option<A>,
    pub delivery: Delivery,
}

impl<A> LanguageReport<A> {
    pub fn is_delivered(&self) -> bool {
        matches!(self.delivery, Delivery::Delivered)
    }
}

/// Per-language result of one flow, in requested order
#[derive(Debug)]
pub struct FlowReport<A> {
    pub video_id: String,
    pub source_language: String,
    pub languages: Vec<LanguageReport<A>>,
}

impl<A> FlowReport<A> {
    pub fn delivered(&self) -> impl Iterator<Item = &LanguageReport<A>> {
        self.languages.iter().filter(|l| l.is_delivered())
    }

    pub fn failed(&self) -> impl Iterator<Item = &LanguageReport<A>> {
        self.languages.iter().filter(|l| !l.is_delivered())
    }

    pub fn is_complete(&self) -> bool {
        self.languages.iter().all(|l| l.is_delivered())
    }

    pub fn status(&self) -> OutcomeStatus {
        let delivered = self.delivered().count();
        if delivered == self.languages.len() {
            OutcomeStatus::Complete
        } else if delivered == 0 {
            OutcomeStatus::Failed
        } else {
            OutcomeStatus::Partial
        }
    }
}

/// Both flows for one video. A missing caption track does not discard the
/// metadata that was already translated.
#[derive(Debug)]
pub struct ProcessReport {
    pub metadata: FlowReport<VideoMetadata>,
    pub captions: Result<FlowReport<String>>,
}

pub struct Pipeline {
    catalog: Box<dyn VideoCatalog>,
    translator: Box<dyn Translator>,
    packer: FieldPacker,
    skip_source_language: bool,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(
        catalog: Box<dyn VideoCatalog>,
        translator: Box<dyn Translator>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            translator,
            packer: FieldPacker::new(config.metadata_separator),
            skip_source_language: config.skip_source_language,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = CatalogFactory::create_catalog(config.catalog.clone())?;
        let translator = TranslatorFactory::create_translator(config.translate.clone())?;
        Ok(Self::new(catalog, translator, &config.pipeline))
    }

    /// Token that abandons every translation job still in flight.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn resolve_targets(&self, source_language: &str, targets: &Targets) -> Result<Vec<String>> {
        let requested = match targets {
            Targets::All => self.translator.languages().await?,
            Targets::List(list) => list.clone(),
        };

        let resolved = language::resolve_targets(source_language, &requested, self.skip_source_language);
        if resolved.is_empty() {
            warn!("No target languages left after resolving {:?}", targets);
        }
        Ok(resolved)
    }

    /// Translate the captions of a video and upload one track per language
    pub async fn translate_captions(
        &self,
        video_id: &str,
        source_language: &str,
        targets: &Targets,
    ) -> Result<FlowReport<String>> {
        let source_language = language::normalize(source_language);
        let targets = self.resolve_targets(&source_language, targets).await?;
        self.caption_flow(video_id, &source_language, targets).await
    }

    /// Translate title and description and upsert one record per language
    pub async fn translate_metadata(&self, video_id: &str, targets: &Targets) -> Result<FlowReport<VideoMetadata>> {
        let metadata = self.catalog.fetch_metadata(video_id).await?;
        let targets = self.resolve_targets(&metadata.language, targets).await?;
        self.metadata_flow(video_id, &metadata, targets).await
    }

    /// Metadata and captions of one video, with the metadata language as
    /// the source language of both
    pub async fn process_video(&self, video_id: &str, targets: &Targets) -> Result<ProcessReport> {
        info!("Processing video {}", video_id);

        let metadata = self.catalog.fetch_metadata(video_id).await?;
        let source_language = language::normalize(&metadata.language);
        let targets = self.resolve_targets(&source_language, targets).await?;

        let metadata_report = self.metadata_flow(video_id, &metadata, targets.clone()).await?;
        let captions = self.caption_flow(video_id, &source_language, targets).await;
        if let Err(e) = &captions {
            warn!("Captions of video {} not translated: {}", video_id, e);
        }

        Ok(ProcessReport {
            metadata: metadata_report,
            captions,
        })
    }

    async fn caption_flow(
        &self,
        video_id: &str,
        source_language: &str,
        targets: Vec<String>,
    ) -> Result<FlowReport<String>> {
        let raw = self.catalog.fetch_captions(video_id, source_language).await?;
        let document = SegmentedDocument::parse(&raw)?;
        info!("Video {} has {} caption segments in {}", video_id, document.len(), source_language);

        let job = TranslationJob::new(source_language, document.texts(), targets);
        let outcome = Orchestrator::new(self.translator.as_ref())
            .translate_with_cancel(&job, &self.cancel)
            .await?;

        let uploads = reassemble_outcome(&document, outcome)
            .into_iter()
            .map(|artifact| self.deliver_captions(video_id, artifact));
        let languages = join_all(uploads).await;

        Ok(FlowReport {
            video_id: video_id.to_string(),
            source_language: source_language.to_string(),
            languages,
        })
    }

    async fn deliver_captions(
        &self,
        video_id: &str,
        artifact: LanguageArtifact<SegmentedDocument>,
    ) -> LanguageReport<String> {
        let LanguageArtifact { language, artifact } = artifact;
        let document = match artifact {
            Ok(document) => document,
            Err(e) => {
                return LanguageReport {
                    language,
                    artifact: None,
                    delivery: Delivery::TranslationFailed(e),
                };
            }
        };

        let serialized = document.serialize();
        let delivery = match self.catalog.upload_captions(video_id, &language, &serialized).await {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                error!("Failed to upload {} captions of video {}: {}", language, video_id, e);
                Delivery::UploadFailed(e)
            }
        };

        LanguageReport {
            language,
            artifact: Some(serialized),
            delivery,
        }
    }

    async fn metadata_flow(
        &self,
        video_id: &str,
        metadata: &VideoMetadata,
        targets: Vec<String>,
    ) -> Result<FlowReport<VideoMetadata>> {
        let source_language = language::normalize(&metadata.language);
        let batch = self.packer.pack_fields(&[&metadata.title, &metadata.description]);

        let job = TranslationJob::new(source_language.as_str(), batch.texts, targets);
        let outcome = Orchestrator::new(self.translator.as_ref())
            .translate_with_cancel(&job, &self.cancel)
            .await?;

        let fields = PackedFields::new(self.packer, batch.layout);
        let mut languages: Vec<LanguageReport<VideoMetadata>> = reassemble_outcome(&fields, outcome)
            .into_iter()
            .map(|artifact| {
                let record = artifact.artifact.and_then(|parts| to_record(parts, &artifact.language));
                match record {
                    Ok(record) => LanguageReport {
                        language: artifact.language,
                        artifact: Some(record),
                        delivery: Delivery::Delivered,
                    },
                    Err(e) => LanguageReport {
                        language: artifact.language,
                        artifact: None,
                        delivery: Delivery::TranslationFailed(e),
                    },
                }
            })
            .collect();

        let records: Vec<VideoMetadata> = languages
            .iter()
            .filter_map(|l| l.artifact.clone())
            .collect();

        if !records.is_empty() {
            if let Err(e) = self.catalog.upsert_metadata(video_id, &records).await {
                error!("Failed to update metadata of video {}: {}", video_id, e);
                let reason = match e {
                    CcError::UploadFailed { reason, .. } => reason,
                    other => other.to_string(),
                };
                for report in languages.iter_mut().filter(|l| l.artifact.is_some()) {
                    report.delivery = Delivery::UploadFailed(CcError::UploadFailed {
                        language: report.language.clone(),
                        reason: reason.clone(),
                    });
                }
            }
        }

        Ok(FlowReport {
            video_id: video_id.to_string(),
            source_language,
            languages,
        })
    }
}

fn to_record(parts: Vec<String>, language: &str) -> Result<VideoMetadata> {
    let actual = parts.len();
    let [title, description] = <[String; 2]>::try_from(parts)
        .map_err(|_| CcError::LengthMismatch { expected: 2, actual })?;

    Ok(VideoMetadata {
        title,
        description,
        language: language.to_string(),
    })
}
