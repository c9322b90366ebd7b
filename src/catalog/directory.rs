use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Result, CcError};
use crate::metadata::VideoMetadata;
use crate::translate::language;
use super::VideoCatalog;

/// Catalog kept on disk:
///
/// ```text
/// <root>/<video>/metadata.json
/// <root>/<video>/captions/<lang>.srt
/// <root>/<video>/metadata/<lang>.json
/// ```
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn video_dir(&self, video_id: &str) -> Result<PathBuf> {
        let valid = !video_id.is_empty()
            && video_id != "."
            && video_id != ".."
            && !video_id.contains(['/', '\\']);
        if !valid {
            return Err(CcError::InvalidInput(format!("invalid video id {:?}", video_id)));
        }
        Ok(self.root.join(video_id))
    }

    pub fn captions_path(&self, video_id: &str, language: &str) -> Result<PathBuf> {
        Ok(self.video_dir(video_id)?
            .join("captions")
            .join(format!("{}.srt", language::normalize(language))))
    }

    pub fn translated_metadata_path(&self, video_id: &str, language: &str) -> Result<PathBuf> {
        Ok(self.video_dir(video_id)?
            .join("metadata")
            .join(format!("{}.json", language::normalize(language))))
    }
}

fn not_found_or_io(err: std::io::Error, what: String) -> CcError {
    if err.kind() == ErrorKind::NotFound {
        CcError::NotFound(what)
    } else {
        CcError::Io(err)
    }
}

async fn write_file(path: &Path, content: &[u8], language: &str) -> Result<()> {
    let upload_failed = |e: std::io::Error| CcError::UploadFailed {
        language: language.to_string(),
        reason: format!("{}: {}", path.display(), e),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(upload_failed)?;
    }
    fs::write(path, content).await.map_err(upload_failed)
}

#[async_trait]
impl VideoCatalog for DirectoryCatalog {
    async fn fetch_captions(&self, video_id: &str, language: &str) -> Result<String> {
        let path = self.captions_path(video_id, language)?;
        debug!("Reading captions from {}", path.display());

        let content = fs::read_to_string(&path).await
            .map_err(|e| not_found_or_io(e, format!("{} captions of video {}", language, video_id)))?;
        Ok(content.trim_end().to_string())
    }

    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let path = self.video_dir(video_id)?.join("metadata.json");
        debug!("Reading metadata from {}", path.display());

        let content = fs::read_to_string(&path).await
            .map_err(|e| not_found_or_io(e, format!("video {}", video_id)))?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn upload_captions(&self, video_id: &str, language: &str, captions: &str) -> Result<()> {
        let path = self.captions_path(video_id, language)?;
        write_file(&path, captions.as_bytes(), language).await?;

        info!("Stored {} captions at {}", language, path.display());
        Ok(())
    }

    async fn upsert_metadata(&self, video_id: &str, records: &[VideoMetadata]) -> Result<()> {
        for record in records {
            let path = self.translated_metadata_path(video_id, &record.language)?;
            let content = serde_json::to_vec_pretty(record)?;
            write_file(&path, &content, &record.language).await?;
        }

        info!("Stored metadata of video {} in {} languages", video_id, records.len());
        Ok(())
    }
}
