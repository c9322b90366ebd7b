use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, CcError};
use crate::metadata::VideoMetadata;
use crate::translate::language;
use super::VideoCatalog;

/// One caption track listed for a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub id: String,
    pub language: String,
}

/// Catalog backed by the catalog REST API
pub struct HttpCatalog {
    client: Client,
    endpoint: String,
}

impl HttpCatalog {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cctrans/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    async fn caption_entries(&self, video_id: &str) -> Result<Vec<CaptionEntry>> {
        let response = self.client.get(self.url(&format!("videos/{}/cc", video_id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CcError::NotFound(format!("captions of video {}", video_id)));
        }
        Ok(response.error_for_status()?.json().await?)
    }
}

/// The track in `language`, if the video has one.
pub fn find_track<'a>(entries: &'a [CaptionEntry], language: &str) -> Option<&'a CaptionEntry> {
    entries.iter().find(|entry| language::same_language(&entry.language, language))
}

#[async_trait]
impl VideoCatalog for HttpCatalog {
    async fn fetch_captions(&self, video_id: &str, language: &str) -> Result<String> {
        let entries = self.caption_entries(video_id).await?;
        let entry = find_track(&entries, language).ok_or_else(|| {
            CcError::NotFound(format!("{} captions of video {}", language, video_id))
        })?;

        debug!("Downloading caption track {} ({})", entry.id, entry.language);
        let response = self.client.get(self.url(&format!("cc/{}", entry.id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CcError::NotFound(format!("caption track {}", entry.id)));
        }
        let body = response.error_for_status()?.text().await?;
        Ok(body.trim_end().to_string())
    }

    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let response = self.client.get(self.url(&format!("videos/{}", video_id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CcError::NotFound(format!("video {}", video_id)));
        }
        Ok(response.error_for_status()?.json().await?)
    }

    async fn upload_captions(&self, video_id: &str, language: &str, captions: &str) -> Result<()> {
        let response = self.client
            .post(self.url(&format!("videos/{}/cc/{}", video_id, language)))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(captions.to_string())
            .send()
            .await
            .map_err(|e| CcError::UploadFailed {
                language: language.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CcError::UploadFailed {
                language: language.to_string(),
                reason: format!("{}: {}", status, error_text),
            });
        }

        info!("Uploaded {} captions for video {}", language, video_id);
        Ok(())
    }

    async fn upsert_metadata(&self, video_id: &str, records: &[VideoMetadata]) -> Result<()> {
        let languages = records.iter().map(|r| r.language.as_str()).collect::<Vec<_>>().join(",");

        let response = self.client.post(self.url(&format!("videos/{}", video_id)))
            .json(records)
            .send()
            .await
            .map_err(|e| CcError::UploadFailed {
                language: languages.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CcError::UploadFailed {
                language: languages,
                reason: format!("{}: {}", status, error_text),
            });
        }

        info!("Updated metadata of video {} in {} languages", video_id, records.len());
        Ok(())
    }
}
