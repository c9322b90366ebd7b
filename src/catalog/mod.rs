// Video catalog collaborators
//
// The pipeline reads source captions and metadata from a catalog and hands
// finished translations back to it:
// - Http: the catalog REST API
// - Directory: a local directory tree, one folder per video

pub mod directory;
pub mod http;

use async_trait::async_trait;

pub use directory::DirectoryCatalog;
pub use http::HttpCatalog;

use crate::config::{CatalogBackend, CatalogConfig};
use crate::error::Result;
use crate::metadata::VideoMetadata;

/// Source of captions and metadata, and sink for their translations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Raw caption container text of a video in one language
    async fn fetch_captions(&self, video_id: &str, language: &str) -> Result<String>;

    /// Title, description and language of a video
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata>;

    /// Store serialized captions for one language
    async fn upload_captions(&self, video_id: &str, language: &str, captions: &str) -> Result<()>;

    /// Insert or replace translated metadata records
    async fn upsert_metadata(&self, video_id: &str, records: &[VideoMetadata]) -> Result<()>;
}

/// Factory for creating catalog instances
pub struct CatalogFactory;

impl CatalogFactory {
    pub fn create_catalog(config: CatalogConfig) -> Result<Box<dyn VideoCatalog>> {
        match config.backend {
            CatalogBackend::Http => Ok(Box::new(HttpCatalog::new(&config.endpoint)?)),
            CatalogBackend::Directory => Ok(Box::new(DirectoryCatalog::new(config.root))),
        }
    }
}
