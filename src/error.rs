use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed caption document at record {record}: {reason}")]
    MalformedDocument { record: usize, reason: String },

    #[error("Translated batch has {actual} entries, expected {expected}")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("Cannot reassemble {actual} texts onto {expected} segments")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Translation to {language} returned {actual} texts, expected {expected}")]
    TranslationSizeMismatch {
        language: String,
        expected: usize,
        actual: usize,
    },

    #[error("Translation backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload failed for {language}: {reason}")]
    UploadFailed { language: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Translation job cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CcError {
    /// Structural-integrity violations are never patched up downstream.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedDocument { .. }
                | Self::BatchSizeMismatch { .. }
                | Self::LengthMismatch { .. }
                | Self::TranslationSizeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CcError>;
