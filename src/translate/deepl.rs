use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{Result, CcError};
use super::{Translator, language};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslateRequest {
    pub text: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedText {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translations: Vec<TranslatedText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    #[serde(default)]
    pub name: String,
}

/// Character quota of the configured key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub character_count: u64,
    pub character_limit: u64,
}

/// Translator backed by a DeepL-compatible REST API
pub struct DeeplTranslator {
    client: Client,
    config: TranslateConfig,
    api_key: String,
}

impl DeeplTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_key = config.resolved_api_key();

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
    }

    /// Character usage reported by the backend for the configured key
    pub async fn usage(&self) -> Result<Usage> {
        let response = self.authorized(self.client.get(self.url("usage")))
            .send()
            .await
            .map_err(|e| CcError::Backend(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CcError::Backend(format!("Usage API error {}: {}", status, error_text)));
        }

        response.json().await
            .map_err(|e| CcError::Backend(format!("Failed to parse usage response: {}", e)))
    }
}

pub fn build_request(texts: &[String], source_language: &str, target_language: &str) -> Result<TranslateRequest> {
    if texts.is_empty() {
        return Err(CcError::InvalidInput("nothing to translate".to_string()));
    }
    if source_language.trim().is_empty() || target_language.trim().is_empty() {
        return Err(CcError::InvalidInput("source and target language are required".to_string()));
    }

    Ok(TranslateRequest {
        text: texts.to_vec(),
        source_lang: language::base_code(&language::to_backend_code(source_language)).to_uppercase(),
        target_lang: language::to_backend_code(target_language),
    })
}

/// Backend language list in catalog form, one entry per base language.
pub fn catalog_languages(entries: &[LanguageEntry]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for entry in entries {
        let code = language::base_code(&language::to_catalog_code(&entry.language));
        if !code.is_empty() && !languages.contains(&code) {
            languages.push(code);
        }
    }
    languages
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>> {
        let request = build_request(texts, source_language, target_language)?;
        let url = self.url("translate");

        debug!("Sending {} texts to {} ({} -> {})",
               request.text.len(), url, request.source_lang, request.target_lang);

        let response = self.authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CcError::Backend(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CcError::Backend(format!(
                "Translation API error {}: {}", status, error_text
            )));
        }

        let translation_response: TranslateResponse = response.json().await
            .map_err(|e| CcError::Backend(format!("Failed to parse response: {}", e)))?;

        Ok(translation_response.translations.into_iter().map(|t| t.text).collect())
    }

    async fn languages(&self) -> Result<Vec<String>> {
        let response = self.authorized(self.client.get(self.url("languages")))
            .query(&[("type", "target")])
            .send()
            .await
            .map_err(|e| CcError::Backend(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CcError::Backend(format!("Languages API error {}: {}", status, error_text)));
        }

        let entries: Vec<LanguageEntry> = response.json().await
            .map_err(|e| CcError::Backend(format!("Failed to parse languages: {}", e)))?;

        let languages = catalog_languages(&entries);
        info!("Translation backend supports {} target languages", languages.len());
        Ok(languages)
    }
}
