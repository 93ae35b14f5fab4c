//! HTTP client for an upstream rendering service

use super::{DorEngine, EngineError, RenderEngine, RenderedDocument, APPLICATION_PDF};
use crate::options::{DocumentOfRecordOptions, RenderOptions};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Longest engine error body relayed to clients
const MAX_RELAYED_MESSAGE_CHARS: usize = 200;

/// Connection settings for [`RemoteEngine`]
#[derive(Debug, Clone)]
pub struct RemoteEngineConfig {
    /// Base URL; operations are posted to `{base_url}/render-pdf-form` and `{base_url}/document-of-record`
    pub base_url: Url,
    /// Whole-request timeout (default: 60s)
    pub timeout: Duration,
    /// Maximum size of a rendered document (default: 100MB)
    pub max_response_bytes: u64,
}

impl RemoteEngineConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(60),
            max_response_bytes: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Forwards validated options as JSON to an upstream rendering service
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    client: reqwest::Client,
    base_url: Url,
    max_response_bytes: u64,
}

impl RemoteEngine {
    pub fn new(config: RemoteEngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            max_response_bytes: config.max_response_bytes,
        })
    }

    async fn post<T: Serialize + Sync>(
        &self,
        operation: &str,
        body: &T,
    ) -> Result<RenderedDocument, EngineError> {
        let endpoint = self
            .base_url
            .join(operation)
            .map_err(|e| EngineError::Failed(format!("invalid engine endpoint: {}", e)))?;

        tracing::debug!(%endpoint, "calling rendering engine");
        let response = self.client.post(endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                message: message.trim().chars().take(MAX_RELAYED_MESSAGE_CHARS).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(APPLICATION_PDF)
            .to_string();

        // Check Content-Length header for early rejection
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_response_bytes {
                return Err(EngineError::TooLarge {
                    size: content_length,
                    max_size: self.max_response_bytes,
                });
            }
        }

        // Stream the body with incremental size checking
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 > self.max_response_bytes {
                return Err(EngineError::TooLarge {
                    size: bytes.len() as u64,
                    max_size: self.max_response_bytes,
                });
            }
        }

        Ok(RenderedDocument {
            content_type,
            bytes,
        })
    }
}

#[async_trait]
impl RenderEngine for RemoteEngine {
    async fn render(&self, options: &RenderOptions) -> Result<RenderedDocument, EngineError> {
        self.post("render-pdf-form", options).await
    }
}

#[async_trait]
impl DorEngine for RemoteEngine {
    async fn render(
        &self,
        options: &DocumentOfRecordOptions,
    ) -> Result<RenderedDocument, EngineError> {
        self.post("document-of-record", options).await
    }
}
