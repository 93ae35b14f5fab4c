//! Rendering engine collaborators
//!
//! The engines are opaque: validated options go in, a document or an
//! [`EngineError`] comes out. Each request calls an engine exactly once.

pub mod remote;

use crate::options::{DocumentOfRecordOptions, RenderOptions};
use async_trait::async_trait;
use base64::Engine;
use serde::Serializer;
use thiserror::Error;

pub use remote::{RemoteEngine, RemoteEngineConfig};

/// Default content type when an engine does not declare one
pub const APPLICATION_PDF: &str = "application/pdf";

/// Bytes produced by an engine, with their declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            content_type: APPLICATION_PDF.to_string(),
            bytes,
        }
    }
}

/// Failures reported by an engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine answered but refused or failed the job
    #[error("rendering engine returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The engine could not be reached or the exchange broke off
    #[error("rendering engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The produced document exceeds the configured limit
    #[error("rendered document too large: {size} bytes (max: {max_size} bytes)")]
    TooLarge { size: u64, max_size: u64 },

    /// Any other engine-reported failure
    #[error("{0}")]
    Failed(String),
}

impl EngineError {
    /// Message safe to show to clients: engine addresses and transport details are withheld.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::Rejected { status, message } => {
                format!("rendering engine returned status {}: {}", status, message)
            }
            EngineError::Transport(_) => "rendering engine unavailable".to_string(),
            EngineError::TooLarge { max_size, .. } => {
                format!("rendered document exceeds maximum size of {} bytes", max_size)
            }
            EngineError::Failed(message) => message.clone(),
        }
    }
}

/// Renders a PDF form from validated options
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn render(&self, options: &RenderOptions) -> Result<RenderedDocument, EngineError>;
}

/// Generates a document of record from validated options
#[async_trait]
pub trait DorEngine: Send + Sync {
    async fn render(
        &self,
        options: &DocumentOfRecordOptions,
    ) -> Result<RenderedDocument, EngineError>;
}

/// serde helper: raw bytes as standard base64
pub(crate) fn serialize_base64<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes.as_ref()))
}
