//! PDF Forms Server Library
//!
//! This crate provides an HTTP front end for PDF form rendering:
//! - `POST /render-pdf-form`: Render an interactive PDF form from a template
//! - `POST /document-of-record`: Generate a read-only document of record
//!
//! Requests are validated and turned into typed options here; the rendering
//! itself is delegated to an engine behind the [`RenderEngine`] and
//! [`DorEngine`] traits.

pub mod engine;
pub mod error;
pub mod form;
pub mod options;
pub mod server;
pub mod template;
pub mod xml;

pub use engine::{DorEngine, EngineError, RemoteEngine, RemoteEngineConfig, RenderEngine, RenderedDocument};
pub use error::{Error, ErrorKind, Result};
pub use form::{AttachmentPart, FormPart, RawRequest};
pub use options::{DocumentOfRecordOptions, RenderOptions};
pub use server::{router, run_server, run_server_with_config, AppState, ServerConfig};
pub use template::{FsResourceLookup, Resource, ResourceLookup};
