//! Error types for the PDF forms server

use thiserror::Error;

use crate::engine::EngineError;

/// Result type alias for the PDF forms server
pub type Result<T> = std::result::Result<T, Error>;

/// Longest raw value echoed back to a client inside an error message.
const MAX_ECHOED_VALUE_CHARS: usize = 64;

/// Error types for the PDF forms server
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory request field was not supplied
    #[error("Bad request parameter; missing required parameter '{name}'")]
    MissingParameter { name: String },

    /// A field was supplied but its value does not parse
    #[error(
        "Bad request parameter; unable to parse incoming parameters: '{name}' value '{value}' is invalid ({reason})"
    )]
    InvalidParameterValue {
        name: String,
        value: String,
        reason: String,
    },

    /// An XML payload (or the request body carrying it) is unusable
    #[error("Input XML payload invalid in '{field}': {reason}")]
    InvalidPayload { field: String, reason: String },

    /// The template reference parsed but names nothing
    #[error("Bad request parameter; unable to find template '{uri}'")]
    TemplateNotFound { uri: String },

    /// The rendering engine failed, or its output could not be written back
    #[error("{message}")]
    RenderingEngineFailure { message: String },

    /// The request body exceeds the configured limit
    #[error("Request body too large: {reason}")]
    PayloadTooLarge { reason: String },

    /// The client does not accept the produced content type
    #[error("Unable to produce an acceptable response: '{content_type}' does not match Accept '{accept}'")]
    UnsupportedResponseFormat {
        content_type: String,
        accept: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything the pipeline did not anticipate
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

/// Failure classes, each bound to one HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingParameter,
    InvalidParameterValue,
    InvalidPayload,
    TemplateNotFound,
    PayloadTooLarge,
    RenderingEngineFailure,
    UnsupportedResponseFormat,
    Unclassified,
}

impl ErrorKind {
    /// HTTP status for this kind. `None` leaves the response to the host's default handler.
    pub const fn status(self) -> Option<u16> {
        match self {
            ErrorKind::MissingParameter
            | ErrorKind::InvalidParameterValue
            | ErrorKind::InvalidPayload
            | ErrorKind::TemplateNotFound => Some(400),
            ErrorKind::UnsupportedResponseFormat => Some(406),
            ErrorKind::PayloadTooLarge => Some(413),
            ErrorKind::RenderingEngineFailure => Some(500),
            ErrorKind::Unclassified => None,
        }
    }
}

impl Error {
    pub fn missing(name: impl Into<String>) -> Self {
        Error::MissingParameter { name: name.into() }
    }

    /// Build an [`Error::InvalidParameterValue`], truncating long raw values.
    pub fn invalid_value(
        name: impl Into<String>,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameterValue {
            name: name.into(),
            value: truncate(value),
            reason: reason.into(),
        }
    }

    pub fn invalid_payload(field: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidPayload {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub fn template_not_found(uri: impl Into<String>) -> Self {
        Error::TemplateNotFound { uri: uri.into() }
    }

    /// Wrap an engine failure for `template`. Only the sanitized engine message is kept.
    pub fn engine_failure(template: &str, source: &EngineError) -> Self {
        Error::RenderingEngineFailure {
            message: format!(
                "Error while rendering form '{}' caused by '{}'.",
                template,
                source.client_message()
            ),
        }
    }

    pub fn response_write(reason: impl std::fmt::Display) -> Self {
        Error::RenderingEngineFailure {
            message: format!("Error while writing response: {}", reason),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingParameter { .. } => ErrorKind::MissingParameter,
            Error::InvalidParameterValue { .. } => ErrorKind::InvalidParameterValue,
            Error::InvalidPayload { .. } => ErrorKind::InvalidPayload,
            Error::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
            Error::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Error::RenderingEngineFailure { .. } => ErrorKind::RenderingEngineFailure,
            Error::UnsupportedResponseFormat { .. } => ErrorKind::UnsupportedResponseFormat,
            Error::Io(_) | Error::Internal { .. } => ErrorKind::Unclassified,
        }
    }

    /// Return a sanitized error message safe to send to clients.
    /// Classified errors only ever carry what the client sent; everything else is withheld.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unclassified => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_ECHOED_VALUE_CHARS {
        return value.to_string();
    }
    let mut out: String = value.chars().take(MAX_ECHOED_VALUE_CHARS).collect();
    out.push_str("...");
    out
}
