//! Request field access
//!
//! A [`RawRequest`] is the fully-buffered view of one form submission: every
//! field name maps to the parts sent under it, in request order.

pub mod fields;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;

const DEFAULT_ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// One part of a form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FormPart {
    /// A plain text value, as produced by url-encoded forms
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            filename: None,
            content_type: None,
            bytes: value.into().into_bytes(),
        }
    }

    /// A binary part with optional upload metadata
    pub fn binary(bytes: Vec<u8>, filename: Option<String>, content_type: Option<String>) -> Self {
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Read the part as UTF-8 text on behalf of field `name`.
    pub fn as_text(&self, name: &str) -> Result<&str> {
        std::str::from_utf8(&self.bytes).map_err(|_| {
            Error::invalid_value(
                name,
                &String::from_utf8_lossy(&self.bytes),
                "not valid UTF-8 text",
            )
        })
    }

    fn is_blank(&self) -> bool {
        self.bytes.iter().all(u8::is_ascii_whitespace)
    }
}

/// An uploaded file destined for the rendering engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPart {
    pub filename: String,
    pub content_type: String,
    #[serde(serialize_with = "crate::engine::serialize_base64")]
    pub bytes: Vec<u8>,
}

impl AttachmentPart {
    /// Convert a request part sent under `field`; missing metadata gets neutral defaults.
    pub fn from_part(field: &str, part: &FormPart) -> Self {
        Self {
            filename: part
                .filename
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| field.to_string()),
            content_type: part
                .content_type
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_ATTACHMENT_CONTENT_TYPE.to_string()),
            bytes: part.bytes.clone(),
        }
    }
}

/// The inbound form submission
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    parts: HashMap<String, Vec<FormPart>>,
}

impl RawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part under `name`, after any parts already sent with that name.
    pub fn push(&mut self, name: impl Into<String>, part: FormPart) {
        self.parts.entry(name.into()).or_default().push(part);
    }

    /// Builder-style [`RawRequest::push`]
    pub fn with(mut self, name: impl Into<String>, part: FormPart) -> Self {
        self.push(name, part);
        self
    }

    /// Builder-style shorthand for a text field
    pub fn with_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, FormPart::text(value))
    }

    /// The first part sent under `name`, or `MissingParameter`.
    pub fn mandatory(&self, name: &str) -> Result<&FormPart> {
        self.optional(name).ok_or_else(|| Error::missing(name))
    }

    /// The first part sent under `name`, if any.
    pub fn optional(&self, name: &str) -> Option<&FormPart> {
        self.parts.get(name).and_then(|parts| parts.first())
    }

    /// Every part sent under `name`, in request order.
    pub fn optional_repeated(&self, name: &str) -> &[FormPart] {
        self.parts.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mandatory text field. Blank values count as missing.
    pub fn mandatory_text(&self, name: &str) -> Result<&str> {
        let part = self.mandatory(name)?;
        if part.is_blank() {
            return Err(Error::missing(name));
        }
        part.as_text(name)
    }

    /// Optional text field. Blank values count as absent.
    pub fn optional_text(&self, name: &str) -> Result<Option<&str>> {
        match self.optional(name) {
            Some(part) if !part.is_blank() => part.as_text(name).map(Some),
            _ => Ok(None),
        }
    }

    /// Every non-blank text value sent under `name`, in request order.
    pub fn repeated_text(&self, name: &str) -> Result<Vec<&str>> {
        self.optional_repeated(name)
            .iter()
            .filter(|part| !part.is_blank())
            .map(|part| part.as_text(name))
            .collect()
    }

    /// Mandatory binary field. Empty payloads count as missing.
    pub fn mandatory_bytes(&self, name: &str) -> Result<&[u8]> {
        self.optional_bytes(name).ok_or_else(|| Error::missing(name))
    }

    /// Optional binary field. Empty payloads count as absent.
    pub fn optional_bytes(&self, name: &str) -> Option<&[u8]> {
        self.optional(name)
            .filter(|part| !part.is_blank())
            .map(|part| part.bytes.as_slice())
    }

    /// Every part under `name` converted to attachments, in request order.
    pub fn attachments(&self, name: &str) -> Vec<AttachmentPart> {
        self.optional_repeated(name)
            .iter()
            .map(|part| AttachmentPart::from_part(name, part))
            .collect()
    }

    /// Field names present in the request that are not in `known`.
    pub fn unknown_fields<'a>(&'a self, known: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.parts
            .keys()
            .map(String::as_str)
            .filter(move |name| !known.contains(name))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
