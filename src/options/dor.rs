//! Options for `POST /document-of-record`

use super::parse::parse_optional;
use super::types::Locale;
use super::{canonicalize_field, resolve_template};
use crate::error::Result;
use crate::form::{fields, AttachmentPart, RawRequest};
use crate::template::{Resource, ResourceLookup};
use serde::Serialize;

/// Fully validated options for producing a document of record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOfRecordOptions {
    data_xml: String,
    form_resource: Resource,
    locale: Locale,
    include_attachments: bool,
    attachments: Vec<AttachmentPart>,
}

impl DocumentOfRecordOptions {
    /// Read, validate and resolve every document-of-record field of `request`.
    ///
    /// Order: template presence, data, locale, attachments, template resolution.
    pub fn assemble(request: &RawRequest, lookup: &dyn ResourceLookup) -> Result<Self> {
        let template = request.mandatory_text(fields::TEMPLATE)?;
        let data_xml = canonicalize_field(fields::DATA, request.mandatory_bytes(fields::DATA)?)?;
        let locale = parse_optional::<Locale>(
            fields::DOR_LOCALE,
            request.optional_text(fields::DOR_LOCALE)?,
        )?;
        let attachments = request.attachments(fields::ATTACHMENT);
        let form_resource = resolve_template(lookup, template, None)?;

        Ok(Self {
            data_xml,
            form_resource,
            locale: locale.unwrap_or_default(),
            include_attachments: !attachments.is_empty(),
            attachments,
        })
    }

    /// Canonical form data
    pub fn data_xml(&self) -> &str {
        &self.data_xml
    }

    pub fn form_resource(&self) -> &Resource {
        &self.form_resource
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// True exactly when at least one attachment was sent
    pub fn include_attachments(&self) -> bool {
        self.include_attachments
    }

    pub fn attachments(&self) -> &[AttachmentPart] {
        &self.attachments
    }
}
