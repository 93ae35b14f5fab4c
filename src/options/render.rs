//! Options for `POST /render-pdf-form`

use super::parse::{parse_optional, parse_repeated};
use super::types::{AbsoluteOrRelativeUrl, AcrobatVersion, CacheStrategy, Locale, PathOrUrl};
use super::{canonical_xml, resolve_template};
use crate::error::{Error, Result};
use crate::form::{fields, AttachmentPart, RawRequest};
use crate::template::ResourceLookup;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Fully validated options for rendering a PDF form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    acrobat_version: AcrobatVersion,
    cache_strategy: CacheStrategy,
    content_root: PathOrUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<Locale>,
    submit_urls: Vec<AbsoluteOrRelativeUrl>,
    tagged_pdf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    xci: Option<String>,
    template_url_or_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<String>,
    attachments: Vec<AttachmentPart>,
}

impl RenderOptions {
    /// Read, validate and resolve every render field of `request`.
    ///
    /// Fields are checked in a fixed order (template presence, data, acrobat
    /// version, cache strategy, content root, debug dir, locale, submit URLs,
    /// tagged PDF, XCI, attachments, then template resolution) and the first
    /// failure is returned.
    pub fn assemble(request: &RawRequest, lookup: &dyn ResourceLookup) -> Result<Self> {
        let template = request.mandatory_text(fields::TEMPLATE)?;
        let inline_data = canonical_xml(request, fields::DATA)?;

        let acrobat_version = parse_optional::<AcrobatVersion>(
            fields::ACROBAT_VERSION,
            request.optional_text(fields::ACROBAT_VERSION)?,
        )?;
        let cache_strategy = parse_optional::<CacheStrategy>(
            fields::CACHE_STRATEGY,
            request.optional_text(fields::CACHE_STRATEGY)?,
        )?;
        let content_root = parse_optional::<PathOrUrl>(
            fields::CONTENT_ROOT,
            request.optional_text(fields::CONTENT_ROOT)?,
        )?;
        let debug_dir = parse_optional::<PathBuf>(
            fields::DEBUG_DIR,
            request.optional_text(fields::DEBUG_DIR)?,
        )?;
        let locale = parse_optional::<Locale>(
            fields::RENDER_LOCALE,
            request.optional_text(fields::RENDER_LOCALE)?,
        )?;
        let submit_urls = parse_repeated::<AbsoluteOrRelativeUrl>(
            fields::SUBMIT_URL,
            &request.repeated_text(fields::SUBMIT_URL)?,
        )?;
        let tagged_pdf = parse_optional::<bool>(
            fields::TAGGED_PDF,
            request.optional_text(fields::TAGGED_PDF)?,
        )?;
        let xci = canonical_xml(request, fields::XCI)?;
        let attachments = request.attachments(fields::ATTACHMENT);

        let resource = resolve_template(lookup, template, content_root.as_ref())?;
        let (content_root, template_url_or_filename) = resource
            .split()
            .ok_or_else(|| Error::template_not_found(template))?;

        Ok(Self {
            acrobat_version: acrobat_version.unwrap_or_default(),
            cache_strategy: cache_strategy.unwrap_or_default(),
            content_root,
            debug_dir,
            locale,
            submit_urls,
            tagged_pdf: tagged_pdf.unwrap_or(false),
            xci,
            template_url_or_filename,
            inline_data,
            attachments,
        })
    }

    pub fn acrobat_version(&self) -> AcrobatVersion {
        self.acrobat_version
    }

    pub fn cache_strategy(&self) -> CacheStrategy {
        self.cache_strategy
    }

    pub fn content_root(&self) -> &PathOrUrl {
        &self.content_root
    }

    pub fn debug_dir(&self) -> Option<&Path> {
        self.debug_dir.as_deref()
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn submit_urls(&self) -> &[AbsoluteOrRelativeUrl] {
        &self.submit_urls
    }

    pub fn tagged_pdf(&self) -> bool {
        self.tagged_pdf
    }

    /// Canonical XCI document
    pub fn xci(&self) -> Option<&str> {
        self.xci.as_deref()
    }

    pub fn template_url_or_filename(&self) -> &str {
        &self.template_url_or_filename
    }

    /// Canonical form data
    pub fn inline_data(&self) -> Option<&str> {
        self.inline_data.as_deref()
    }

    pub fn attachments(&self) -> &[AttachmentPart] {
        &self.attachments
    }
}
