//! Request-to-options translation
//!
//! Fields are read, canonicalized and parsed in a fixed order; the first
//! failure aborts assembly, so callers get either complete options or one error.

pub mod dor;
pub mod parse;
pub mod render;
pub mod types;

pub use dor::DocumentOfRecordOptions;
pub use render::RenderOptions;
pub use types::{AbsoluteOrRelativeUrl, AcrobatVersion, CacheStrategy, Locale, PathOrUrl};

use crate::error::{Error, Result};
use crate::form::RawRequest;
use crate::template::{Resource, ResourceLookup};
use crate::xml;

/// Canonicalize an optional XML-bearing field.
fn canonical_xml(request: &RawRequest, name: &str) -> Result<Option<String>> {
    request
        .optional_bytes(name)
        .map(|bytes| canonicalize_field(name, bytes))
        .transpose()
}

fn canonicalize_field(name: &str, bytes: &[u8]) -> Result<String> {
    xml::canonicalize(bytes).map_err(|e| Error::invalid_payload(name, e))
}

/// Resolve the template reference, relative to `content_root` when one was given.
fn resolve_template(
    lookup: &dyn ResourceLookup,
    template: &str,
    content_root: Option<&PathOrUrl>,
) -> Result<Resource> {
    let uri = match content_root {
        Some(root) => root.join(template),
        None => template.to_string(),
    };
    lookup.lookup(&uri).ok_or_else(|| {
        tracing::debug!(%uri, "template lookup returned nothing");
        Error::template_not_found(template)
    })
}
