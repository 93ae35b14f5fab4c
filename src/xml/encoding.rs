//! Source encoding detection for XML payloads

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;

use super::XmlError;

/// How far into the payload the XML declaration may extend
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// Work out the payload's encoding and how many leading bytes (a BOM) to skip.
///
/// Order: byte-order mark, the UTF-16 `<?` signature, the declaration's
/// `encoding` pseudo-attribute, then UTF-8.
pub(crate) fn detect(bytes: &[u8]) -> Result<(&'static Encoding, usize), XmlError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return Ok((encoding, bom_len));
    }
    if bytes.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) {
        return Ok((UTF_16LE, 0));
    }
    if bytes.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) {
        return Ok((UTF_16BE, 0));
    }
    match declared_label(bytes) {
        Some(label) => match Encoding::for_label(label.as_bytes()) {
            // A declaration read as ASCII cannot honestly claim a UTF-16 layout.
            Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => Ok((UTF_8, 0)),
            Some(encoding) => Ok((encoding, 0)),
            None => Err(XmlError::UnsupportedEncoding(label)),
        },
        None => Ok((UTF_8, 0)),
    }
}

/// Decode the whole payload, failing on any malformed sequence.
pub(crate) fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, XmlError> {
    let (encoding, skip) = detect(bytes)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[skip..])
        .ok_or_else(|| XmlError::MalformedEncoding(encoding.name().to_string()))
}

/// The `encoding="..."` value of an ASCII-compatible XML declaration
fn declared_label(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let head = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let close = value.find(quote)?;
    Some(value[..close].to_string())
}
