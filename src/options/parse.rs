//! Typed field parsers
//!
//! Every parser is exact: a value either parses into its type or fails with
//! `InvalidParameterValue` naming the field. Nothing is coerced to a default.

use super::types::{AbsoluteOrRelativeUrl, AcrobatVersion, CacheStrategy, Locale, PathOrUrl};
use crate::error::{Error, Result};
use std::path::PathBuf;
use url::Url;

/// URL schemes accepted where a location may be a URL
const LOCATION_SCHEMES: &[&str] = &["http", "https", "ftp", "file"];

/// URL schemes accepted for form submission targets
const SUBMIT_SCHEMES: &[&str] = &["http", "https", "ftp", "file", "mailto"];

/// Characters that are not portable in a filesystem path
const RESERVED_PATH_CHARS: &[char] = &['<', '>', '"', '|', '?', '*'];

/// A value that can be parsed from one raw form field.
pub trait FieldValue: Sized {
    /// Parse `raw`; the error is a short reason for the client.
    fn parse_field(raw: &str) -> std::result::Result<Self, String>;
}

/// Parse an optional single-valued field.
pub fn parse_optional<T: FieldValue>(name: &str, raw: Option<&str>) -> Result<Option<T>> {
    raw.map(|value| parse_value(name, value)).transpose()
}

/// Parse a repeated field, one element per occurrence, in request order.
/// The first element that fails aborts the whole list.
pub fn parse_repeated<T: FieldValue>(name: &str, raws: &[&str]) -> Result<Vec<T>> {
    raws.iter().map(|value| parse_value(name, value)).collect()
}

fn parse_value<T: FieldValue>(name: &str, raw: &str) -> Result<T> {
    T::parse_field(raw).map_err(|reason| Error::invalid_value(name, raw, reason))
}

impl FieldValue for AcrobatVersion {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        raw.parse()
    }
}

impl FieldValue for CacheStrategy {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        raw.parse()
    }
}

impl FieldValue for Locale {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        raw.parse()
    }
}

impl FieldValue for bool {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected 'true' or 'false'".to_string())
        }
    }
}

impl FieldValue for PathBuf {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        parse_path(raw)
    }
}

impl FieldValue for PathOrUrl {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        if let Ok(url) = parse_url(raw, LOCATION_SCHEMES) {
            return Ok(PathOrUrl::Url(url));
        }
        parse_path(raw)
            .map(PathOrUrl::Path)
            .map_err(|reason| format!("not a URL, and not a valid path: {}", reason))
    }
}

impl FieldValue for AbsoluteOrRelativeUrl {
    fn parse_field(raw: &str) -> std::result::Result<Self, String> {
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err("URL contains whitespace or control characters".to_string());
        }
        match Url::parse(raw) {
            Ok(url) if SUBMIT_SCHEMES.contains(&url.scheme()) => {
                Ok(AbsoluteOrRelativeUrl::Absolute(url))
            }
            Ok(url) => Err(format!("unsupported URL scheme '{}'", url.scheme())),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse("http://relative.invalid/")
                    .map_err(|e| format!("invalid relative URL: {}", e))?;
                base.join(raw)
                    .map(|_| AbsoluteOrRelativeUrl::Relative(raw.to_string()))
                    .map_err(|e| format!("invalid relative URL: {}", e))
            }
            Err(e) => Err(format!("invalid URL: {}", e)),
        }
    }
}

fn parse_url(raw: &str, schemes: &[&str]) -> std::result::Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if schemes.contains(&url.scheme()) {
        Ok(url)
    } else {
        Err(format!("unsupported URL scheme '{}'", url.scheme()))
    }
}

/// Validate a portable filesystem path.
///
/// Accepts `/` and `\` as separators and an optional `C:` drive prefix. Rejects
/// control characters, reserved characters, stray colons, and empty segments
/// other than a single leading root and a single trailing separator.
fn parse_path(raw: &str) -> std::result::Result<PathBuf, String> {
    if raw.trim().is_empty() {
        return Err("path is empty".to_string());
    }
    if raw.chars().any(char::is_control) {
        return Err("path contains control characters".to_string());
    }
    if let Some(c) = raw.chars().find(|c| RESERVED_PATH_CHARS.contains(c)) {
        return Err(format!("path contains reserved character '{}'", c));
    }

    let bytes = raw.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    let rest = if has_drive { &raw[2..] } else { raw };
    if rest.contains(':') {
        return Err("path contains ':' outside a drive prefix".to_string());
    }

    let normalized = rest.replace('\\', "/");
    let body = normalized.strip_prefix('/').unwrap_or(&normalized);
    let body = body.strip_suffix('/').unwrap_or(body);
    if !body.is_empty() && body.split('/').any(str::is_empty) {
        return Err("path contains an empty segment".to_string());
    }
    if body.is_empty() && normalized.len() > 1 {
        return Err("path contains an empty segment".to_string());
    }

    Ok(PathBuf::from(raw))
}
