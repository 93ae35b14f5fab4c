//! Response writing and error-to-HTTP mapping

use crate::engine::{RenderedDocument, APPLICATION_PDF};
use crate::error::{Error, ErrorKind, Result};
use axum::{
    body::Body,
    http::{
        header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};

/// Whether an `Accept` header admits `content_type`.
///
/// The most specific matching range decides (`type/subtype` over `type/*`
/// over `*/*`); a range with `q=0` excludes. No header accepts everything.
pub fn accepts(accept: Option<&str>, content_type: &str) -> bool {
    let accept = match accept.map(str::trim) {
        Some(accept) if !accept.is_empty() => accept,
        _ => return true,
    };
    let essence = media_essence(content_type);
    let main_type = essence.split('/').next().unwrap_or_default();

    let mut best: Option<(u8, bool)> = None;
    for range in accept.split(',') {
        let mut params = range.split(';');
        let media = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        let specificity = if media == essence {
            2
        } else if media.strip_suffix("/*") == Some(main_type) {
            1
        } else if media == "*/*" {
            0
        } else {
            continue;
        };
        let allowed = params.all(|param| !is_zero_quality(param));

        match best {
            Some((current, _)) if current >= specificity => {}
            _ => best = Some((specificity, allowed)),
        }
    }
    best.is_some_and(|(_, allowed)| allowed)
}

fn media_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_zero_quality(param: &str) -> bool {
    match param.trim().split_once('=') {
        Some((name, value)) if name.trim().eq_ignore_ascii_case("q") => {
            value.trim().parse::<f32>().is_ok_and(|q| q <= 0.0)
        }
        _ => false,
    }
}

/// Write a rendered document back to the client.
///
/// Sets `Content-Type` to the engine's declared type (`application/pdf` when
/// none was declared) and `Content-Length` to the exact byte count.
pub fn write_document(headers: &HeaderMap, document: RenderedDocument) -> Result<Response> {
    if document.bytes.is_empty() {
        return Err(Error::response_write("rendering engine produced an empty document"));
    }

    let content_type = match document.content_type.trim() {
        "" => APPLICATION_PDF.to_string(),
        declared => declared.to_string(),
    };
    let content_type_value = HeaderValue::from_str(&content_type)
        .map_err(|_| Error::response_write("rendering engine declared an invalid content type"))?;

    let accept = headers.get(ACCEPT).and_then(|value| value.to_str().ok());
    if !accepts(accept, &content_type) {
        return Err(Error::UnsupportedResponseFormat {
            content_type,
            accept: accept.unwrap_or_default().to_string(),
        });
    }

    let length = document.bytes.len();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type_value)
        .header(CONTENT_LENGTH, length)
        .body(Body::from(document.bytes))
        .map_err(Error::response_write)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self
            .kind()
            .status()
            .and_then(|status| StatusCode::from_u16(status).ok());

        match (self.kind(), status) {
            (ErrorKind::Unclassified, _) | (_, None) => {
                tracing::error!(error = ?self, "unhandled error while serving request");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            (_, Some(status)) => {
                if status.is_client_error() && status != StatusCode::NOT_ACCEPTABLE {
                    tracing::warn!(status = status.as_u16(), error = %self, "rejected request");
                } else {
                    tracing::error!(status = status.as_u16(), error = %self, "request failed");
                }
                (status, self.client_message()).into_response()
            }
        }
    }
}
