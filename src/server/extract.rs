//! Request body extraction

use crate::error::{Error, Result};
use crate::form::{FormPart, RawRequest};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
};

/// Name reported when the body itself is unusable
const REQUEST_BODY: &str = "request body";

/// A fully buffered form submission.
///
/// Accepts `multipart/form-data` (parts keep their filename and content type)
/// and `application/x-www-form-urlencoded` (every value becomes a text part).
/// Any other body is rejected with `InvalidPayload`.
#[derive(Debug)]
pub struct FormRequest(pub RawRequest);

impl<S> FromRequest<S> for FormRequest
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let essence = content_type.split(';').next().unwrap_or_default().trim();

        match essence {
            "multipart/form-data" => read_multipart(req, state).await.map(FormRequest),
            "application/x-www-form-urlencoded" => {
                read_urlencoded(req, state).await.map(FormRequest)
            }
            "" => Err(Error::invalid_payload(REQUEST_BODY, "missing content type")),
            other => Err(Error::invalid_payload(
                REQUEST_BODY,
                format!("unsupported content type '{}'", other),
            )),
        }
    }
}

async fn read_multipart<S: Send + Sync>(req: Request, state: &S) -> Result<RawRequest> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| body_error(e.status(), e.body_text()))?;

    let mut request = RawRequest::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_error(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            tracing::debug!("skipping unnamed multipart part");
            continue;
        };
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| body_error(e.status(), e.body_text()))?;

        request.push(name, FormPart::binary(bytes.to_vec(), filename, content_type));
    }
    Ok(request)
}

async fn read_urlencoded<S: Send + Sync>(req: Request, state: &S) -> Result<RawRequest> {
    let body = Bytes::from_request(req, state)
        .await
        .map_err(|e| body_error(e.status(), e.body_text()))?;

    let mut request = RawRequest::new();
    for (name, value) in url::form_urlencoded::parse(&body) {
        request.push(name.into_owned(), FormPart::text(value.into_owned()));
    }
    Ok(request)
}

/// Body limit breaches keep their 413; anything else unreadable is a bad payload.
fn body_error(status: StatusCode, reason: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge { reason }
    } else {
        Error::invalid_payload(REQUEST_BODY, reason)
    }
}
