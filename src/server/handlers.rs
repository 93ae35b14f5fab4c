//! Route handlers

use super::extract::FormRequest;
use super::response::write_document;
use super::AppState;
use crate::error::{Error, Result};
use crate::form::{fields, RawRequest};
use crate::options::{DocumentOfRecordOptions, RenderOptions};
use axum::{extract::State, http::HeaderMap, response::Response};

#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub(crate) async fn render_pdf_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    FormRequest(request): FormRequest,
) -> Result<Response> {
    log_unknown_fields(&request, fields::RENDER_PDF_FORM);

    let options = RenderOptions::assemble(&request, state.lookup.as_ref())?;
    let template = options.template_url_or_filename();
    tracing::info!(template, content_root = %options.content_root(), "rendering PDF form");

    let document = state.render_engine.render(&options).await.map_err(|e| {
        tracing::error!(template, error = %e, "rendering engine failed");
        Error::engine_failure(template, &e)
    })?;
    tracing::debug!(template, bytes = document.bytes.len(), "PDF form rendered");

    write_document(&headers, document)
}

#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub(crate) async fn document_of_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    FormRequest(request): FormRequest,
) -> Result<Response> {
    log_unknown_fields(&request, fields::DOCUMENT_OF_RECORD);

    let options = DocumentOfRecordOptions::assemble(&request, state.lookup.as_ref())?;
    let template = options.form_resource().uri.as_str();
    tracing::info!(
        template,
        locale = %options.locale(),
        attachments = options.attachments().len(),
        "generating document of record"
    );

    let document = state.dor_engine.render(&options).await.map_err(|e| {
        tracing::error!(template, error = %e, "document of record engine failed");
        Error::engine_failure(template, &e)
    })?;
    tracing::debug!(template, bytes = document.bytes.len(), "document of record generated");

    write_document(&headers, document)
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

fn log_unknown_fields(request: &RawRequest, known: &[&str]) {
    for name in request.unknown_fields(known) {
        tracing::debug!(field = name, "ignoring unknown request field");
    }
}
