//! Integration tests for PDF Forms Server

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use pdf_forms_server::{
    router, AppState, DocumentOfRecordOptions, DorEngine, EngineError, FsResourceLookup,
    RenderEngine, RenderOptions, RenderedDocument, ServerConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BOUNDARY: &str = "pdf-forms-test-boundary";

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn forms_dir() -> String {
    std::fs::canonicalize(fixture_path("forms"))
        .expect("Failed to resolve fixture dir")
        .display()
        .to_string()
}

/// Records every options object it receives and answers with a fixed reply
struct FakeEngine {
    seen: Mutex<Vec<Value>>,
    reply: Option<RenderedDocument>,
}

impl FakeEngine {
    fn rendering(document: RenderedDocument) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            reply: Some(document),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            reply: None,
        })
    }

    fn record(&self, options: Value) -> Result<RenderedDocument, EngineError> {
        self.seen.lock().unwrap().push(options);
        self.reply
            .clone()
            .ok_or_else(|| EngineError::Failed("renderer crashed".to_string()))
    }

    fn calls(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderEngine for FakeEngine {
    async fn render(&self, options: &RenderOptions) -> Result<RenderedDocument, EngineError> {
        self.record(serde_json::to_value(options).unwrap())
    }
}

#[async_trait]
impl DorEngine for FakeEngine {
    async fn render(
        &self,
        options: &DocumentOfRecordOptions,
    ) -> Result<RenderedDocument, EngineError> {
        self.record(serde_json::to_value(options).unwrap())
    }
}

fn app(engine: Arc<FakeEngine>) -> Router {
    app_with_config(engine, &ServerConfig::default())
}

fn app_with_config(engine: Arc<FakeEngine>, config: &ServerConfig) -> Router {
    let state = AppState::new(
        Arc::new(FsResourceLookup::new(vec![fixture_path("")])),
        engine.clone(),
        engine,
    );
    router(state, config)
}

fn pdf_engine() -> Arc<FakeEngine> {
    FakeEngine::rendering(RenderedDocument::pdf(b"%PDF-1.7 rendered".to_vec()))
}

struct Part {
    name: &'static str,
    filename: Option<&'static str>,
    content_type: Option<&'static str>,
    bytes: Vec<u8>,
}

fn text(name: &'static str, value: &str) -> Part {
    Part {
        name,
        filename: None,
        content_type: None,
        bytes: value.as_bytes().to_vec(),
    }
}

fn file(
    name: &'static str,
    filename: &'static str,
    content_type: &'static str,
    bytes: &[u8],
) -> Part {
    Part {
        name,
        filename: Some(filename),
        content_type: Some(content_type),
        bytes: bytes.to_vec(),
    }
}

fn multipart(uri: &str, parts: Vec<Part>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{}\"", filename));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn urlencoded(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

fn body_text(body: &Bytes) -> String {
    String::from_utf8_lossy(body).into_owned()
}

// ============================================================================
// Render PDF form
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send(
        app(pdf_engine()),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_text(&body), "ok");
}

#[tokio::test]
async fn test_render_with_defaults() {
    let engine = pdf_engine();
    let (status, headers, body) = send(
        app(engine.clone()),
        urlencoded("/render-pdf-form", "template=forms%2Fsample.xdp"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(headers[header::CONTENT_LENGTH], "17");
    assert_eq!(&body[..], b"%PDF-1.7 rendered");

    assert_eq!(
        engine.calls(),
        vec![json!({
            "acrobatVersion": "Acrobat_11",
            "cacheStrategy": "AGGRESSIVE",
            "contentRoot": forms_dir(),
            "submitUrls": [],
            "taggedPdf": false,
            "templateUrlOrFilename": "sample.xdp",
            "attachments": [],
        })]
    );
}

#[tokio::test]
async fn test_render_with_every_option() {
    let engine = pdf_engine();
    let utf16_data: Vec<u8> = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-16\"?><data><name>Zoë</name></data>"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();

    let request = multipart(
        "/render-pdf-form",
        vec![
            text("template", "forms/sample.xdp"),
            file("data", "data.xml", "application/xml", &utf16_data),
            text("renderOptions.acrobatVersion", "Acrobat_10_1"),
            text("renderOptions.cacheStrategy", "CONSERVATIVE"),
            text("renderOptions.debugDir", "/tmp/forms-debug"),
            text("renderOptions.locale", "fr-CA"),
            text("renderOptions.submitUrl", "/submit/a"),
            text("renderOptions.submitUrl", "https://forms.example.com/submit/b"),
            text("renderOptions.submitUrl", "mailto:forms@example.com"),
            text("renderOptions.taggedPdf", "TRUE"),
            file("renderOptions.xci", "config.xci", "text/xml", b"<xci><pdf version=\"1.7\"/></xci>"),
            file("attachment", "first.txt", "text/plain", b"first"),
            file("attachment", "second.png", "image/png", b"\x89PNG"),
        ],
    );
    let (status, _, _) = send(app(engine.clone()), request).await;
    assert_eq!(status, StatusCode::OK);

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        json!({
            "acrobatVersion": "Acrobat_10_1",
            "cacheStrategy": "CONSERVATIVE",
            "contentRoot": forms_dir(),
            "debugDir": "/tmp/forms-debug",
            "locale": "fr-CA",
            "submitUrls": [
                "/submit/a",
                "https://forms.example.com/submit/b",
                "mailto:forms@example.com",
            ],
            "taggedPdf": true,
            "xci": "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?><xci><pdf version=\"1.7\"/></xci>",
            "templateUrlOrFilename": "sample.xdp",
            "inlineData": "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?><data><name>Zoë</name></data>",
            "attachments": [
                { "filename": "first.txt", "contentType": "text/plain", "bytes": "Zmlyc3Q=" },
                { "filename": "second.png", "contentType": "image/png", "bytes": "iVBORw==" },
            ],
        })
    );
}

#[tokio::test]
async fn test_render_with_explicit_content_root() {
    let engine = pdf_engine();
    let request = multipart(
        "/render-pdf-form",
        vec![
            text("template", "sample.xdp"),
            text("renderOptions.contentRoot", &forms_dir()),
        ],
    );
    let (status, _, _) = send(app(engine.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    let calls = engine.calls();
    assert_eq!(calls[0]["contentRoot"], forms_dir());
    assert_eq!(calls[0]["templateUrlOrFilename"], "sample.xdp");
}

#[tokio::test]
async fn test_render_missing_template() {
    let engine = pdf_engine();
    let (status, headers, body) = send(
        app(engine.clone()),
        urlencoded(
            "/render-pdf-form",
            "renderOptions.acrobatVersion=Acrobat_5&renderOptions.taggedPdf=maybe",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(
        body_text(&body),
        "Bad request parameter; missing required parameter 'template'"
    );
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_render_invalid_acrobat_version() {
    let engine = pdf_engine();
    let (status, _, body) = send(
        app(engine.clone()),
        urlencoded(
            "/render-pdf-form",
            "template=forms%2Fsample.xdp&renderOptions.acrobatVersion=Acrobat_5",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body_text(&body);
    assert!(message.starts_with("Bad request parameter"));
    assert!(message.contains("incoming parameters"));
    assert!(message.contains("renderOptions.acrobatVersion"));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_render_template_not_found() {
    let (status, _, body) = send(
        app(pdf_engine()),
        urlencoded("/render-pdf-form", "template=form%2Fbar.xdp"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body_text(&body);
    assert!(message.contains("unable to find template"));
    assert!(message.contains("bar.xdp"));
}

#[tokio::test]
async fn test_render_malformed_data() {
    let request = multipart(
        "/render-pdf-form",
        vec![
            text("template", "forms/sample.xdp"),
            file("data", "data.xml", "application/xml", b"<data><name>Jane</data>"),
        ],
    );
    let (status, _, body) = send(app(pdf_engine()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body_text(&body).starts_with("Input XML payload invalid in 'data'"));
}

#[tokio::test]
async fn test_render_not_acceptable() {
    let mut request = urlencoded("/render-pdf-form", "template=forms%2Fsample.xdp");
    request
        .headers_mut()
        .insert(header::ACCEPT, "text/html".parse().unwrap());
    let (status, _, _) = send(app(pdf_engine()), request).await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_render_accepts_wildcards() {
    let mut request = urlencoded("/render-pdf-form", "template=forms%2Fsample.xdp");
    request
        .headers_mut()
        .insert(header::ACCEPT, "text/html, application/*;q=0.8".parse().unwrap());
    let (status, _, _) = send(app(pdf_engine()), request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_render_engine_failure() {
    let (status, _, body) = send(
        app(FakeEngine::failing()),
        urlencoded("/render-pdf-form", "template=forms%2Fsample.xdp"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(&body),
        "Error while rendering form 'sample.xdp' caused by 'renderer crashed'."
    );
}

#[tokio::test]
async fn test_render_empty_engine_output() {
    let engine = FakeEngine::rendering(RenderedDocument::pdf(Vec::new()));
    let (status, _, _) = send(
        app(engine),
        urlencoded("/render-pdf-form", "template=forms%2Fsample.xdp"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unsupported_body_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/render-pdf-form")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"template":"forms/sample.xdp"}"#))
        .unwrap();
    let (status, _, body) = send(app(pdf_engine()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body_text(&body).starts_with("Input XML payload invalid"));
}

#[tokio::test]
async fn test_request_body_over_limit() {
    let engine = pdf_engine();
    let config = ServerConfig {
        max_request_bytes: 1024,
        ..ServerConfig::default()
    };
    let request = multipart(
        "/render-pdf-form",
        vec![
            text("template", "forms/sample.xdp"),
            file("attachment", "big.bin", "application/octet-stream", &[0u8; 4096]),
        ],
    );
    let (status, _, body) = send(app_with_config(engine.clone(), &config), request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_text(&body).starts_with("Request body too large"));
    assert!(engine.calls().is_empty());
}

// ============================================================================
// Document of record
// ============================================================================

#[tokio::test]
async fn test_document_of_record_defaults() {
    let engine = pdf_engine();
    let request = multipart(
        "/document-of-record",
        vec![
            text("template", "forms/claim.xdp"),
            file("data", "claim.xml", "application/xml", b"<claim><id>7</id></claim>"),
        ],
    );
    let (status, headers, _) = send(app(engine.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["locale"], "en");
    assert_eq!(calls[0]["includeAttachments"], false);
    assert_eq!(calls[0]["formResource"]["uri"], "forms/claim.xdp");
    assert_eq!(
        calls[0]["dataXml"],
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?><claim><id>7</id></claim>"
    );
}

#[tokio::test]
async fn test_document_of_record_attachments_in_order() {
    let engine = pdf_engine();
    let request = multipart(
        "/document-of-record",
        vec![
            text("template", "forms/claim.xdp"),
            text("data", "<claim/>"),
            text("locale", "de-DE"),
            file("attachment", "b.pdf", "application/pdf", b"%PDF-b"),
            file("attachment", "a.txt", "text/plain", b"a"),
        ],
    );
    let (status, _, _) = send(app(engine.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    let calls = engine.calls();
    assert_eq!(calls[0]["locale"], "de-DE");
    assert_eq!(calls[0]["includeAttachments"], true);
    assert_eq!(
        calls[0]["attachments"],
        json!([
            { "filename": "b.pdf", "contentType": "application/pdf", "bytes": "JVBERi1i" },
            { "filename": "a.txt", "contentType": "text/plain", "bytes": "YQ==" },
        ])
    );
}

#[tokio::test]
async fn test_document_of_record_requires_data() {
    let engine = pdf_engine();
    let (status, _, body) = send(
        app(engine.clone()),
        urlencoded("/document-of-record", "template=forms%2Fclaim.xdp"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(&body),
        "Bad request parameter; missing required parameter 'data'"
    );
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_document_of_record_template_not_found() {
    let (status, _, body) = send(
        app(pdf_engine()),
        urlencoded("/document-of-record", "template=forms%2Fnone.xdp&data=%3Cclaim%2F%3E"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body_text(&body).contains("unable to find template 'forms/none.xdp'"));
}

#[tokio::test]
async fn test_document_of_record_engine_failure() {
    let (status, _, body) = send(
        app(FakeEngine::failing()),
        urlencoded("/document-of-record", "template=forms%2Fclaim.xdp&data=%3Cclaim%2F%3E"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(&body).contains("forms/claim.xdp"));
}
