//! Router-level tests: every request goes through `tower::ServiceExt::oneshot`
//! against the real axum router, with a mock model behind the service.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{
    mock_replying, multipart_body, pdf_with_pages, service_for_endpoint, service_with, BOUNDARY,
};
use edgequake_llm::providers::MockAgentProvider;
use edgequake_pdf2json::server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_with(mock: Arc<MockAgentProvider>) -> Router {
    router(AppState::ready(service_with(mock)))
}

fn upload(content_type: Option<&str>, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/extract")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body("file", "form.pdf", content_type, data)))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_running() {
    let app = app_with(mock_replying("{}"));
    let request = Request::get("/").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "PDF Extractor API is running"}));
}

#[tokio::test]
async fn stub_reply_is_returned_verbatim() {
    let backend = mock_replying(r#"{"name": "Alice", "age": "30"}"#);
    let app = app_with(backend.clone());

    let pdf = pdf_with_pages(&["Name: Alice\nAge: 30"]);
    let (status, body) = send(app, upload(Some("application/pdf"), &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "Alice", "age": "30"}));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn fenced_reply_round_trips() {
    let backend = mock_replying(
        "```json\n{\"applicant\": {\"name\": \"Alice\"}, \"signature\": \"\"}\n```",
    );
    let app = app_with(backend);

    let pdf = pdf_with_pages(&["Applicant", "Signature"]);
    let (status, body) = send(app, upload(Some("application/pdf"), &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"applicant": {"name": "Alice"}, "signature": ""}));
}

#[tokio::test]
async fn non_json_reply_is_wrapped_with_200() {
    let raw = "I could not find any fields in this document.";
    let app = app_with(mock_replying(raw));

    let pdf = pdf_with_pages(&["Lorem ipsum"]);
    let (status, body) = send(app, upload(Some("application/pdf"), &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "error": "Failed to parse JSON from model output",
            "raw_output": raw,
        })
    );
}

#[tokio::test]
async fn wrong_content_type_is_rejected_before_model_call() {
    for content_type in [Some("image/png"), Some("application/pdf; charset=binary"), None] {
        let backend = mock_replying("{}");
        let app = app_with(backend.clone());

        let pdf = pdf_with_pages(&["Name: Alice"]);
        let (status, body) = send(app, upload(content_type, &pdf)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "content type {content_type:?}");
        assert_eq!(body, json!({"detail": "Invalid file type. Only PDF is allowed."}));
        assert_eq!(backend.call_count(), 0);
    }
}

#[tokio::test]
async fn unavailable_service_answers_503_first() {
    let app = router(AppState::unavailable("GROQ_API_KEY not found"));

    // Even a request that would fail the content-type check gets 503.
    let (status, body) = send(app, upload(Some("text/plain"), b"hello")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"detail": "Service not initialized properly"}));
}

#[tokio::test]
async fn upstream_failure_is_502_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "model_decommissioned", "type": "invalid_request_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = router(AppState::ready(service_for_endpoint(&server.uri())));

    let pdf = pdf_with_pages(&["Name: Alice"]);
    let (status, body) = send(app, upload(Some("application/pdf"), &pdf)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let detail = body["detail"].as_str().unwrap();
    assert!(
        detail.starts_with("Error processing document with OpenAI-compatible API:"),
        "got {detail}"
    );
    assert!(detail.contains("model_decommissioned"), "got {detail}");
}

#[tokio::test]
async fn image_only_pdf_fails_without_model_call() {
    let backend = mock_replying("{}");
    let app = app_with(backend.clone());

    let pdf = pdf_with_pages(&["", ""]);
    let (status, body) = send(app, upload(Some("application/pdf"), &pdf)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("scanned image-only PDF"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn mislabelled_bytes_are_bad_request() {
    let backend = mock_replying("{}");
    let app = app_with(backend.clone());

    let (status, _) = send(app, upload(Some("application/pdf"), b"PK\x03\x04not a pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn missing_file_field_is_bad_request() {
    let app = app_with(mock_replying("{}"));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/extract")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(
            "document",
            "form.pdf",
            Some("application/pdf"),
            &pdf_with_pages(&["x"]),
        )))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("'file'"));
}

#[tokio::test]
async fn non_multipart_body_is_bad_request() {
    let app = app_with(mock_replying("{}"));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn oversized_upload_is_413() {
    let backend = mock_replying("{}");
    let app = router(AppState::ready(service_with(backend.clone())).with_body_limit(1024));

    let pdf = vec![b'x'; 4096];
    let (status, body) = send(app, upload(Some("application/pdf"), &pdf)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].is_string());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn oversized_extra_field_is_413_not_ignored() {
    let backend = mock_replying("{}");
    let app = router(AppState::ready(service_with(backend.clone())).with_body_limit(1024));

    let mut form = Vec::new();
    form.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"notes\"\r\n\r\n{}\r\n",
            "n".repeat(4096)
        )
        .as_bytes(),
    );
    let file_part = multipart_body("file", "form.pdf", Some("application/pdf"), b"%PDF-1.5");
    form.extend_from_slice(&file_part);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/extract")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form))
        .unwrap();

    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = app_with(mock_replying("{}"));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/extract")
        .header(header::ORIGIN, "http://localhost:8501")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:8501"
    );
}
