//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use edgequake_llm::providers::MockAgentProvider;
use edgequake_pdf2json::{ApiKey, ExtractionConfig, ExtractionService};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::Arc;

/// A mock model that answers the next call with `reply`.
pub fn mock_replying(reply: &str) -> Arc<MockAgentProvider> {
    let mock = Arc::new(MockAgentProvider::new());
    mock.add_response_sync(reply);
    mock
}

fn static_key_config() -> ExtractionConfig {
    ExtractionConfig::builder()
        .api_key(ApiKey::new("gsk_integration").expect("non-empty key"))
        .build()
        .expect("valid config")
}

/// A service with a static key in front of `mock`.
pub fn service_with(mock: Arc<MockAgentProvider>) -> ExtractionService {
    ExtractionService::new(static_key_config(), mock).expect("service builds")
}

/// A service with a static key that builds a real provider for `base_url`
/// on every call.
pub fn service_for_endpoint(base_url: &str) -> ExtractionService {
    let config = ExtractionConfig::builder()
        .api_key(ApiKey::new("gsk_integration").expect("non-empty key"))
        .api_base_url(base_url)
        .build()
        .expect("valid config");
    ExtractionService::from_config(config).expect("service builds")
}

/// Build a PDF with one page per entry. Lines in an entry become separate
/// text objects; an empty entry is a page without text.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page_text in pages {
        let mut operations = Vec::new();
        for (i, line) in page_text.lines().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(72), Object::Integer(720 - 20 * i as i64)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("pdf serialises");
    buf
}

pub const BOUNDARY: &str = "pdf2json-test-boundary";

/// A `multipart/form-data` body with one file field.
pub fn multipart_body(
    field: &str,
    filename: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
