use super::error::ApiError;
use axum::extract::Multipart;

/// Name of the multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// An uploaded file with its data and declared metadata.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Exact match on the declared type; parameters are not tolerated.
    pub fn declares_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
    }
}

/// Read the multipart body and return the `file` field, fully buffered.
///
/// Other fields are drained and ignored. The first `file` field wins. A read
/// failure keeps the status axum assigns it, so an over-limit body is 413.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == FILE_FIELD && file.is_none() {
            let filename = field.file_name().unwrap_or("upload.pdf").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::new(e.status(), format!("Failed to read file data: {}", e)))?
                .to_vec();

            file = Some(UploadedFile {
                filename,
                content_type,
                data,
            });
        } else {
            field.bytes().await.map_err(|e| {
                ApiError::new(e.status(), format!("Failed to read form field '{}': {}", name, e))
            })?;
        }
    }

    file.ok_or_else(|| {
        ApiError::bad_request(format!("Missing '{}' field in form data", FILE_FIELD))
    })
}
