use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A résumé received through the upload form.
pub struct UploadedResume {
    pub filename: String,
    pub data: Bytes,
}

/// Reads the `file` field of a multipart upload. Other fields are ignored.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedResume, AppError> {
    let mut upload: Option<UploadedResume> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        if field.name() != Some("file") {
            field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?;
            continue;
        }

        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
        upload = Some(UploadedResume { filename, data });
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    check_pdf(&upload.filename, &upload.data)?;
    Ok(upload)
}

/// Accepts files named `.pdf` that also start with the PDF magic bytes.
fn check_pdf(filename: &str, data: &[u8]) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation(
            "Only PDF résumés are accepted".to_string(),
        ));
    }
    if !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation(
            "File has .pdf extension but doesn't appear to be a valid PDF".to_string(),
        ));
    }
    Ok(())
}
