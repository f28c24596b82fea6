//! Image upload API

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared::error::{AppError, ErrorCode};
use shared::models::{UploadResponse, resolve_image_url, validate_image};

use crate::{ClientError, ClientResult, HttpClient};

/// Multipart field name expected by the upload endpoint
pub const UPLOAD_FIELD: &str = "image";

/// Content type guessed from the file extension
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Validate type (by extension) and size before uploading
pub fn check_upload(filename: &str, size: u64) -> ClientResult<String> {
    let content_type = content_type_for(filename);
    validate_image(&content_type, size)?;
    Ok(content_type)
}

#[async_trait]
pub trait UploadApi: Send + Sync {
    /// Upload image bytes; returns the stored reference
    async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<UploadResponse>;

    /// Displayable URL for a stored reference
    fn image_url(&self, reference: &str) -> Option<String>;

    /// Read and upload a file from disk
    async fn upload_file(&self, path: &Path) -> ClientResult<UploadResponse> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ClientError::Validation(AppError::with_message(
                    ErrorCode::InvalidRequest,
                    format!("Not a file path: {}", path.display()),
                ))
            })?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Storage(format!("Failed to read {}: {e}", path.display())))?;
        self.upload_image(&filename, bytes).await
    }
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    http: HttpClient,
}

impl UploadClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UploadApi for UploadClient {
    async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<UploadResponse> {
        let content_type = check_upload(filename, bytes.len() as u64)?;
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(&content_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let uploaded: UploadResponse = self.http.post_multipart("/api/upload", form).await?;
        tracing::info!(filename, size, url = %uploaded.url, "Image uploaded");
        Ok(uploaded)
    }

    fn image_url(&self, reference: &str) -> Option<String> {
        resolve_image_url(self.http.base_url(), reference)
    }
}
