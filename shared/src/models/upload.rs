//! Upload Model: image constraints and reference resolution

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Maximum upload size (5 MB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted image content types
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Stored reference (relative path or absolute URL)
    #[serde(alias = "imageUrl", alias = "path")]
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Check content type and size before uploading
pub fn validate_image(content_type: &str, size: u64) -> AppResult<()> {
    if size == 0 {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("size", size)
            .with_detail("max", MAX_UPLOAD_BYTES));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
            .with_detail("contentType", content_type));
    }
    Ok(())
}

/// Turn a stored image reference into a displayable URL
///
/// Absolute `http(s)://` and `data:` references pass through unchanged;
/// relative ones are joined onto `base_url`. Empty references yield `None`.
pub fn resolve_image_url(base_url: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
    {
        return Some(reference.to_string());
    }
    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    ))
}
