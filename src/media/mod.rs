//! Object storage for uploaded images.

mod local;

pub use local::LocalMediaStore;

use async_trait::async_trait;

use crate::errors::AppError;

/// Public URL prefix under which stored media is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Storage contract for uploaded images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store raw bytes and return a stable URL for them.
    async fn save(&self, data: &[u8], content_type: &str) -> Result<String, AppError>;
}

/// Reject anything that is not a non-empty image payload.
pub fn validate_upload(data: &[u8], content_type: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Upload body is empty".to_string()));
    }

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !essence.starts_with("image/") {
        return Err(AppError::Validation(format!(
            "Only images can be uploaded, got '{}'",
            content_type
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload(b"png", "image/png").is_ok());
        assert!(validate_upload(b"jpg", "Image/JPEG; charset=binary").is_ok());
        assert!(validate_upload(b"", "image/png").is_err());
        assert!(validate_upload(b"text", "text/plain").is_err());
        assert!(validate_upload(b"text", "").is_err());
    }
}
