//! Image payload intake
//!
//! Validates the uploaded base64 payload before anything is sent upstream:
//! size gate, base64 decode, and magic-byte sniffing of the image format.
//! The provider wants the caller's base64 back on the wire, so only the
//! media type and decoded size are kept.

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

use crate::error::ApiError;

/// Image formats the extraction provider accepts
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/webp", "image/gif"];

/// Intake validation failures, all caller errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("Image payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Image exceeds maximum size of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Unrecognized image format")]
    UnrecognizedFormat,

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Validated facts about an uploaded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Sniffed media type, always one of `SUPPORTED_MEDIA_TYPES`
    pub media_type: &'static str,
    /// Decoded payload size
    pub size_bytes: usize,
}

/// Validate a base64 image payload against the size cap and the supported
/// format list.
pub fn inspect_image(image_base64: &str, max_bytes: usize) -> Result<ImageInfo, IntakeError> {
    let trimmed = image_base64.trim();

    // Cheap length gate before decoding anything
    if trimmed.len() / 4 * 3 > max_bytes {
        return Err(IntakeError::TooLarge { limit: max_bytes });
    }

    let bytes = STANDARD
        .decode(trimmed)
        .map_err(|e| IntakeError::InvalidBase64(e.to_string()))?;

    if bytes.len() > max_bytes {
        return Err(IntakeError::TooLarge { limit: max_bytes });
    }

    let kind = infer::get(&bytes).ok_or(IntakeError::UnrecognizedFormat)?;
    let media_type = SUPPORTED_MEDIA_TYPES
        .iter()
        .copied()
        .find(|&m| m == kind.mime_type())
        .ok_or_else(|| IntakeError::UnsupportedType(kind.mime_type().to_string()))?;

    Ok(ImageInfo {
        media_type,
        size_bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 8 * 1024 * 1024;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R']);
        bytes
    }

    #[test]
    fn png_payload_is_accepted() {
        let encoded = STANDARD.encode(png_bytes());
        let info = inspect_image(&encoded, MAX).unwrap();
        assert_eq!(info.media_type, "image/png");
        assert_eq!(info.size_bytes, 16);
    }

    #[test]
    fn jpeg_payload_is_accepted() {
        let bytes = [
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
        ];
        let encoded = STANDARD.encode(bytes);
        let info = inspect_image(&encoded, MAX).unwrap();
        assert_eq!(info.media_type, "image/jpeg");
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let encoded = format!("  {}\n", STANDARD.encode(png_bytes()));
        assert!(inspect_image(&encoded, MAX).is_ok());
    }

    #[test]
    fn garbage_base64_is_rejected() {
        let err = inspect_image("not!!valid@@base64", MAX).unwrap_err();
        assert!(matches!(err, IntakeError::InvalidBase64(_)));
    }

    #[test]
    fn oversize_payload_is_rejected() {
        let encoded = STANDARD.encode(vec![0u8; 64]);
        let err = inspect_image(&encoded, 32).unwrap_err();
        assert_eq!(err, IntakeError::TooLarge { limit: 32 });
    }

    #[test]
    fn text_payload_is_unrecognized() {
        let encoded = STANDARD.encode(b"just some plain text, no image here");
        let err = inspect_image(&encoded, MAX).unwrap_err();
        assert_eq!(err, IntakeError::UnrecognizedFormat);
    }

    #[test]
    fn non_image_format_is_unsupported() {
        let encoded = STANDARD.encode(b"%PDF-1.4\nrest of the document");
        let err = inspect_image(&encoded, MAX).unwrap_err();
        assert_eq!(
            err,
            IntakeError::UnsupportedType("application/pdf".to_string())
        );
    }

    #[test]
    fn intake_errors_map_to_bad_request() {
        let api_err: ApiError = IntakeError::UnrecognizedFormat.into();
        assert_eq!(api_err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(api_err.to_string(), "Unrecognized image format");
    }
}
