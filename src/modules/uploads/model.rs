//! Upload DTOs and file validation.

use std::path::Path;

use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::errors::AppError;

/// Metadata about an uploaded multipart field, gathered before anything
/// touches the disk.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub mime_type: String,
    pub size_bytes: usize,
    pub filename: String,
}

/// Validator for image uploads (profile photos and movie posters).
///
/// Both the file extension and the MIME type must match the image
/// allow-list, the same double check the upload filter has always done.
//
// TODO: trailer uploads currently pass through this image allow-list too;
// add a video allow-list (mp4, avi, mov, wmv, mkv) when a trailer upload
// route lands.
pub struct ImageUploadValidator;

impl ImageUploadValidator {
    const ALLOWED_IMAGE_PATTERNS: &'static [&'static str] =
        &["jpeg", "jpg", "png", "gif", "webp"];

    pub fn validate(metadata: &FileMetadata, max_size_bytes: usize) -> Result<(), AppError> {
        if metadata.size_bytes > max_size_bytes {
            return Err(AppError::bad_request(format!(
                "File size {} bytes exceeds the {} MB limit",
                metadata.size_bytes,
                max_size_bytes / (1024 * 1024)
            )));
        }

        let extension = Path::new(&metadata.filename)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let mime_type = metadata.mime_type.to_lowercase();

        let extension_ok = Self::ALLOWED_IMAGE_PATTERNS
            .iter()
            .any(|pattern| extension.contains(pattern));
        let mime_ok = Self::ALLOWED_IMAGE_PATTERNS
            .iter()
            .any(|pattern| mime_type.contains(pattern));

        if !extension_ok || !mime_ok {
            return Err(AppError::bad_request(
                "Only image files are allowed (jpeg, jpg, png, gif, webp)",
            ));
        }

        Ok(())
    }
}

/// Response payload for a profile upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
}

/// Response payload for a movie image upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMovieImage {
    pub image_url: String,
    pub filename: String,
}
