use axum::Json;
use axum::extract::{Multipart, Path, State};
use tracing::instrument;

use crate::config::upload::{MAX_MOVIE_IMAGE_BYTES, MAX_PROFILE_IMAGE_BYTES};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;

use super::model::{FileMetadata, ImageUploadValidator, UploadedFile, UploadedMovieImage};
use super::service::UploadService;

/// Upload a profile image (any authenticated user)
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "File uploaded", body = UploadedFile),
        (status = 400, description = "Missing, oversized, or non-image file"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_profile_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadedFile>>, AppError> {
    let user_id = auth_user.user_id()?;

    let (metadata, data) = read_file_field(multipart, "file").await?;
    ImageUploadValidator::validate(&metadata, MAX_PROFILE_IMAGE_BYTES)?;

    let filename =
        UploadService::save_profile_image(&state.upload_config, user_id, &metadata.filename, &data)
            .await?;

    Ok(Json(ApiResponse::with_message(
        UploadedFile {
            file_url: format!("/uploads/profiles/{}", filename),
            filename,
            original_name: metadata.filename,
            size: metadata.size_bytes,
        },
        "File uploaded successfully",
    )))
}

/// Upload a movie image (admin only)
#[utoipa::path(
    post,
    path = "/api/upload/movie-image",
    responses(
        (status = 200, description = "Image uploaded", body = UploadedMovieImage),
        (status = 400, description = "Missing, oversized, or non-image file"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn upload_movie_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadedMovieImage>>, AppError> {
    let (metadata, data) = read_file_field(multipart, "image").await?;
    ImageUploadValidator::validate(&metadata, MAX_MOVIE_IMAGE_BYTES)?;

    let filename =
        UploadService::save_movie_image(&state.upload_config, &metadata.filename, &data).await?;

    Ok(Json(ApiResponse::with_message(
        UploadedMovieImage {
            image_url: format!("/uploads/movies/{}", filename),
            filename,
        },
        "Movie image uploaded successfully",
    )))
}

/// Delete an uploaded file (admin only)
#[utoipa::path(
    delete,
    path = "/api/upload/file/{filename}",
    params(("filename" = String, Path, description = "Name of the uploaded file")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 400, description = "Invalid filename"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "File not found in either upload directory")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let deleted = UploadService::delete_file(&state.upload_config, &filename).await?;

    if !deleted {
        return Err(AppError::not_found("File not found"));
    }

    Ok(Json(ApiResponse::message("File deleted successfully")))
}

/// Pull the named file field out of the multipart body.
async fn read_file_field(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<(FileMetadata, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field.content_type().unwrap_or("").to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read file: {}", e)))?;

        let metadata = FileMetadata {
            mime_type,
            size_bytes: data.len(),
            filename,
        };

        return Ok((metadata, data.to_vec()));
    }

    Err(AppError::bad_request("File is required"))
}
