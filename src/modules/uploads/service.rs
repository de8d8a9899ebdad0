use std::path::Path;

use rand::Rng;
use tracing::{debug, instrument};

use crate::config::upload::UploadConfig;
use crate::utils::errors::AppError;

pub struct UploadService;

impl UploadService {
    /// Write a profile image to disk and return the generated filename.
    /// The name embeds the owner's id plus a timestamp and a random suffix
    /// so concurrent uploads never collide.
    #[instrument(skip(config, data), fields(user.id = %user_id, file.size = data.len()))]
    pub async fn save_profile_image(
        config: &UploadConfig,
        user_id: i64,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let filename = format!(
            "profile-{}-{}{}",
            user_id,
            unique_suffix(),
            file_extension(original_name)
        );

        write_file(&config.profile_dir().join(&filename), data).await?;

        debug!(filename = %filename, "Profile image saved");

        Ok(filename)
    }

    #[instrument(skip(config, data), fields(file.size = data.len()))]
    pub async fn save_movie_image(
        config: &UploadConfig,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let filename = format!("movie-{}{}", unique_suffix(), file_extension(original_name));

        write_file(&config.movie_dir().join(&filename), data).await?;

        debug!(filename = %filename, "Movie image saved");

        Ok(filename)
    }

    /// Remove a previously uploaded file, trying the profiles directory
    /// first and the movies directory second. Returns whether a file was
    /// actually removed.
    #[instrument(skip(config))]
    pub async fn delete_file(config: &UploadConfig, filename: &str) -> Result<bool, AppError> {
        // The filename ends up joined onto the upload dirs; refuse anything
        // that could escape them.
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(AppError::bad_request("Invalid filename"));
        }

        for dir in [config.profile_dir(), config.movie_dir()] {
            match tokio::fs::remove_file(dir.join(filename)).await {
                Ok(()) => {
                    debug!(filename = %filename, dir = %dir.display(), "File deleted");
                    return Ok(true);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(AppError::internal(anyhow::anyhow!(
                        "Failed to delete file: {}",
                        e
                    )));
                }
            }
        }

        Ok(false)
    }
}

async fn write_file(path: &Path, data: &[u8]) -> Result<(), AppError> {
    tokio::fs::write(path, data)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to save file: {}", e)))
}

fn unique_suffix() -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        rand::thread_rng().gen_range(0..1_000_000_000u32)
    )
}

fn file_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_lowercases() {
        assert_eq!(file_extension("Photo.PNG"), ".png");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("no_extension"), "");
    }

    #[tokio::test]
    async fn test_delete_file_rejects_traversal() {
        let config = UploadConfig {
            base_dir: std::path::PathBuf::from("uploads"),
        };

        assert!(UploadService::delete_file(&config, "../secret").await.is_err());
        assert!(UploadService::delete_file(&config, "a/b.png").await.is_err());
        assert!(UploadService::delete_file(&config, "").await.is_err());
    }
}
