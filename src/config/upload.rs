use std::env;
use std::path::PathBuf;

pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_MOVIE_IMAGE_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub base_dir: PathBuf,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            base_dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string())),
        }
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.base_dir.join("profiles")
    }

    pub fn movie_dir(&self) -> PathBuf {
        self.base_dir.join("movies")
    }

    /// Create the upload directories if they do not exist yet. Called once
    /// at startup, before the first request can touch the disk.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.profile_dir())?;
        std::fs::create_dir_all(self.movie_dir())?;
        Ok(())
    }
}
