use anyhow::Result;
use axum::extract::multipart::Field;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Filename-addressed blob storage under a single uploads root.
///
/// Locators handed back to callers are absolute paths. Blobs are keyed by the
/// (sanitized) upload filename, so a later upload with the same name
/// overwrites the earlier blob — last write wins.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        let dir = fs::canonicalize(&dir).await?;
        info!("Upload storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Path a given filename is stored at.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Drain a multipart field to disk and return the absolute locator once
    /// the stream is fully written and flushed. A failure mid-stream may
    /// leave a partial file behind; no message row ever references it.
    pub async fn save_field(&self, filename: &str, mut field: Field<'_>) -> Result<PathBuf> {
        let path = self.file_path(filename);
        let mut file = fs::File::create(&path).await?;

        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(path)
    }
}

/// Reduce an uploaded filename to a single safe path component, so a hostile
/// name cannot traverse out of the uploads root. Returns `None` for names
/// with nothing usable left (empty, `.`, `..`, bare separators).
pub fn sanitize_filename(raw: &str) -> Option<String> {
    Path::new(raw)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .next_back()
        .map(str::to_owned)
}
