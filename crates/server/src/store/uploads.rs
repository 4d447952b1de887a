//! Uploaded product images on disk.

use std::path::{Path, PathBuf};

use rand::Rng as _;
use rand::distr::Alphanumeric;

use super::StoreError;

/// Public URL prefix the images are served under.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Maximum accepted image size (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Directory of uploaded images, addressed by their public `/uploads/...`
/// paths.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created.
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a fresh unique name, keeping the extension of
    /// `original_name`, and return the public `/uploads/...` path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file write fails.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let name = unique_name(original_name);
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        Ok(format!("{UPLOADS_PREFIX}{name}"))
    }

    /// Delete the file behind an image path, if it is one of ours.
    ///
    /// Paths outside [`UPLOADS_PREFIX`] (placeholder data URIs, absolute
    /// URLs) are ignored. A missing file is not an error; other failures
    /// are logged and swallowed so a cleanup hiccup never fails the
    /// catalog mutation it rides on.
    pub async fn remove(&self, image_path: &str) {
        let Some(name) = image_path.strip_prefix(UPLOADS_PREFIX) else {
            return;
        };
        // Refuse anything that could escape the upload directory.
        if name.contains('/') || name.contains("..") {
            tracing::warn!(image_path, "refusing to remove suspicious upload path");
            return;
        }
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(image_path, error = %e, "could not remove stale upload");
            }
        }
    }
}

/// `{unix-millis}_{random-alnum}{.ext}`, matching the ids the rest of the
/// system generates.
fn unique_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{millis}_{suffix}{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_remove_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::open(dir.path().to_path_buf()).expect("open");

        let path = store.save("latte.png", b"fake png").await.expect("save");
        assert!(path.starts_with(UPLOADS_PREFIX));
        assert!(path.ends_with(".png"));

        let on_disk = dir.path().join(path.trim_start_matches(UPLOADS_PREFIX));
        assert!(on_disk.exists());

        store.remove(&path).await;
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn non_upload_paths_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::open(dir.path().to_path_buf()).expect("open");
        // Must not panic or touch the filesystem.
        store.remove("data:image/svg+xml,whatever").await;
        store.remove("/uploads/../../etc/passwd").await;
    }

    #[test]
    fn unique_names_keep_the_extension() {
        let name = unique_name("photo.jpeg");
        assert!(name.ends_with(".jpeg"));
        let name = unique_name("no-extension");
        assert!(!name.contains('.'));
    }
}
