//! Local upload storage

use std::path::{Path, PathBuf};

use crate::Result;

/// A file written by [`UploadStore::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub path: PathBuf,
    /// Absolute URL under which the static file route serves the upload
    pub url: String,
}

/// Directory of uploaded files plus the public URL they are served under
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    public_base: String,
}

impl UploadStore {
    /// Create the store, making `root` if it does not exist.
    ///
    /// Public URLs are `{base_url}{static_prefix}/{filename}`. An empty
    /// `base_url` yields host-relative URLs.
    pub async fn new(root: PathBuf, base_url: &str, static_prefix: &str) -> Result<Self> {
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self {
            root,
            public_base: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                normalize_prefix(static_prefix)
            ),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh random name that keeps the original extension
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<StoredUpload> {
        let filename = generate_filename(original_name);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            filename = %filename,
            size_bytes = bytes.len(),
            "Stored upload"
        );

        Ok(StoredUpload {
            url: self.public_url(&filename),
            filename,
            path,
        })
    }

    /// Remove a previously stored upload
    pub async fn remove(&self, upload: &StoredUpload) -> Result<()> {
        tokio::fs::remove_file(&upload.path).await?;
        tracing::debug!(filename = %upload.filename, "Removed upload");
        Ok(())
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_base, filename)
    }
}

/// `/uploads`, `uploads/` and `/uploads/` all become `/uploads`
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn generate_filename(original_name: Option<&str>) -> String {
    let stem = uuid::Uuid::new_v4().simple().to_string();

    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
