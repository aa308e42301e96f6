use quill_storage::{Storage, StoredUpload, UploadStore};

use crate::error::ApiError;
use crate::extract::UploadedFile;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(storage: Storage, uploads: UploadStore) -> Self {
        Self { storage, uploads }
    }

    /// Persist the request's file, if it carried one
    pub async fn store_upload(
        &self,
        file: Option<&UploadedFile>,
    ) -> Result<Option<StoredUpload>, ApiError> {
        match file {
            Some(file) => {
                let stored = self
                    .uploads
                    .save(file.file_name.as_deref(), &file.bytes)
                    .await?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    /// Remove an upload whose record never made it into storage
    pub async fn discard_upload(&self, upload: Option<StoredUpload>) {
        if let Some(upload) = upload
            && let Err(e) = self.uploads.remove(&upload).await
        {
            tracing::warn!(
                filename = %upload.filename,
                error = %e,
                "Failed to remove orphaned upload"
            );
        }
    }
}
