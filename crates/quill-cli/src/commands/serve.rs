use anyhow::{Context, Result};
use quill_config::Config;
use quill_server::QuillServer;
use quill_storage::{Storage, UploadStore};

pub async fn handle(config: &Config) -> Result<()> {
    // Schema is brought up to date before the listener is bound
    let storage = Storage::new(&config.database.path)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path.display()))?;

    if config.uploads.base_url.is_empty() {
        tracing::warn!("No base URL configured (BASE_URL); image URLs will be host-relative");
    }

    let uploads = UploadStore::new(
        config.uploads.dir.clone(),
        &config.uploads.base_url,
        &config.uploads.static_prefix,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to prepare upload directory {}",
            config.uploads.dir.display()
        )
    })?;

    tracing::info!(
        database = %config.database.path.display(),
        uploads = %config.uploads.dir.display(),
        "Starting quill"
    );

    QuillServer::new(storage, uploads)
        .with_static_prefix(&config.uploads.static_prefix)
        .with_body_limit(config.server.max_body_bytes)
        .serve(&config.bind_addr())
        .await
}
