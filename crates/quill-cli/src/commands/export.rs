use anyhow::Result;
use quill_config::Config;
use quill_storage::{CsvExporter, ExportOutcome};
use std::path::Path;

/// One-shot CSV dump of form submissions. No retries.
pub async fn handle(config: &Config, target: &Path) -> Result<()> {
    let exporter = match CsvExporter::connect(&config.database.path).await {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    let result = exporter.export_submissions(target).await;
    exporter.close().await;

    match result {
        Ok(ExportOutcome::Empty) => {
            println!("No form submissions found; {} left untouched.", target.display());
            Ok(())
        }
        Ok(ExportOutcome::Written { rows, path }) => {
            println!("✓ Exported {} submission(s) to {}", rows, path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            Err(e.into())
        }
    }
}
