//! CSV export of a table, read straight from the database file

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

/// Table holding form submissions
pub const SUBMISSIONS_TABLE: &str = "form_submissions";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to open database {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to query table {table}: {source}")]
    Query {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Failed to encode CSV: {0}")]
    Encode(#[from] csv::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The table had no rows; the target file was left alone
    Empty,
    Written { rows: usize, path: PathBuf },
}

/// Read-only exporter over a database file
pub struct CsvExporter {
    pool: SqlitePool,
}

impl CsvExporter {
    /// Open `db_path` read-only. A missing file is an error, never created.
    pub async fn connect(db_path: &Path) -> Result<Self, ExportError> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|source| ExportError::Connect {
                path: db_path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %db_path.display(), "Connected to database");
        Ok(Self { pool })
    }

    pub async fn export_submissions(&self, target: &Path) -> Result<ExportOutcome, ExportError> {
        self.export_table(SUBMISSIONS_TABLE, target).await
    }

    /// Dump every row of `table` to `target`, header first.
    ///
    /// The header lists the table's columns in declaration order. NULL
    /// values become empty fields. The whole file is built in memory and
    /// written once, replacing any existing file.
    pub async fn export_table(&self, table: &str, target: &Path) -> Result<ExportOutcome, ExportError> {
        let query_err = |source: sqlx::Error| ExportError::Query {
            table: table.to_string(),
            source,
        };

        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
                .bind(table)
                .fetch_all(&self.pool)
                .await
                .map_err(query_err)?;

        if columns.is_empty() {
            return Err(ExportError::TableNotFound(table.to_string()));
        }

        let select_list = columns
            .iter()
            .map(|c| format!("CAST({} AS TEXT)", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            select_list,
            quote_ident(table)
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;

        if rows.is_empty() {
            tracing::info!(table, "No data found, nothing to export");
            return Ok(ExportOutcome::Empty);
        }

        let records = rows
            .iter()
            .map(|row| {
                (0..columns.len())
                    .map(|i| {
                        row.try_get::<Option<String>, _>(i)
                            .map(Option::unwrap_or_default)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        let bytes = encode_csv(&columns, &records)?;

        tokio::fs::write(target, bytes)
            .await
            .map_err(|source| ExportError::Write {
                path: target.to_path_buf(),
                source,
            })?;

        tracing::info!(table, rows = records.len(), path = %target.display(), "CSV file written");

        Ok(ExportOutcome::Written {
            rows: records.len(),
            path: target.to_path_buf(),
        })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Encode a header and rows as CSV, quoting fields that need it
pub fn encode_csv(header: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
