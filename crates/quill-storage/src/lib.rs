//! Storage layer for quill
//!
//! This crate provides:
//! - SQLite database operations for posts and form submissions
//! - Upload storage on the local filesystem
//! - CSV export of the form submission table
//! - Migrations

pub mod db;
pub mod error;
pub mod export;
mod models;
pub mod upload;

pub use db::Storage;
pub use error::{Result, StorageError};
pub use export::{CsvExporter, ExportError, ExportOutcome};
pub use upload::{StoredUpload, UploadStore};
