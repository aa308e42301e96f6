//! Row mapping between SQLite and the domain records

use quill_core::{BlogPost, FormSubmission};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub(crate) const POST_COLUMNS: &str = "id, title, image, content, category, keyword, \
     meta_description, image_description, external_links, created_at, updated_at";

pub(crate) const SUBMISSION_COLUMNS: &str =
    "id, full_name, phone, position, email, created_at, updated_at";

pub(crate) fn post_from_row(row: &SqliteRow) -> sqlx::Result<BlogPost> {
    Ok(BlogPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        image: row.try_get("image")?,
        content: row.try_get("content")?,
        category: row.try_get("category")?,
        keyword: row.try_get("keyword")?,
        meta_description: row.try_get("meta_description")?,
        image_description: row.try_get("image_description")?,
        external_links: row.try_get("external_links")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn submission_from_row(row: &SqliteRow) -> sqlx::Result<FormSubmission> {
    Ok(FormSubmission {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        position: row.try_get("position")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
