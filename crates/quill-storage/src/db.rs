//! Database operations

use std::path::Path;
use std::time::Duration;

use quill_core::{BlogPost, BlogPostPatch, FormSubmission, NewBlogPost, NewFormSubmission};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use time::OffsetDateTime;

use crate::models::{POST_COLUMNS, SUBMISSION_COLUMNS, post_from_row, submission_from_row};
use crate::{Result, StorageError};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Main storage interface. Cheap to clone, all clones share one pool.
#[derive(Clone, Debug)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database file and bring the schema up to date
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.migrate().await?;

        tracing::debug!(path = %db_path.display(), "Storage ready");
        Ok(storage)
    }

    /// Apply pending migrations. Safe to call repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ------------------------------------------------------------------
    // Blog posts
    // ------------------------------------------------------------------

    /// All posts in insertion order
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| post_from_row(row).map_err(StorageError::from))
            .collect()
    }

    pub async fn get_post(&self, id: i64) -> Result<BlogPost> {
        let row = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound {
            resource: "Post",
            id,
        })?;

        Ok(post_from_row(&row)?)
    }

    pub async fn create_post(&self, post: &NewBlogPost) -> Result<BlogPost> {
        let now = now();
        let row = sqlx::query(&format!(
            "INSERT INTO blog_posts (title, image, content, category, keyword, \
             meta_description, image_description, external_links, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&post.title)
        .bind(&post.image)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.keyword)
        .bind(&post.meta_description)
        .bind(&post.image_description)
        .bind(&post.external_links)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let created = post_from_row(&row)?;
        tracing::info!(post_id = created.id, "Created post");
        Ok(created)
    }

    /// Merge `patch` into the stored post in a single statement.
    ///
    /// Columns whose patch value is `None` keep their stored value. `created_at`
    /// is never touched; `updated_at` is bumped even for an empty patch.
    pub async fn update_post(&self, id: i64, patch: &BlogPostPatch) -> Result<BlogPost> {
        let row = sqlx::query(&format!(
            "UPDATE blog_posts SET \
                title = COALESCE(?1, title), \
                image = COALESCE(?2, image), \
                content = COALESCE(?3, content), \
                category = COALESCE(?4, category), \
                keyword = COALESCE(?5, keyword), \
                meta_description = COALESCE(?6, meta_description), \
                image_description = COALESCE(?7, image_description), \
                external_links = COALESCE(?8, external_links), \
                updated_at = ?9 \
             WHERE id = ?10 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&patch.title)
        .bind(&patch.image)
        .bind(&patch.content)
        .bind(&patch.category)
        .bind(&patch.keyword)
        .bind(&patch.meta_description)
        .bind(&patch.image_description)
        .bind(&patch.external_links)
        .bind(now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound {
            resource: "Post",
            id,
        })?;

        tracing::info!(post_id = id, "Updated post");
        Ok(post_from_row(&row)?)
    }

    pub async fn delete_post(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                resource: "Post",
                id,
            });
        }

        tracing::info!(post_id = id, "Deleted post");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Form submissions
    // ------------------------------------------------------------------

    pub async fn create_submission(&self, input: &NewFormSubmission) -> Result<FormSubmission> {
        let now = now();
        let row = sqlx::query(&format!(
            "INSERT INTO form_submissions (full_name, phone, position, email, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.position)
        .bind(&input.email)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let created = submission_from_row(&row)?;
        tracing::info!(submission_id = created.id, "Stored form submission");
        Ok(created)
    }

    pub async fn list_submissions(&self) -> Result<Vec<FormSubmission>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM form_submissions ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| submission_from_row(row).map_err(StorageError::from))
            .collect()
    }
}

/// Current time truncated to milliseconds so stored values round-trip exactly
fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}
