//! Blog post handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use quill_core::{BlogPost, PostFields};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::{PostId, Submission};
use crate::state::AppState;

/// GET /posts - List all posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let posts = state.storage.list_posts().await?;
    Ok(Json(posts))
}

/// GET /posts/:id - Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    PostId(id): PostId,
) -> Result<Json<BlogPost>, ApiError> {
    let post = state.storage.get_post(id).await?;
    Ok(Json(post))
}

/// POST /posts - Create a post, optionally with an image
pub async fn create_post(
    State(state): State<AppState>,
    submission: Submission,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    let fields: PostFields = submission.parse()?;
    // Reject before anything touches the disk
    fields.validate_new()?;

    let upload = state.store_upload(submission.file.as_ref()).await?;
    let new_post = fields.into_new_post(upload.as_ref().map(|u| u.url.clone()))?;

    match state.storage.create_post(&new_post).await {
        Ok(post) => Ok((StatusCode::CREATED, Json(post))),
        Err(e) => {
            state.discard_upload(upload).await;
            Err(e.into())
        }
    }
}

/// PUT /posts/:id - Merge supplied fields into an existing post
pub async fn update_post(
    State(state): State<AppState>,
    PostId(id): PostId,
    submission: Submission,
) -> Result<Json<BlogPost>, ApiError> {
    let fields: PostFields = submission.parse()?;
    let mut patch = fields.into_patch(None)?;

    let upload = state.store_upload(submission.file.as_ref()).await?;
    patch.image = upload.as_ref().map(|u| u.url.clone());

    match state.storage.update_post(id, &patch).await {
        Ok(post) => Ok(Json(post)),
        Err(e) => {
            state.discard_upload(upload).await;
            Err(e.into())
        }
    }
}

/// DELETE /posts/:id - Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    PostId(id): PostId,
) -> Result<Json<Value>, ApiError> {
    state.storage.delete_post(id).await?;
    Ok(Json(json!({ "message": "Post deleted" })))
}
