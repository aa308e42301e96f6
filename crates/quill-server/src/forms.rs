//! Contact form handler

use axum::{Json, extract::State, http::StatusCode};
use quill_core::{FormSubmission, NewFormSubmission};

use crate::error::ApiError;
use crate::extract::Submission;
use crate::state::AppState;

/// POST /form - Store a form submission as-is
pub async fn create_submission(
    State(state): State<AppState>,
    submission: Submission,
) -> Result<(StatusCode, Json<FormSubmission>), ApiError> {
    let input: NewFormSubmission = submission.parse()?;
    let created = state.storage.create_submission(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
