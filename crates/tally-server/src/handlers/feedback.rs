//! Client feedback handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{AppError, AppState, SuccessResponse};
use tally_core::models::{Feedback, NewFeedback, Ratings};

/// GET /api/feedbacks - List all feedback, newest first
pub async fn list_feedbacks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Feedback>>, AppError> {
    Ok(Json(state.db.list_feedback()?))
}

/// POST /api/feedbacks - Submit feedback (ratings are clamped to 0-5)
pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewFeedback>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let id = state.db.create_feedback(&req)?;
    let feedback = state
        .db
        .get_feedback(id)?
        .ok_or_else(|| AppError::internal("Feedback not found after creation"))?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// PUT /api/feedbacks/:id - Replace the ratings on a feedback entry
pub async fn update_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(ratings): Json<Ratings>,
) -> Result<Json<Feedback>, AppError> {
    state.db.update_feedback_ratings(id, ratings)?;

    let feedback = state
        .db
        .get_feedback(id)?
        .ok_or_else(|| AppError::not_found("Feedback not found"))?;
    Ok(Json(feedback))
}

/// DELETE /api/feedbacks/:id - Delete a feedback entry
pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_feedback(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
