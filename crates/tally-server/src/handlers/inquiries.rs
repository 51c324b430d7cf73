//! Inquiry handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use tally_core::models::{Inquiry, InquiryStatus, NewInquiry};

#[derive(Debug, Deserialize)]
pub struct ListInquiriesQuery {
    pub status: Option<String>,
}

/// Request body for changing an inquiry's status
#[derive(Debug, Deserialize)]
pub struct UpdateInquiryRequest {
    pub status: String,
}

fn parse_status(s: &str) -> Result<InquiryStatus, AppError> {
    s.parse().map_err(|e: String| AppError::bad_request(&e))
}

/// GET /api/inquiries - List inquiries, newest first
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListInquiriesQuery>,
) -> Result<Json<Vec<Inquiry>>, AppError> {
    let status = params.status.as_deref().map(parse_status).transpose()?;
    Ok(Json(state.db.list_inquiries(status)?))
}

/// POST /api/inquiries - Submit a new inquiry
pub async fn create_inquiry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewInquiry>,
) -> Result<(StatusCode, Json<Inquiry>), AppError> {
    let id = state.db.create_inquiry(&req)?;
    let inquiry = state
        .db
        .get_inquiry(id)?
        .ok_or_else(|| AppError::internal("Inquiry not found after creation"))?;

    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// GET /api/inquiries/:id - Get a single inquiry
pub async fn get_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Inquiry>, AppError> {
    let inquiry = state
        .db
        .get_inquiry(id)?
        .ok_or_else(|| AppError::not_found("Inquiry not found"))?;
    Ok(Json(inquiry))
}

/// PUT /api/inquiries/:id - Update an inquiry's status
pub async fn update_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateInquiryRequest>,
) -> Result<Json<Inquiry>, AppError> {
    let status = parse_status(&req.status)?;
    state.db.update_inquiry_status(id, status)?;

    let inquiry = state
        .db
        .get_inquiry(id)?
        .ok_or_else(|| AppError::not_found("Inquiry not found"))?;
    Ok(Json(inquiry))
}

/// DELETE /api/inquiries/:id - Delete an inquiry
pub async fn delete_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_inquiry(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
