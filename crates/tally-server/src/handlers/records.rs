//! Service record handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use tally_core::models::{NewServiceRecord, RecordStatus, ServiceRecord};

#[derive(Debug, Deserialize)]
pub struct ListRecordsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRecordsQuery {
    #[serde(default)]
    pub query: String,
}

/// GET /api/records - List service records, optionally by status
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRecordsQuery>,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(|s| s.parse::<RecordStatus>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    Ok(Json(state.db.list_records(status)?))
}

/// GET /api/records/search?query= - Substring search over record fields
pub async fn search_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchRecordsQuery>,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    Ok(Json(state.db.search_records(&params.query)?))
}

/// POST /api/records - Create a service record
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewServiceRecord>,
) -> Result<(StatusCode, Json<ServiceRecord>), AppError> {
    let id = state.db.create_record(&req)?;
    let record = state
        .db
        .get_record(id)?
        .ok_or_else(|| AppError::internal("Record not found after creation"))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/records/:id - Replace a service record
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<NewServiceRecord>,
) -> Result<Json<ServiceRecord>, AppError> {
    state.db.update_record(id, &req)?;

    let record = state
        .db
        .get_record(id)?
        .ok_or_else(|| AppError::not_found("Record not found"))?;
    Ok(Json(record))
}

/// DELETE /api/records/:id - Delete a service record
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_record(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
