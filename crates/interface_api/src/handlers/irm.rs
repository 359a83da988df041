//! IRM handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use core_kernel::IrmId;
use domain_records::{parse_irm_row, validate_irm_rows, RecordError};
use uuid::Uuid;
use validator::Validate;

use crate::dto::irm::*;
use crate::{error::ApiError, AppState};

/// Strips the spreadsheet-row prefix for single-record requests
fn single_row_error(err: RecordError) -> ApiError {
    match err {
        RecordError::ImportRow { message, .. } => ApiError::Validation(message),
        other => other.into(),
    }
}

/// Creates a single IRM
pub async fn create_irm(
    State(state): State<AppState>,
    Json(request): Json<IrmImportRow>,
) -> Result<(StatusCode, Json<IrmResponse>), ApiError> {
    let record = parse_irm_row(0, &request).map_err(single_row_error)?;
    let id = state.store.insert_irm(record).await?;
    let created = state.store.get_irm(id).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Lists all IRMs
pub async fn list_irms(
    State(state): State<AppState>,
) -> Result<Json<Vec<IrmResponse>>, ApiError> {
    let records = state.store.list_irms().await?;
    Ok(Json(records.into_iter().map(IrmResponse::from).collect()))
}

/// Gets an IRM by id
pub async fn get_irm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IrmResponse>, ApiError> {
    let record = state.store.get_irm(IrmId::from_uuid(id)).await?;
    Ok(Json(record.into()))
}

/// Applies operator corrections to descriptive fields
pub async fn update_irm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIrmRequest>,
) -> Result<Json<IrmResponse>, ApiError> {
    request.validate()?;

    let id = IrmId::from_uuid(id);
    let current = state.store.get_irm(id).await?;
    let mut record = current.record;

    if let Some(v) = request.bank_name {
        record.bank_name = v;
    }
    if let Some(v) = request.purpose_code {
        record.purpose_code = v;
    }
    if let Some(v) = request.remitter_name {
        record.remitter_name = v;
    }
    if let Some(v) = request.remitter_address {
        record.remitter_address = v;
    }
    if let Some(v) = request.remitter_bank {
        record.remitter_bank = v;
    }
    if let Some(v) = request.other_bank_ref {
        record.other_bank_ref = v;
    }
    if let Some(v) = request.status {
        record.status = v;
    }
    if let Some(v) = request.remittance_type {
        record.remittance_type = v;
    }
    record.updated_at = Utc::now();

    state.store.update_irm(record, request.version).await?;
    let updated = state.store.get_irm(id).await?;
    Ok(Json(updated.into()))
}

/// Bulk-imports IRM rows; the whole batch is rejected on the first bad row
pub async fn bulk_import_irms(
    State(state): State<AppState>,
    Json(rows): Json<Vec<IrmImportRow>>,
) -> Result<(StatusCode, Json<BulkImportResponse>), ApiError> {
    let records = validate_irm_rows(&rows).map_err(|e| ApiError::Validation(e.to_string()))?;
    let ids = state.store.insert_irms(records).await?;
    Ok((
        StatusCode::CREATED,
        Json(BulkImportResponse {
            inserted: ids.len(),
        }),
    ))
}
