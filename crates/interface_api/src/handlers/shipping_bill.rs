//! Shipping Bill handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use core_kernel::ShippingBillId;
use domain_records::{parse_sb_row, validate_sb_rows, RecordError};
use uuid::Uuid;
use validator::Validate;

use crate::dto::shipping_bill::*;
use crate::{error::ApiError, AppState};

fn single_row_error(err: RecordError) -> ApiError {
    match err {
        RecordError::ImportRow { message, .. } => ApiError::Validation(message),
        other => other.into(),
    }
}

/// Creates a single shipping bill
pub async fn create_sb(
    State(state): State<AppState>,
    Json(request): Json<SbImportRow>,
) -> Result<(StatusCode, Json<SbResponse>), ApiError> {
    let record = parse_sb_row(0, &request).map_err(single_row_error)?;
    let id = state.store.insert_sb(record).await?;
    let created = state.store.get_sb(id).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Lists all shipping bills
pub async fn list_sbs(State(state): State<AppState>) -> Result<Json<Vec<SbResponse>>, ApiError> {
    let records = state.store.list_sbs().await?;
    Ok(Json(records.into_iter().map(SbResponse::from).collect()))
}

/// Gets a shipping bill by id
pub async fn get_sb(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SbResponse>, ApiError> {
    let record = state.store.get_sb(ShippingBillId::from_uuid(id)).await?;
    Ok(Json(record.into()))
}

/// Applies operator corrections to descriptive fields
pub async fn update_sb(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSbRequest>,
) -> Result<Json<SbResponse>, ApiError> {
    request.validate()?;

    let id = ShippingBillId::from_uuid(id);
    let current = state.store.get_sb(id).await?;
    let mut record = current.record;

    if let Some(v) = request.bank_name {
        record.bank_name = v;
    }
    if let Some(v) = request.buyer_name {
        record.buyer_name = v;
    }
    if let Some(v) = request.buyer_address {
        record.buyer_address = v;
    }
    if let Some(v) = request.consignee_name {
        record.consignee_name = v;
    }
    if let Some(v) = request.port_of_destination {
        record.port_of_destination = v;
    }
    if let Some(v) = request.final_destination {
        record.final_destination = v;
    }
    if let Some(v) = request.transit_days {
        record.transit_days = Some(v);
    }
    if let Some(v) = request.commodity {
        record.commodity = v;
    }
    if let Some(v) = request.shipping_company {
        record.shipping_company = v;
    }
    if let Some(v) = request.vessel_name {
        record.vessel_name = v;
    }
    if let Some(v) = request.commercial_invoice {
        record.commercial_invoice = v;
    }
    record.updated_at = Utc::now();

    state.store.update_sb(record, request.version).await?;
    let updated = state.store.get_sb(id).await?;
    Ok(Json(updated.into()))
}

/// Bulk-imports shipping bill rows; the whole batch is rejected on the first
/// bad row
pub async fn bulk_import_sbs(
    State(state): State<AppState>,
    Json(rows): Json<Vec<SbImportRow>>,
) -> Result<(StatusCode, Json<crate::dto::irm::BulkImportResponse>), ApiError> {
    let records = validate_sb_rows(&rows).map_err(|e| ApiError::Validation(e.to_string()))?;
    let ids = state.store.insert_sbs(records).await?;
    Ok((
        StatusCode::CREATED,
        Json(crate::dto::irm::BulkImportResponse {
            inserted: ids.len(),
        }),
    ))
}
