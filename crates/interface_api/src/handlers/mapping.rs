//! Mapping handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain_reconciliation::{AnchorRef, CounterpartyAllocation};
use validator::Validate;

use crate::dto::mapping::*;
use crate::{error::ApiError, AppState};

fn to_allocations(lines: Vec<AllocationLine>) -> Vec<CounterpartyAllocation> {
    lines
        .into_iter()
        .map(|l| CounterpartyAllocation {
            natural_key: l.natural_key,
            amount: l.amount,
        })
        .collect()
}

/// Allocates an IRM's full outstanding balance across shipping bills
pub async fn allocate_irm_to_sbs(
    State(state): State<AppState>,
    Json(request): Json<IrmToSbRequest>,
) -> Result<(StatusCode, Json<AllocationResponse>), ApiError> {
    request.validate()?;
    let mapping_id = state
        .engine
        .allocate(
            AnchorRef::Remittance(request.remittance_ref_no),
            to_allocations(request.allocations),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AllocationResponse { mapping_id })))
}

/// Settles a shipping bill's outstanding value from remittances
pub async fn allocate_sb_to_irms(
    State(state): State<AppState>,
    Json(request): Json<SbToIrmRequest>,
) -> Result<(StatusCode, Json<AllocationResponse>), ApiError> {
    request.validate()?;
    let mapping_id = state
        .engine
        .allocate(
            AnchorRef::ShippingBill(request.shipping_bill_no),
            to_allocations(request.allocations),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AllocationResponse { mapping_id })))
}

/// Full audit trail, oldest first
pub async fn list_mappings(
    State(state): State<AppState>,
) -> Result<Json<Vec<MappingEntryResponse>>, ApiError> {
    let entries = state.history.all().await?;
    Ok(Json(
        entries.into_iter().map(MappingEntryResponse::from).collect(),
    ))
}

/// Allocations a shipping bill participated in
pub async fn history_for_shipping_bill(
    State(state): State<AppState>,
    Path(sb_no): Path<String>,
) -> Result<Json<Vec<MappingEntryResponse>>, ApiError> {
    let entries = state.history.for_shipping_bill(&sb_no).await?;
    Ok(Json(
        entries.into_iter().map(MappingEntryResponse::from).collect(),
    ))
}

/// Allocations a remittance participated in
pub async fn history_for_remittance(
    State(state): State<AppState>,
    Path(ref_no): Path<String>,
) -> Result<Json<Vec<MappingEntryResponse>>, ApiError> {
    let entries = state.history.for_remittance(&ref_no).await?;
    Ok(Json(
        entries.into_iter().map(MappingEntryResponse::from).collect(),
    ))
}
