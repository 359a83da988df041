//! Mapping DTOs

use chrono::{DateTime, Utc};
use core_kernel::{Amount, MappingId};
use domain_reconciliation::{MappingEntry, MappingParticipants};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One proposed allocation line; the amount stays raw text until the engine
/// re-validates it
#[derive(Debug, Deserialize, Validate)]
pub struct AllocationLine {
    #[validate(length(min = 1))]
    pub natural_key: String,
    #[validate(length(min = 1))]
    pub amount: String,
}

/// Distribute one IRM's outstanding balance across shipping bills
#[derive(Debug, Deserialize, Validate)]
pub struct IrmToSbRequest {
    #[validate(length(min = 1))]
    pub remittance_ref_no: String,
    #[validate(nested)]
    pub allocations: Vec<AllocationLine>,
}

/// Settle one shipping bill's outstanding value from remittances
#[derive(Debug, Deserialize, Validate)]
pub struct SbToIrmRequest {
    #[validate(length(min = 1))]
    pub shipping_bill_no: String,
    #[validate(nested)]
    pub allocations: Vec<AllocationLine>,
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub mapping_id: MappingId,
}

/// One side of a committed mapping, summarized for listings
#[derive(Debug, Serialize)]
pub struct ParticipantSummary {
    pub natural_key: String,
    pub utilization_amount: Amount,
    /// Outstanding balance the record held when the allocation committed
    pub outstanding_before: Amount,
}

#[derive(Debug, Serialize)]
pub struct MappingEntryResponse {
    pub id: MappingId,
    pub direction: String,
    pub anchor: ParticipantSummary,
    pub counterparties: Vec<ParticipantSummary>,
    pub created_at: DateTime<Utc>,
}

impl From<MappingEntry> for MappingEntryResponse {
    fn from(entry: MappingEntry) -> Self {
        let (direction, anchor, counterparties) = match &entry.participants {
            MappingParticipants::RemittanceToShippingBills {
                anchor,
                counterparties,
            } => (
                "irm_to_sb".to_string(),
                ParticipantSummary {
                    natural_key: anchor.record.remittance_ref_no.clone(),
                    utilization_amount: anchor.utilization_amount,
                    outstanding_before: anchor.record.outstanding_amount,
                },
                counterparties
                    .iter()
                    .map(|s| ParticipantSummary {
                        natural_key: s.record.shipping_bill_no.clone(),
                        utilization_amount: s.utilization_amount,
                        outstanding_before: s.record.bill_outstanding_value,
                    })
                    .collect(),
            ),
            MappingParticipants::ShippingBillToRemittances {
                anchor,
                counterparties,
            } => (
                "sb_to_irm".to_string(),
                ParticipantSummary {
                    natural_key: anchor.record.shipping_bill_no.clone(),
                    utilization_amount: anchor.utilization_amount,
                    outstanding_before: anchor.record.bill_outstanding_value,
                },
                counterparties
                    .iter()
                    .map(|s| ParticipantSummary {
                        natural_key: s.record.remittance_ref_no.clone(),
                        utilization_amount: s.utilization_amount,
                        outstanding_before: s.record.outstanding_amount,
                    })
                    .collect(),
            ),
        };
        Self {
            id: entry.id,
            direction,
            anchor,
            counterparties,
            created_at: entry.created_at,
        }
    }
}
