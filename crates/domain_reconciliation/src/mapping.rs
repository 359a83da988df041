//! Immutable mapping entries, the audit trail of every allocation
//!
//! A mapping entry snapshots every participating record in full, as it stood
//! BEFORE its balances were updated, plus the per-record utilization amount
//! applied. Entries are denormalized on purpose: later edits or re-imports of
//! the records never rewrite history, and a reviewer can reconstruct the
//! exact state an operator saw when the allocation was made.

use chrono::{DateTime, Utc};
use core_kernel::{Amount, MappingId};
use domain_records::{RemittanceRecord, ShippingBillRecord};
use serde::{Deserialize, Serialize};

use crate::error::ReconciliationError;

/// A full pre-update copy of a remittance record with the amount this
/// allocation drew from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrmSnapshot {
    pub record: RemittanceRecord,
    pub utilization_amount: Amount,
}

/// A full pre-update copy of a shipping bill with the amount this allocation
/// drew from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SbSnapshot {
    pub record: ShippingBillRecord,
    pub utilization_amount: Amount,
}

/// The two directions an allocation can run in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum MappingParticipants {
    /// One IRM's outstanding balance distributed across shipping bills
    RemittanceToShippingBills {
        anchor: IrmSnapshot,
        counterparties: Vec<SbSnapshot>,
    },
    /// One shipping bill's outstanding value settled by remittances
    ShippingBillToRemittances {
        anchor: SbSnapshot,
        counterparties: Vec<IrmSnapshot>,
    },
}

/// One committed allocation, never modified after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    pub id: MappingId,
    pub participants: MappingParticipants,
    pub created_at: DateTime<Utc>,
}

impl MappingEntry {
    /// Builds an entry, enforcing that the counterparty list is non-empty and
    /// that the per-counterparty utilizations sum exactly to the anchor's
    pub fn new(participants: MappingParticipants) -> Result<Self, ReconciliationError> {
        let entry = Self {
            id: MappingId::new_v7(),
            participants,
            created_at: Utc::now(),
        };
        if entry.counterparty_count() == 0 {
            return Err(ReconciliationError::EmptyAllocations);
        }
        let total = entry.counterparty_total()?;
        let anchor = entry.anchor_utilization();
        if total != anchor {
            return Err(ReconciliationError::AmountMismatch {
                allocated: total,
                outstanding: anchor,
            });
        }
        Ok(entry)
    }

    /// The amount drawn from the anchor record
    pub fn anchor_utilization(&self) -> Amount {
        match &self.participants {
            MappingParticipants::RemittanceToShippingBills { anchor, .. } => {
                anchor.utilization_amount
            }
            MappingParticipants::ShippingBillToRemittances { anchor, .. } => {
                anchor.utilization_amount
            }
        }
    }

    pub fn counterparty_count(&self) -> usize {
        match &self.participants {
            MappingParticipants::RemittanceToShippingBills { counterparties, .. } => {
                counterparties.len()
            }
            MappingParticipants::ShippingBillToRemittances { counterparties, .. } => {
                counterparties.len()
            }
        }
    }

    fn counterparty_total(&self) -> Result<Amount, ReconciliationError> {
        match &self.participants {
            MappingParticipants::RemittanceToShippingBills { counterparties, .. } => counterparties
                .iter()
                .try_fold(Amount::zero(), |acc, s| acc.checked_add(s.utilization_amount))
                .map_err(ReconciliationError::from),
            MappingParticipants::ShippingBillToRemittances { counterparties, .. } => counterparties
                .iter()
                .try_fold(Amount::zero(), |acc, s| acc.checked_add(s.utilization_amount))
                .map_err(ReconciliationError::from),
        }
    }

    /// True if the given shipping bill number appears anywhere in this entry
    pub fn involves_shipping_bill(&self, shipping_bill_no: &str) -> bool {
        match &self.participants {
            MappingParticipants::RemittanceToShippingBills { counterparties, .. } => counterparties
                .iter()
                .any(|s| s.record.shipping_bill_no == shipping_bill_no),
            MappingParticipants::ShippingBillToRemittances { anchor, .. } => {
                anchor.record.shipping_bill_no == shipping_bill_no
            }
        }
    }

    /// True if the given remittance reference appears anywhere in this entry
    pub fn involves_remittance(&self, remittance_ref_no: &str) -> bool {
        match &self.participants {
            MappingParticipants::RemittanceToShippingBills { anchor, .. } => {
                anchor.record.remittance_ref_no == remittance_ref_no
            }
            MappingParticipants::ShippingBillToRemittances { counterparties, .. } => counterparties
                .iter()
                .any(|s| s.record.remittance_ref_no == remittance_ref_no),
        }
    }
}
