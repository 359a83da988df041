//! The allocation engine
//!
//! One call distributes an anchor record's full outstanding balance across
//! counterparty records of the opposite type. Validation runs against a
//! consistent read of every participant; the commit is version-checked, and
//! a competing commit triggers a bounded re-read-and-revalidate retry before
//! the conflict is surfaced to the caller.

use std::sync::Arc;

use core_kernel::MappingId;
use domain_records::{RecordError, RemittanceRecord, ShippingBillRecord};
use tracing::{info, instrument, warn};

use crate::allocation::{
    check_full_allocation, ensure_non_empty, parse_amounts, total_allocated, AnchorRef,
    CounterpartyAllocation, ParsedAllocation,
};
use crate::error::ReconciliationError;
use crate::mapping::{IrmSnapshot, MappingEntry, MappingParticipants, SbSnapshot};
use crate::ports::{AllocationCommit, RecordStorePort, Versioned, VersionedWrite};

/// Total attempts per allocation call (the first try plus two retries)
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Runs allocations against a record store
#[derive(Clone)]
pub struct ReconciliationEngine {
    store: Arc<dyn RecordStorePort>,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn RecordStorePort>) -> Self {
        Self { store }
    }

    /// Allocates the anchor's full outstanding balance across the given
    /// counterparties and records the mapping entry
    ///
    /// Validation order: non-empty list, anchor lookup, amount parsing and
    /// duplicate-key rejection, counterparty resolution (all missing keys
    /// reported together), total-equals-outstanding check, then per-record
    /// overdraw checks. Nothing is written until every check has passed.
    #[instrument(skip(self, allocations), fields(anchor = %anchor, counterparties = allocations.len()))]
    pub async fn allocate(
        &self,
        anchor: AnchorRef,
        allocations: Vec<CounterpartyAllocation>,
    ) -> Result<MappingId, ReconciliationError> {
        let mut attempt = 1;
        loop {
            let result = match &anchor {
                AnchorRef::Remittance(ref_no) => {
                    self.allocate_from_irm(ref_no, &allocations).await
                }
                AnchorRef::ShippingBill(sb_no) => {
                    self.allocate_from_sb(sb_no, &allocations).await
                }
            };
            match result {
                Err(ReconciliationError::Conflict) if attempt < MAX_COMMIT_ATTEMPTS => {
                    warn!(attempt, "allocation commit lost a version race, re-reading");
                    attempt += 1;
                }
                Ok(mapping_id) => {
                    info!(%mapping_id, attempt, "allocation committed");
                    return Ok(mapping_id);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// IRM anchor: its outstanding balance settles a set of shipping bills
    async fn allocate_from_irm(
        &self,
        remittance_ref_no: &str,
        allocations: &[CounterpartyAllocation],
    ) -> Result<MappingId, ReconciliationError> {
        ensure_non_empty(allocations)?;

        let anchor = self
            .store
            .find_irm_by_ref(remittance_ref_no)
            .await
            .map_err(|e| anchor_lookup_error(e, remittance_ref_no))?;

        let parsed = parse_amounts(allocations)?;
        let counterparties = self.resolve_shipping_bills(&parsed).await?;

        let total = total_allocated(&parsed)?;
        check_full_allocation(total, anchor.record.outstanding_amount)?;

        let mut sb_updates = Vec::with_capacity(counterparties.len());
        let mut sb_snapshots = Vec::with_capacity(counterparties.len());
        for (alloc, versioned) in parsed.iter().zip(counterparties) {
            sb_snapshots.push(SbSnapshot {
                record: versioned.record.clone(),
                utilization_amount: alloc.amount,
            });
            let mut updated = versioned.record;
            updated
                .apply_utilization(alloc.amount)
                .map_err(overdraw_error)?;
            sb_updates.push(VersionedWrite {
                record: updated,
                expected_version: versioned.version,
            });
        }

        // The anchor snapshot carries the allocated total so the entry's sum
        // invariant holds exactly; any sub-cent residual within the epsilon
        // is absorbed when the record itself is drawn down to zero.
        let anchor_snapshot = IrmSnapshot {
            record: anchor.record.clone(),
            utilization_amount: total,
        };
        let mut anchor_updated = anchor.record;
        anchor_updated.draw_down_fully()?;

        let entry = MappingEntry::new(MappingParticipants::RemittanceToShippingBills {
            anchor: anchor_snapshot,
            counterparties: sb_snapshots,
        })?;

        self.commit(AllocationCommit {
            irm_updates: vec![VersionedWrite {
                record: anchor_updated,
                expected_version: anchor.version,
            }],
            sb_updates,
            entry,
        })
        .await
    }

    /// SB anchor: its outstanding value is settled by a set of remittances
    async fn allocate_from_sb(
        &self,
        shipping_bill_no: &str,
        allocations: &[CounterpartyAllocation],
    ) -> Result<MappingId, ReconciliationError> {
        ensure_non_empty(allocations)?;

        let anchor = self
            .store
            .find_sb_by_no(shipping_bill_no)
            .await
            .map_err(|e| anchor_lookup_error(e, shipping_bill_no))?;

        let parsed = parse_amounts(allocations)?;
        let counterparties = self.resolve_remittances(&parsed).await?;

        let total = total_allocated(&parsed)?;
        check_full_allocation(total, anchor.record.bill_outstanding_value)?;

        let mut irm_updates = Vec::with_capacity(counterparties.len());
        let mut irm_snapshots = Vec::with_capacity(counterparties.len());
        for (alloc, versioned) in parsed.iter().zip(counterparties) {
            irm_snapshots.push(IrmSnapshot {
                record: versioned.record.clone(),
                utilization_amount: alloc.amount,
            });
            let mut updated = versioned.record;
            updated
                .apply_utilization(alloc.amount)
                .map_err(overdraw_error)?;
            irm_updates.push(VersionedWrite {
                record: updated,
                expected_version: versioned.version,
            });
        }

        let anchor_snapshot = SbSnapshot {
            record: anchor.record.clone(),
            utilization_amount: total,
        };
        let mut anchor_updated = anchor.record;
        anchor_updated.draw_down_fully()?;

        let entry = MappingEntry::new(MappingParticipants::ShippingBillToRemittances {
            anchor: anchor_snapshot,
            counterparties: irm_snapshots,
        })?;

        self.commit(AllocationCommit {
            irm_updates,
            sb_updates: vec![VersionedWrite {
                record: anchor_updated,
                expected_version: anchor.version,
            }],
            entry,
        })
        .await
    }

    async fn resolve_shipping_bills(
        &self,
        parsed: &[ParsedAllocation],
    ) -> Result<Vec<Versioned<ShippingBillRecord>>, ReconciliationError> {
        let mut found = Vec::with_capacity(parsed.len());
        let mut missing = Vec::new();
        for alloc in parsed {
            match self.store.find_sb_by_no(&alloc.natural_key).await {
                Ok(versioned) => found.push(versioned),
                Err(e) if e.is_not_found() => missing.push(alloc.natural_key.clone()),
                Err(e) => return Err(e.into()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(ReconciliationError::CounterpartiesNotFound { keys: missing })
        }
    }

    async fn resolve_remittances(
        &self,
        parsed: &[ParsedAllocation],
    ) -> Result<Vec<Versioned<RemittanceRecord>>, ReconciliationError> {
        let mut found = Vec::with_capacity(parsed.len());
        let mut missing = Vec::new();
        for alloc in parsed {
            match self.store.find_irm_by_ref(&alloc.natural_key).await {
                Ok(versioned) => found.push(versioned),
                Err(e) if e.is_not_found() => missing.push(alloc.natural_key.clone()),
                Err(e) => return Err(e.into()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(ReconciliationError::CounterpartiesNotFound { keys: missing })
        }
    }

    /// Version conflicts from the commit become the retryable variant; every
    /// other store failure passes through
    async fn commit(&self, commit: AllocationCommit) -> Result<MappingId, ReconciliationError> {
        match self.store.commit_allocation(commit).await {
            Ok(id) => Ok(id),
            Err(e) if e.is_conflict() => Err(ReconciliationError::Conflict),
            Err(e) => Err(e.into()),
        }
    }
}

fn anchor_lookup_error(e: core_kernel::PortError, key: &str) -> ReconciliationError {
    if e.is_not_found() {
        ReconciliationError::AnchorNotFound(key.to_string())
    } else {
        e.into()
    }
}

fn overdraw_error(e: RecordError) -> ReconciliationError {
    match e {
        RecordError::InsufficientOutstanding {
            key,
            requested,
            outstanding,
        } => ReconciliationError::CounterpartyOverdrawn {
            key,
            amount: requested,
            outstanding,
        },
        other => other.into(),
    }
}
