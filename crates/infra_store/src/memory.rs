//! Versioned in-memory record store
//!
//! Backed by `tokio::sync::RwLock` over hash maps, with a monotonically
//! increasing version per record. All multi-record writes go through
//! [`MemoryRecordStore::commit_allocation`], which validates every expected
//! version under one write guard before touching anything, so a competing
//! commit can never leave a partial update behind.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, IrmId, MappingId, PortError,
    ShippingBillId,
};
use domain_records::{RemittanceRecord, ShippingBillRecord};
use domain_reconciliation::{AllocationCommit, MappingEntry, RecordStorePort, Versioned};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct Stored<T> {
    record: T,
    version: u64,
}

impl<T: Clone> Stored<T> {
    fn versioned(&self) -> Versioned<T> {
        Versioned {
            record: self.record.clone(),
            version: self.version,
        }
    }
}

#[derive(Default)]
struct StoreInner {
    irms: HashMap<IrmId, Stored<RemittanceRecord>>,
    /// Reference number to id; reference numbers are unique
    irm_ref_index: HashMap<String, IrmId>,
    sbs: HashMap<ShippingBillId, Stored<ShippingBillRecord>>,
    /// Business number to ids; the number is not unique across re-imports
    sb_no_index: HashMap<String, Vec<ShippingBillId>>,
    /// Append-only, insertion order is commit order
    entries: Vec<MappingEntry>,
}

impl StoreInner {
    fn insert_irm_unchecked(&mut self, record: RemittanceRecord) -> IrmId {
        let id = record.id;
        self.irm_ref_index.insert(record.remittance_ref_no.clone(), id);
        self.irms.insert(id, Stored { record, version: 1 });
        id
    }

    fn insert_sb_unchecked(&mut self, record: ShippingBillRecord) -> ShippingBillId {
        let id = record.id;
        self.sb_no_index
            .entry(record.shipping_bill_no.clone())
            .or_default()
            .push(id);
        self.sbs.insert(id, Stored { record, version: 1 });
        id
    }

    fn check_versions(&self, commit: &AllocationCommit) -> Result<(), PortError> {
        for write in &commit.irm_updates {
            let stored = self
                .irms
                .get(&write.record.id)
                .ok_or_else(|| PortError::not_found("RemittanceRecord", write.record.id))?;
            if stored.version != write.expected_version {
                return Err(PortError::conflict(format!(
                    "IRM {} was updated concurrently (version {} read, {} stored)",
                    stored.record.remittance_ref_no, write.expected_version, stored.version
                )));
            }
        }
        for write in &commit.sb_updates {
            let stored = self
                .sbs
                .get(&write.record.id)
                .ok_or_else(|| PortError::not_found("ShippingBillRecord", write.record.id))?;
            if stored.version != write.expected_version {
                return Err(PortError::conflict(format!(
                    "SB {} was updated concurrently (version {} read, {} stored)",
                    stored.record.shipping_bill_no, write.expected_version, stored.version
                )));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of [`RecordStorePort`]
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: RwLock<StoreInner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for MemoryRecordStore {}

#[async_trait]
impl HealthCheckable for MemoryRecordStore {
    async fn health_check(&self) -> HealthCheckResult {
        let inner = self.inner.read().await;
        HealthCheckResult {
            adapter_id: "memory-record-store".to_string(),
            status: AdapterHealth::Healthy,
            message: Some(format!(
                "{} IRMs, {} SBs, {} mapping entries",
                inner.irms.len(),
                inner.sbs.len(),
                inner.entries.len()
            )),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl RecordStorePort for MemoryRecordStore {
    async fn insert_irm(&self, record: RemittanceRecord) -> Result<IrmId, PortError> {
        let mut inner = self.inner.write().await;
        if inner.irm_ref_index.contains_key(&record.remittance_ref_no) {
            return Err(PortError::conflict(format!(
                "Remittance reference {} already exists",
                record.remittance_ref_no
            )));
        }
        Ok(inner.insert_irm_unchecked(record))
    }

    async fn insert_irms(&self, records: Vec<RemittanceRecord>) -> Result<Vec<IrmId>, PortError> {
        let mut inner = self.inner.write().await;
        let mut batch_refs = HashMap::new();
        for record in &records {
            if inner.irm_ref_index.contains_key(&record.remittance_ref_no)
                || batch_refs
                    .insert(record.remittance_ref_no.clone(), ())
                    .is_some()
            {
                return Err(PortError::conflict(format!(
                    "Remittance reference {} already exists",
                    record.remittance_ref_no
                )));
            }
        }
        debug!(count = records.len(), "inserting IRM batch");
        Ok(records
            .into_iter()
            .map(|r| inner.insert_irm_unchecked(r))
            .collect())
    }

    async fn insert_sb(&self, record: ShippingBillRecord) -> Result<ShippingBillId, PortError> {
        let mut inner = self.inner.write().await;
        Ok(inner.insert_sb_unchecked(record))
    }

    async fn insert_sbs(
        &self,
        records: Vec<ShippingBillRecord>,
    ) -> Result<Vec<ShippingBillId>, PortError> {
        let mut inner = self.inner.write().await;
        debug!(count = records.len(), "inserting SB batch");
        Ok(records
            .into_iter()
            .map(|r| inner.insert_sb_unchecked(r))
            .collect())
    }

    async fn get_irm(&self, id: IrmId) -> Result<Versioned<RemittanceRecord>, PortError> {
        self.inner
            .read()
            .await
            .irms
            .get(&id)
            .map(Stored::versioned)
            .ok_or_else(|| PortError::not_found("RemittanceRecord", id))
    }

    async fn get_sb(&self, id: ShippingBillId) -> Result<Versioned<ShippingBillRecord>, PortError> {
        self.inner
            .read()
            .await
            .sbs
            .get(&id)
            .map(Stored::versioned)
            .ok_or_else(|| PortError::not_found("ShippingBillRecord", id))
    }

    async fn find_irm_by_ref(
        &self,
        remittance_ref_no: &str,
    ) -> Result<Versioned<RemittanceRecord>, PortError> {
        let inner = self.inner.read().await;
        inner
            .irm_ref_index
            .get(remittance_ref_no)
            .and_then(|id| inner.irms.get(id))
            .map(Stored::versioned)
            .ok_or_else(|| PortError::not_found("RemittanceRecord", remittance_ref_no))
    }

    async fn find_sb_by_no(
        &self,
        shipping_bill_no: &str,
    ) -> Result<Versioned<ShippingBillRecord>, PortError> {
        let inner = self.inner.read().await;
        let ids = inner
            .sb_no_index
            .get(shipping_bill_no)
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| PortError::not_found("ShippingBillRecord", shipping_bill_no))?;
        if ids.len() > 1 {
            return Err(PortError::conflict(format!(
                "Shipping bill number {} matches {} records; use the record id",
                shipping_bill_no,
                ids.len()
            )));
        }
        inner
            .sbs
            .get(&ids[0])
            .map(Stored::versioned)
            .ok_or_else(|| PortError::internal("SB index points at a missing record"))
    }

    async fn list_irms(&self) -> Result<Vec<Versioned<RemittanceRecord>>, PortError> {
        let inner = self.inner.read().await;
        let mut all: Vec<_> = inner.irms.values().map(Stored::versioned).collect();
        all.sort_by(|a, b| {
            a.record
                .created_at
                .cmp(&b.record.created_at)
                .then_with(|| a.record.id.as_uuid().cmp(b.record.id.as_uuid()))
        });
        Ok(all)
    }

    async fn list_sbs(&self) -> Result<Vec<Versioned<ShippingBillRecord>>, PortError> {
        let inner = self.inner.read().await;
        let mut all: Vec<_> = inner.sbs.values().map(Stored::versioned).collect();
        all.sort_by(|a, b| {
            a.record
                .created_at
                .cmp(&b.record.created_at)
                .then_with(|| a.record.id.as_uuid().cmp(b.record.id.as_uuid()))
        });
        Ok(all)
    }

    async fn update_irm(
        &self,
        record: RemittanceRecord,
        expected_version: u64,
    ) -> Result<(), PortError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .irms
            .get_mut(&record.id)
            .ok_or_else(|| PortError::not_found("RemittanceRecord", record.id))?;
        if stored.version != expected_version {
            return Err(PortError::conflict(format!(
                "IRM {} was updated concurrently",
                record.remittance_ref_no
            )));
        }
        stored.record = record;
        stored.version += 1;
        Ok(())
    }

    async fn update_sb(
        &self,
        record: ShippingBillRecord,
        expected_version: u64,
    ) -> Result<(), PortError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .sbs
            .get_mut(&record.id)
            .ok_or_else(|| PortError::not_found("ShippingBillRecord", record.id))?;
        if stored.version != expected_version {
            return Err(PortError::conflict(format!(
                "SB {} was updated concurrently",
                record.shipping_bill_no
            )));
        }
        stored.record = record;
        stored.version += 1;
        Ok(())
    }

    async fn commit_allocation(&self, commit: AllocationCommit) -> Result<MappingId, PortError> {
        let mut inner = self.inner.write().await;

        // Validate every version before mutating anything
        inner.check_versions(&commit)?;

        for write in commit.irm_updates {
            if let Some(stored) = inner.irms.get_mut(&write.record.id) {
                stored.record = write.record;
                stored.version += 1;
            }
        }
        for write in commit.sb_updates {
            if let Some(stored) = inner.sbs.get_mut(&write.record.id) {
                stored.record = write.record;
                stored.version += 1;
            }
        }

        let mapping_id = commit.entry.id;
        inner.entries.push(commit.entry);
        debug!(%mapping_id, "allocation committed");
        Ok(mapping_id)
    }

    async fn list_mapping_entries(&self) -> Result<Vec<MappingEntry>, PortError> {
        Ok(self.inner.read().await.entries.clone())
    }
}
