//! The record-store port consumed by the reconciliation engine
//!
//! Reads hand back a [`Versioned`] wrapper; writes carry the version the
//! caller read. An adapter must reject a write whose expected version no
//! longer matches with [`core_kernel::PortError::Conflict`], and
//! `commit_allocation` must apply all of its writes or none of them.

use async_trait::async_trait;
use core_kernel::{DomainPort, HealthCheckable, IrmId, MappingId, PortError, ShippingBillId};
use domain_records::{RemittanceRecord, ShippingBillRecord};

use crate::mapping::MappingEntry;

/// A record read together with the store version it was read at
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub record: T,
    pub version: u64,
}

/// A record write conditional on the version the caller last read
#[derive(Debug, Clone)]
pub struct VersionedWrite<T> {
    pub record: T,
    pub expected_version: u64,
}

/// Everything one allocation changes, committed atomically
#[derive(Debug, Clone)]
pub struct AllocationCommit {
    pub irm_updates: Vec<VersionedWrite<RemittanceRecord>>,
    pub sb_updates: Vec<VersionedWrite<ShippingBillRecord>>,
    pub entry: MappingEntry,
}

/// Storage contract for records and mapping entries
#[async_trait]
pub trait RecordStorePort: DomainPort + HealthCheckable {
    /// Inserts a remittance record, rejecting a duplicate reference number
    /// with a conflict
    async fn insert_irm(&self, record: RemittanceRecord) -> Result<IrmId, PortError>;

    /// Inserts a batch of remittance records; all-or-nothing
    async fn insert_irms(&self, records: Vec<RemittanceRecord>) -> Result<Vec<IrmId>, PortError>;

    /// Inserts a shipping bill; duplicate business numbers are allowed
    async fn insert_sb(&self, record: ShippingBillRecord) -> Result<ShippingBillId, PortError>;

    /// Inserts a batch of shipping bills; all-or-nothing
    async fn insert_sbs(
        &self,
        records: Vec<ShippingBillRecord>,
    ) -> Result<Vec<ShippingBillId>, PortError>;

    async fn get_irm(&self, id: IrmId) -> Result<Versioned<RemittanceRecord>, PortError>;

    async fn get_sb(&self, id: ShippingBillId) -> Result<Versioned<ShippingBillRecord>, PortError>;

    /// Looks up a remittance by its unique reference number
    async fn find_irm_by_ref(
        &self,
        remittance_ref_no: &str,
    ) -> Result<Versioned<RemittanceRecord>, PortError>;

    /// Looks up a shipping bill by business number
    ///
    /// The number is not unique; when more than one record carries it the
    /// adapter must return a conflict rather than pick one.
    async fn find_sb_by_no(
        &self,
        shipping_bill_no: &str,
    ) -> Result<Versioned<ShippingBillRecord>, PortError>;

    async fn list_irms(&self) -> Result<Vec<Versioned<RemittanceRecord>>, PortError>;

    async fn list_sbs(&self) -> Result<Vec<Versioned<ShippingBillRecord>>, PortError>;

    /// Replaces a remittance record if its version still matches
    async fn update_irm(
        &self,
        record: RemittanceRecord,
        expected_version: u64,
    ) -> Result<(), PortError>;

    /// Replaces a shipping bill if its version still matches
    async fn update_sb(
        &self,
        record: ShippingBillRecord,
        expected_version: u64,
    ) -> Result<(), PortError>;

    /// Applies every balance update and appends the mapping entry as one
    /// atomic unit; any stale version fails the whole commit
    async fn commit_allocation(&self, commit: AllocationCommit) -> Result<MappingId, PortError>;

    /// All committed mapping entries, oldest first
    async fn list_mapping_entries(&self) -> Result<Vec<MappingEntry>, PortError>;
}
