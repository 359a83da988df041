//! Mapping-history queries
//!
//! History is answered entirely from the immutable mapping entries, so the
//! reported utilizations are the ones in force when each allocation was
//! committed, regardless of what has happened to the records since.

use std::sync::Arc;

use tracing::instrument;

use crate::error::ReconciliationError;
use crate::mapping::MappingEntry;
use crate::ports::RecordStorePort;

/// Read-side facade over the mapping audit trail
#[derive(Clone)]
pub struct MappingHistory {
    store: Arc<dyn RecordStorePort>,
}

impl MappingHistory {
    pub fn new(store: Arc<dyn RecordStorePort>) -> Self {
        Self { store }
    }

    /// Every allocation a shipping bill participated in, oldest first
    ///
    /// Matches on the business number, so re-imported bills sharing a number
    /// surface their combined history.
    #[instrument(skip(self))]
    pub async fn for_shipping_bill(
        &self,
        shipping_bill_no: &str,
    ) -> Result<Vec<MappingEntry>, ReconciliationError> {
        let entries = self.store.list_mapping_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.involves_shipping_bill(shipping_bill_no))
            .collect())
    }

    /// Every allocation a remittance participated in, oldest first
    #[instrument(skip(self))]
    pub async fn for_remittance(
        &self,
        remittance_ref_no: &str,
    ) -> Result<Vec<MappingEntry>, ReconciliationError> {
        let entries = self.store.list_mapping_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.involves_remittance(remittance_ref_no))
            .collect())
    }

    /// The full audit trail, oldest first
    pub async fn all(&self) -> Result<Vec<MappingEntry>, ReconciliationError> {
        Ok(self.store.list_mapping_entries().await?)
    }
}
