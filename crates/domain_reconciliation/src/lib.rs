//! Reconciliation domain - matching remittance value against export value
//!
//! The engine here performs one allocation at a time: an anchor record (an
//! IRM or a Shipping Bill) has its full outstanding balance distributed
//! across counterparty records of the opposite type. Every successful
//! allocation is recorded as an immutable [`mapping::MappingEntry`] snapshot,
//! and the balances of all participating records are updated atomically
//! through the [`ports::RecordStorePort`] contract.

pub mod allocation;
pub mod engine;
pub mod error;
pub mod history;
pub mod mapping;
pub mod ports;

pub use allocation::{AnchorRef, CounterpartyAllocation};
pub use engine::ReconciliationEngine;
pub use error::ReconciliationError;
pub use history::MappingHistory;
pub use mapping::{IrmSnapshot, MappingEntry, MappingParticipants, SbSnapshot};
pub use ports::{AllocationCommit, RecordStorePort, Versioned, VersionedWrite};
