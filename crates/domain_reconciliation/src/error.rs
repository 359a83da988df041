//! Reconciliation domain errors
//!
//! The taxonomy follows how the caller must react: validation errors are
//! operator-correctable and carry the numbers that disagreed verbatim,
//! not-found errors name the offending key(s), conflicts are retried by the
//! engine before surfacing, and store errors are infrastructure failures.

use core_kernel::{Amount, MoneyError, PortError};
use domain_records::RecordError;
use thiserror::Error;

/// Errors that can occur during an allocation or a history query
#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("At least one counterparty allocation is required")]
    EmptyAllocations,

    #[error("Anchor record not found: {0}")]
    AnchorNotFound(String),

    #[error("Counterparty record(s) not found: {}", keys.join(", "))]
    CounterpartiesNotFound { keys: Vec<String> },

    #[error(transparent)]
    InvalidAmount(#[from] MoneyError),

    #[error("Duplicate counterparty in allocation: {0}")]
    DuplicateCounterparty(String),

    /// The allocated total must consume the anchor's outstanding balance
    /// exactly (within the standard 0.01 epsilon)
    #[error("Total utilization ({allocated}) must equal the outstanding value ({outstanding})")]
    AmountMismatch {
        allocated: Amount,
        outstanding: Amount,
    },

    /// An allocation that would drive a counterparty's outstanding balance
    /// negative is rejected, never clamped
    #[error("Allocation of {amount} against {key} exceeds its outstanding value ({outstanding})")]
    CounterpartyOverdrawn {
        key: String,
        amount: Amount,
        outstanding: Amount,
    },

    /// A competing allocation committed against an overlapping record; the
    /// engine already retried with fresh reads before surfacing this
    #[error("A concurrent allocation updated one of the records; please retry")]
    Conflict,

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Record store error: {0}")]
    Store(#[from] PortError),
}

impl ReconciliationError {
    /// Returns true for errors the operator can fix by correcting input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReconciliationError::EmptyAllocations
                | ReconciliationError::InvalidAmount(_)
                | ReconciliationError::DuplicateCounterparty(_)
                | ReconciliationError::AmountMismatch { .. }
                | ReconciliationError::CounterpartyOverdrawn { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReconciliationError::AnchorNotFound(_)
                | ReconciliationError::CounterpartiesNotFound { .. }
        )
    }
}
