//! Record domain errors

use core_kernel::{Amount, DateError, MoneyError};
use thiserror::Error;

/// Errors that can occur in the record domain
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Amount(#[from] MoneyError),

    #[error(transparent)]
    Date(#[from] DateError),

    /// A bulk-import row failed validation. Row numbers are reported the way
    /// operators see them in their spreadsheet: data starts at row 2.
    #[error("Row {row}: {message}")]
    ImportRow { row: usize, message: String },

    #[error(
        "Insufficient outstanding balance on {key}: requested {requested}, outstanding {outstanding}"
    )]
    InsufficientOutstanding {
        key: String,
        requested: Amount,
        outstanding: Amount,
    },

    #[error(
        "Inconsistent balances on {key}: total {total}, utilized {utilized}, outstanding {outstanding}"
    )]
    InconsistentBalances {
        key: String,
        total: Amount,
        utilized: Amount,
        outstanding: Amount,
    },
}

impl RecordError {
    pub fn import_row(row: usize, message: impl Into<String>) -> Self {
        RecordError::ImportRow {
            row,
            message: message.into(),
        }
    }
}
