//! Record domain - inward remittance messages and shipping bills
//!
//! This crate owns the two record types the reconciliation core balances
//! against each other, their balance invariants, and the bulk-import boundary
//! where free-text rows are normalized into canonical records exactly once.

pub mod error;
pub mod import;
pub mod irm;
pub mod shipping_bill;

pub use error::RecordError;
pub use import::{parse_irm_row, parse_sb_row, validate_irm_rows, validate_sb_rows, IrmImportRow, SbImportRow};
pub use irm::RemittanceRecord;
pub use shipping_bill::ShippingBillRecord;
