//! IRM DTOs
//!
//! Create and bulk-import bodies deserialize straight into the import-row
//! type so dual-cased legacy field names are accepted and normalized exactly
//! once, at the domain boundary.

use chrono::{DateTime, Utc};
use core_kernel::{dates, Amount, IrmId};
use domain_records::RemittanceRecord;
use domain_reconciliation::Versioned;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use domain_records::IrmImportRow;

/// Operator corrections to descriptive fields; balances are only ever moved
/// by allocations
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateIrmRequest {
    /// The version the client read; the update fails on a stale version
    pub version: u64,
    #[validate(length(min = 1))]
    pub bank_name: Option<String>,
    #[validate(length(min = 1))]
    pub purpose_code: Option<String>,
    #[validate(length(min = 1))]
    pub remitter_name: Option<String>,
    #[validate(length(min = 1))]
    pub remitter_address: Option<String>,
    #[validate(length(min = 1))]
    pub remitter_bank: Option<String>,
    #[validate(length(min = 1))]
    pub other_bank_ref: Option<String>,
    #[validate(length(min = 1))]
    pub status: Option<String>,
    #[validate(length(min = 1))]
    pub remittance_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IrmResponse {
    pub id: IrmId,
    pub remittance_ref_no: String,
    pub ad_code: String,
    pub bank_name: String,
    pub ie_code: String,
    /// External dd-mm-yyyy form
    pub remittance_date: String,
    pub purpose_code: String,
    pub remittance_currency: String,
    pub remittance_amount: Amount,
    pub utilized_amount: Amount,
    pub outstanding_amount: Amount,
    pub remitter_name: String,
    pub remitter_address: String,
    pub remitter_country_code: String,
    pub remitter_bank: String,
    pub other_bank_ref: String,
    pub status: String,
    pub remittance_type: String,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Versioned<RemittanceRecord>> for IrmResponse {
    fn from(v: Versioned<RemittanceRecord>) -> Self {
        let r = v.record;
        Self {
            id: r.id,
            remittance_ref_no: r.remittance_ref_no,
            ad_code: r.ad_code,
            bank_name: r.bank_name,
            ie_code: r.ie_code,
            remittance_date: dates::format_external(r.remittance_date),
            purpose_code: r.purpose_code,
            remittance_currency: r.remittance_currency,
            remittance_amount: r.remittance_amount,
            utilized_amount: r.utilized_amount,
            outstanding_amount: r.outstanding_amount,
            remitter_name: r.remitter_name,
            remitter_address: r.remitter_address,
            remitter_country_code: r.remitter_country_code,
            remitter_bank: r.remitter_bank,
            other_bank_ref: r.other_bank_ref,
            status: r.status,
            remittance_type: r.remittance_type,
            version: v.version,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Result of a bulk import; the batch is all-or-nothing
#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
    pub inserted: usize,
}
