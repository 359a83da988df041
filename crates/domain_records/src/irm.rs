//! Inward Remittance Message records

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Amount, IrmId};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// An Inward Remittance Message - one incoming foreign-currency payment
///
/// Balance invariant: `outstanding_amount = remittance_amount - utilized_amount`
/// after every mutation this crate performs. The record store does not enforce
/// this; the reconciliation engine and the import boundary do. `utilized_amount`
/// only ever increases - funds are never un-allocated by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceRecord {
    pub id: IrmId,
    /// Natural key - unique among stored records, enforced at insert
    pub remittance_ref_no: String,
    /// Authorized-dealer code
    pub ad_code: String,
    pub bank_name: String,
    /// Importer-exporter code
    pub ie_code: String,
    pub remittance_date: NaiveDate,
    pub purpose_code: String,
    /// 3-letter ISO currency code
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RemittanceRecord {
    /// Checks the balance invariant
    ///
    /// Uses the standard epsilon so imported legacy data with sub-cent
    /// rounding noise is accepted; anything further off is a data error.
    pub fn check_balances(&self) -> Result<(), RecordError> {
        let derived = self.remittance_amount.checked_sub(self.utilized_amount);
        match derived {
            Ok(expected) if expected.approx_eq(self.outstanding_amount) => Ok(()),
            _ => Err(RecordError::InconsistentBalances {
                key: self.remittance_ref_no.clone(),
                total: self.remittance_amount,
                utilized: self.utilized_amount,
                outstanding: self.outstanding_amount,
            }),
        }
    }

    /// Applies one allocation against this remittance
    ///
    /// Rejects (without mutating) any amount that would drive the outstanding
    /// balance negative.
    pub fn apply_utilization(&mut self, amount: Amount) -> Result<(), RecordError> {
        let new_outstanding = self.outstanding_amount.checked_sub(amount).map_err(|_| {
            RecordError::InsufficientOutstanding {
                key: self.remittance_ref_no.clone(),
                requested: amount,
                outstanding: self.outstanding_amount,
            }
        })?;
        self.utilized_amount = self.utilized_amount.checked_add(amount)?;
        self.outstanding_amount = new_outstanding;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Draws the full outstanding balance down to zero, as happens on the
    /// anchor side of an allocation. Returns the amount drawn.
    pub fn draw_down_fully(&mut self) -> Result<Amount, RecordError> {
        let drawn = self.outstanding_amount;
        self.utilized_amount = self.utilized_amount.checked_add(drawn)?;
        self.outstanding_amount = Amount::zero();
        self.updated_at = Utc::now();
        Ok(drawn)
    }
}
