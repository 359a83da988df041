//! Shipping Bill records

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Amount, ShippingBillId};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// A Shipping Bill - one customs record of an export consignment
///
/// The business number `shipping_bill_no` is not guaranteed unique across
/// re-imports; the system-generated `id` is the authoritative reference.
/// Balance invariant: the outstanding value is monotonically non-increasing
/// under allocations and never exceeds `export_bill_value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingBillRecord {
    pub id: ShippingBillId,
    /// Natural key - a non-unique business attribute
    pub shipping_bill_no: String,
    pub form_no: String,
    pub shipping_bill_date: NaiveDate,
    pub port_code: String,
    pub export_agency: String,
    /// Authorized-dealer code
    pub ad_code: String,
    pub bank_name: String,
    /// Importer-exporter code
    pub ie_code: String,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    /// 3-letter ISO currency code of the FOB value
    pub fob_currency: String,
    pub export_bill_value: Amount,
    pub bill_outstanding_value: Amount,
    pub sb_utilization: Amount,
    pub buyer_name: String,
    pub buyer_address: String,
    pub buyer_country_code: String,
    pub consignee_name: String,
    pub consignee_country_code: String,
    pub port_of_destination: String,
    pub final_destination: String,
    pub transit_days: Option<i32>,
    pub commodity: String,
    pub shipping_company: String,
    pub bl_number: String,
    pub vessel_name: String,
    pub bl_date: NaiveDate,
    pub commercial_invoice: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShippingBillRecord {
    /// Checks the balance invariant
    pub fn check_balances(&self) -> Result<(), RecordError> {
        let derived = self.export_bill_value.checked_sub(self.sb_utilization);
        let consistent = matches!(&derived, Ok(expected) if expected.approx_eq(self.bill_outstanding_value));
        if !consistent || self.bill_outstanding_value > self.export_bill_value {
            return Err(RecordError::InconsistentBalances {
                key: self.shipping_bill_no.clone(),
                total: self.export_bill_value,
                utilized: self.sb_utilization,
                outstanding: self.bill_outstanding_value,
            });
        }
        Ok(())
    }

    /// Applies one allocation against this bill
    ///
    /// Rejects (without mutating) any amount that would drive the outstanding
    /// value negative.
    pub fn apply_utilization(&mut self, amount: Amount) -> Result<(), RecordError> {
        let new_outstanding = self.bill_outstanding_value.checked_sub(amount).map_err(|_| {
            RecordError::InsufficientOutstanding {
                key: self.shipping_bill_no.clone(),
                requested: amount,
                outstanding: self.bill_outstanding_value,
            }
        })?;
        self.sb_utilization = self.sb_utilization.checked_add(amount)?;
        self.bill_outstanding_value = new_outstanding;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Draws the full outstanding value down to zero, as happens on the
    /// anchor side of an allocation. Returns the amount drawn.
    pub fn draw_down_fully(&mut self) -> Result<Amount, RecordError> {
        let drawn = self.bill_outstanding_value;
        self.sb_utilization = self.sb_utilization.checked_add(drawn)?;
        self.bill_outstanding_value = Amount::zero();
        self.updated_at = Utc::now();
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bill(total: &str, utilized: &str, outstanding: &str) -> ShippingBillRecord {
        let now = Utc::now();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        ShippingBillRecord {
            id: ShippingBillId::new_v7(),
            shipping_bill_no: "SB-1001".to_string(),
            form_no: "F-1".to_string(),
            shipping_bill_date: date,
            port_code: "INMAA1".to_string(),
            export_agency: "Customs".to_string(),
            ad_code: "AD01".to_string(),
            bank_name: "Test Bank".to_string(),
            ie_code: "IE123".to_string(),
            invoice_no: "INV-9".to_string(),
            invoice_date: date,
            fob_currency: "USD".to_string(),
            export_bill_value: Amount::parse(total).unwrap(),
            bill_outstanding_value: Amount::parse(outstanding).unwrap(),
            sb_utilization: Amount::parse(utilized).unwrap(),
            buyer_name: "Buyer Co".to_string(),
            buyer_address: "2 Market St".to_string(),
            buyer_country_code: "DE".to_string(),
            consignee_name: "Consignee GmbH".to_string(),
            consignee_country_code: "DE".to_string(),
            port_of_destination: "DEHAM".to_string(),
            final_destination: "Hamburg".to_string(),
            transit_days: Some(21),
            commodity: "Textiles".to_string(),
            shipping_company: "Oceanic".to_string(),
            bl_number: "BL-77".to_string(),
            vessel_name: "MV Meridian".to_string(),
            bl_date: date,
            commercial_invoice: "CI-5".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_check_balances_consistent() {
        assert!(bill("2000000", "200000", "1800000").check_balances().is_ok());
    }

    #[test]
    fn test_check_balances_outstanding_exceeds_value() {
        let mut b = bill("2000000", "0", "2000000");
        b.bill_outstanding_value = Amount::parse("2500000").unwrap();
        assert!(b.check_balances().is_err());
    }

    #[test]
    fn test_apply_utilization() {
        let mut b = bill("2000000", "0", "2000000");
        b.apply_utilization(Amount::parse("1800000").unwrap()).unwrap();

        assert_eq!(b.bill_outstanding_value.value(), dec!(200000));
        assert_eq!(b.sb_utilization.value(), dec!(1800000));
        assert!(b.check_balances().is_ok());
    }

    #[test]
    fn test_apply_utilization_rejects_overdraw() {
        let mut b = bill("2000000", "1500000", "500000");
        let result = b.apply_utilization(Amount::parse("500000.50").unwrap());

        assert!(matches!(result, Err(RecordError::InsufficientOutstanding { .. })));
        assert_eq!(b.bill_outstanding_value.value(), dec!(500000));
    }
}
