//! Builder patterns for test record construction
//!
//! Builders start from a fully valid record and let a test override only the
//! fields it cares about. Amounts are given as strings and parsed through the
//! same path production input takes.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Amount, IrmId, ShippingBillId};
use domain_records::{RemittanceRecord, ShippingBillRecord};

/// Builder for [`RemittanceRecord`] test instances
#[derive(Debug, Clone)]
pub struct IrmBuilder {
    ref_no: String,
    ad_code: String,
    bank_name: String,
    ie_code: String,
    remittance_date: NaiveDate,
    purpose_code: String,
    currency: String,
    total: String,
    utilized: String,
    outstanding: String,
    remitter_name: String,
    status: String,
    remittance_type: String,
    created_at: Option<DateTime<Utc>>,
}

impl Default for IrmBuilder {
    fn default() -> Self {
        Self {
            ref_no: "REF-001".to_string(),
            ad_code: "AD01".to_string(),
            bank_name: "Test Bank".to_string(),
            ie_code: "IE0012345".to_string(),
            remittance_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            purpose_code: "P0102".to_string(),
            currency: "USD".to_string(),
            total: "3000000".to_string(),
            utilized: "0".to_string(),
            outstanding: "3000000".to_string(),
            remitter_name: "Acme Importers".to_string(),
            status: "Active".to_string(),
            remittance_type: "Advance".to_string(),
            created_at: None,
        }
    }
}

impl IrmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ref_no(mut self, ref_no: &str) -> Self {
        self.ref_no = ref_no.to_string();
        self
    }

    pub fn ie_code(mut self, ie_code: &str) -> Self {
        self.ie_code = ie_code.to_string();
        self
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    /// Sets total, utilized, and outstanding amounts in one call
    pub fn amounts(mut self, total: &str, utilized: &str, outstanding: &str) -> Self {
        self.total = total.to_string();
        self.utilized = utilized.to_string();
        self.outstanding = outstanding.to_string();
        self
    }

    pub fn remittance_date(mut self, date: NaiveDate) -> Self {
        self.remittance_date = date;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn build(self) -> RemittanceRecord {
        let now = self.created_at.unwrap_or_else(Utc::now);
        RemittanceRecord {
            id: IrmId::new_v7(),
            remittance_ref_no: self.ref_no,
            ad_code: self.ad_code,
            bank_name: self.bank_name,
            ie_code: self.ie_code,
            remittance_date: self.remittance_date,
            purpose_code: self.purpose_code,
            remittance_currency: self.currency,
            remittance_amount: Amount::parse(&self.total).expect("builder total"),
            utilized_amount: Amount::parse(&self.utilized).expect("builder utilized"),
            outstanding_amount: Amount::parse(&self.outstanding).expect("builder outstanding"),
            remitter_name: self.remitter_name,
            remitter_address: "1 Harbour Rd".to_string(),
            remitter_country_code: "US".to_string(),
            remitter_bank: "Remitter Bank".to_string(),
            other_bank_ref: "OB-1".to_string(),
            status: self.status,
            remittance_type: self.remittance_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Builder for [`ShippingBillRecord`] test instances
#[derive(Debug, Clone)]
pub struct SbBuilder {
    bill_no: String,
    form_no: String,
    bill_date: NaiveDate,
    port_code: String,
    ad_code: String,
    ie_code: String,
    currency: String,
    total: String,
    utilized: String,
    outstanding: String,
    buyer_name: String,
    created_at: Option<DateTime<Utc>>,
}

impl Default for SbBuilder {
    fn default() -> Self {
        Self {
            bill_no: "SB-1001".to_string(),
            form_no: "F-1".to_string(),
            bill_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            port_code: "INMAA1".to_string(),
            ad_code: "AD01".to_string(),
            ie_code: "IE0012345".to_string(),
            currency: "USD".to_string(),
            total: "2000000".to_string(),
            utilized: "0".to_string(),
            outstanding: "2000000".to_string(),
            buyer_name: "Buyer Co".to_string(),
            created_at: None,
        }
    }
}

impl SbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bill_no(mut self, bill_no: &str) -> Self {
        self.bill_no = bill_no.to_string();
        self
    }

    pub fn ie_code(mut self, ie_code: &str) -> Self {
        self.ie_code = ie_code.to_string();
        self
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    /// Sets export value, utilization, and outstanding value in one call
    pub fn amounts(mut self, total: &str, utilized: &str, outstanding: &str) -> Self {
        self.total = total.to_string();
        self.utilized = utilized.to_string();
        self.outstanding = outstanding.to_string();
        self
    }

    pub fn bill_date(mut self, date: NaiveDate) -> Self {
        self.bill_date = date;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn build(self) -> ShippingBillRecord {
        let now = self.created_at.unwrap_or_else(Utc::now);
        ShippingBillRecord {
            id: ShippingBillId::new_v7(),
            shipping_bill_no: self.bill_no,
            form_no: self.form_no,
            shipping_bill_date: self.bill_date,
            port_code: self.port_code,
            export_agency: "Customs".to_string(),
            ad_code: self.ad_code,
            bank_name: "Test Bank".to_string(),
            ie_code: self.ie_code,
            invoice_no: "INV-9".to_string(),
            invoice_date: self.bill_date,
            fob_currency: self.currency,
            export_bill_value: Amount::parse(&self.total).expect("builder total"),
            bill_outstanding_value: Amount::parse(&self.outstanding).expect("builder outstanding"),
            sb_utilization: Amount::parse(&self.utilized).expect("builder utilized"),
            buyer_name: self.buyer_name,
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
            bl_date: self.bill_date,
            commercial_invoice: "CI-5".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builders_produce_consistent_balances() {
        assert!(IrmBuilder::new().build().check_balances().is_ok());
        assert!(SbBuilder::new().build().check_balances().is_ok());
    }
}
