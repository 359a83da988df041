//! Shipping Bill DTOs

use chrono::{DateTime, Utc};
use core_kernel::{dates, Amount, ShippingBillId};
use domain_records::ShippingBillRecord;
use domain_reconciliation::Versioned;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use domain_records::SbImportRow;

/// Operator corrections to descriptive fields
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSbRequest {
    /// The version the client read; the update fails on a stale version
    pub version: u64,
    #[validate(length(min = 1))]
    pub bank_name: Option<String>,
    #[validate(length(min = 1))]
    pub buyer_name: Option<String>,
    #[validate(length(min = 1))]
    pub buyer_address: Option<String>,
    #[validate(length(min = 1))]
    pub consignee_name: Option<String>,
    #[validate(length(min = 1))]
    pub port_of_destination: Option<String>,
    #[validate(length(min = 1))]
    pub final_destination: Option<String>,
    pub transit_days: Option<i32>,
    #[validate(length(min = 1))]
    pub commodity: Option<String>,
    #[validate(length(min = 1))]
    pub shipping_company: Option<String>,
    #[validate(length(min = 1))]
    pub vessel_name: Option<String>,
    #[validate(length(min = 1))]
    pub commercial_invoice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SbResponse {
    pub id: ShippingBillId,
    pub shipping_bill_no: String,
    pub form_no: String,
    /// External dd-mm-yyyy form
    pub shipping_bill_date: String,
    pub port_code: String,
    pub export_agency: String,
    pub ad_code: String,
    pub bank_name: String,
    pub ie_code: String,
    pub invoice_no: String,
    pub invoice_date: String,
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
    pub bl_date: String,
    pub commercial_invoice: String,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Versioned<ShippingBillRecord>> for SbResponse {
    fn from(v: Versioned<ShippingBillRecord>) -> Self {
        let r = v.record;
        Self {
            id: r.id,
            shipping_bill_no: r.shipping_bill_no,
            form_no: r.form_no,
            shipping_bill_date: dates::format_external(r.shipping_bill_date),
            port_code: r.port_code,
            export_agency: r.export_agency,
            ad_code: r.ad_code,
            bank_name: r.bank_name,
            ie_code: r.ie_code,
            invoice_no: r.invoice_no,
            invoice_date: dates::format_external(r.invoice_date),
            fob_currency: r.fob_currency,
            export_bill_value: r.export_bill_value,
            bill_outstanding_value: r.bill_outstanding_value,
            sb_utilization: r.sb_utilization,
            buyer_name: r.buyer_name,
            buyer_address: r.buyer_address,
            buyer_country_code: r.buyer_country_code,
            consignee_name: r.consignee_name,
            consignee_country_code: r.consignee_country_code,
            port_of_destination: r.port_of_destination,
            final_destination: r.final_destination,
            transit_days: r.transit_days,
            commodity: r.commodity,
            shipping_company: r.shipping_company,
            bl_number: r.bl_number,
            vessel_name: r.vessel_name,
            bl_date: dates::format_external(r.bl_date),
            commercial_invoice: r.commercial_invoice,
            version: v.version,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
