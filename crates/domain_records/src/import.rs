//! Bulk-import row validation and normalization
//!
//! Import rows arrive as free text with inconsistent field casing across
//! sources (`RemittanceRefNo` vs `remittanceRefNumber`, `OutstandingAmount`
//! vs `outstandingAmount`). Normalization happens here, once, via serde
//! aliases - downstream code only ever sees the canonical record types.
//!
//! Row numbers in errors are the operator's spreadsheet rows: the header is
//! row 1, so data row `i` is reported as row `i + 2`.

use chrono::Utc;
use core_kernel::{dates, Amount, IrmId, ShippingBillId};
use serde::Deserialize;

use crate::error::RecordError;
use crate::irm::RemittanceRecord;
use crate::shipping_bill::ShippingBillRecord;

/// One raw IRM import row, fields as entered
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrmImportRow {
    #[serde(alias = "RemittanceRefNo", alias = "remittanceRefNumber", default)]
    pub remittance_ref_no: String,
    #[serde(default)]
    pub ad_code: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub ie_code: String,
    #[serde(default)]
    pub remittance_date: String,
    #[serde(default)]
    pub purpose_code: String,
    #[serde(default)]
    pub remittance_currency: String,
    #[serde(default)]
    pub remittance_amount: String,
    #[serde(alias = "UtilizedAmount", default)]
    pub utilized_amount: String,
    #[serde(alias = "OutstandingAmount", default)]
    pub outstanding_amount: String,
    #[serde(default)]
    pub remitter_name: String,
    #[serde(default)]
    pub remitter_address: String,
    #[serde(default)]
    pub remitter_country_code: String,
    #[serde(default)]
    pub remitter_bank: String,
    #[serde(default)]
    pub other_bank_ref: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub remittance_type: String,
}

/// One raw Shipping Bill import row, fields as entered
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbImportRow {
    #[serde(default)]
    pub shipping_bill_no: String,
    #[serde(default)]
    pub form_no: String,
    #[serde(default)]
    pub shipping_bill_date: String,
    #[serde(default)]
    pub port_code: String,
    #[serde(default)]
    pub export_agency: String,
    #[serde(default)]
    pub ad_code: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub ie_code: String,
    #[serde(default)]
    pub invoice_no: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub fob_currency: String,
    #[serde(default)]
    pub export_bill_value: String,
    #[serde(alias = "outstandingValue", default)]
    pub bill_outstanding_value: String,
    #[serde(alias = "sbUtilizationAmount", default)]
    pub sb_utilization: String,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_address: String,
    #[serde(default)]
    pub buyer_country_code: String,
    #[serde(default)]
    pub consignee_name: String,
    #[serde(default)]
    pub consignee_country_code: String,
    #[serde(default)]
    pub port_of_destination: String,
    #[serde(default)]
    pub final_destination: String,
    #[serde(default)]
    pub transit_days: String,
    #[serde(default)]
    pub commodity: String,
    #[serde(default)]
    pub shipping_company: String,
    #[serde(default)]
    pub bl_number: String,
    #[serde(default)]
    pub vessel_name: String,
    #[serde(default)]
    pub bl_date: String,
    #[serde(default)]
    pub commercial_invoice: String,
}

fn spreadsheet_row(index: usize) -> usize {
    index + 2
}

fn check_required(
    row: usize,
    fields: &[(&str, &str)],
) -> Result<(), RecordError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecordError::import_row(
            row,
            format!("Missing fields - {}", missing.join(", ")),
        ))
    }
}

fn parse_amount(row: usize, field: &str, raw: &str) -> Result<Amount, RecordError> {
    Amount::parse(raw)
        .map_err(|_| RecordError::import_row(row, format!("Invalid amount in {field}: '{raw}'")))
}

fn parse_date(row: usize, field: &str, raw: &str) -> Result<chrono::NaiveDate, RecordError> {
    dates::parse_external(raw)
        .map_err(|_| RecordError::import_row(row, format!("Invalid date in {field}: '{raw}' (use dd-mm-yyyy)")))
}

/// Parses and validates one IRM row into a canonical record
pub fn parse_irm_row(index: usize, row: &IrmImportRow) -> Result<RemittanceRecord, RecordError> {
    let n = spreadsheet_row(index);

    check_required(
        n,
        &[
            ("remittanceRefNo", &row.remittance_ref_no),
            ("adCode", &row.ad_code),
            ("bankName", &row.bank_name),
            ("ieCode", &row.ie_code),
            ("remittanceDate", &row.remittance_date),
            ("purposeCode", &row.purpose_code),
            ("remittanceCurrency", &row.remittance_currency),
            ("remittanceAmount", &row.remittance_amount),
            ("utilizedAmount", &row.utilized_amount),
            ("outstandingAmount", &row.outstanding_amount),
            ("remitterName", &row.remitter_name),
            ("remitterAddress", &row.remitter_address),
            ("remitterCountryCode", &row.remitter_country_code),
            ("remitterBank", &row.remitter_bank),
            ("otherBankRef", &row.other_bank_ref),
            ("status", &row.status),
            ("remittanceType", &row.remittance_type),
        ],
    )?;

    let currency = row.remittance_currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RecordError::import_row(
            n,
            format!("Invalid currency code: '{}'", row.remittance_currency),
        ));
    }

    let now = Utc::now();
    let record = RemittanceRecord {
        id: IrmId::new_v7(),
        remittance_ref_no: row.remittance_ref_no.trim().to_string(),
        ad_code: row.ad_code.trim().to_string(),
        bank_name: row.bank_name.trim().to_string(),
        ie_code: row.ie_code.trim().to_string(),
        remittance_date: parse_date(n, "remittanceDate", &row.remittance_date)?,
        purpose_code: row.purpose_code.trim().to_string(),
        remittance_currency: currency,
        remittance_amount: parse_amount(n, "remittanceAmount", &row.remittance_amount)?,
        utilized_amount: parse_amount(n, "utilizedAmount", &row.utilized_amount)?,
        outstanding_amount: parse_amount(n, "outstandingAmount", &row.outstanding_amount)?,
        remitter_name: row.remitter_name.trim().to_string(),
        remitter_address: row.remitter_address.trim().to_string(),
        remitter_country_code: row.remitter_country_code.trim().to_string(),
        remitter_bank: row.remitter_bank.trim().to_string(),
        other_bank_ref: row.other_bank_ref.trim().to_string(),
        status: row.status.trim().to_string(),
        remittance_type: row.remittance_type.trim().to_string(),
        created_at: now,
        updated_at: now,
    };

    record
        .check_balances()
        .map_err(|e| RecordError::import_row(n, e.to_string()))?;
    Ok(record)
}

/// Parses and validates one Shipping Bill row into a canonical record
pub fn parse_sb_row(index: usize, row: &SbImportRow) -> Result<ShippingBillRecord, RecordError> {
    let n = spreadsheet_row(index);

    check_required(
        n,
        &[
            ("shippingBillNo", &row.shipping_bill_no),
            ("formNo", &row.form_no),
            ("shippingBillDate", &row.shipping_bill_date),
            ("portCode", &row.port_code),
            ("exportAgency", &row.export_agency),
            ("adCode", &row.ad_code),
            ("bankName", &row.bank_name),
            ("ieCode", &row.ie_code),
            ("invoiceNo", &row.invoice_no),
            ("invoiceDate", &row.invoice_date),
            ("fobCurrency", &row.fob_currency),
            ("exportBillValue", &row.export_bill_value),
            ("billOutstandingValue", &row.bill_outstanding_value),
            ("sbUtilization", &row.sb_utilization),
            ("buyerName", &row.buyer_name),
            ("buyerAddress", &row.buyer_address),
            ("buyerCountryCode", &row.buyer_country_code),
            ("consigneeName", &row.consignee_name),
            ("consigneeCountryCode", &row.consignee_country_code),
            ("portOfDestination", &row.port_of_destination),
            ("finalDestination", &row.final_destination),
            ("commodity", &row.commodity),
            ("shippingCompany", &row.shipping_company),
            ("blNumber", &row.bl_number),
            ("vesselName", &row.vessel_name),
            ("blDate", &row.bl_date),
            ("commercialInvoice", &row.commercial_invoice),
        ],
    )?;

    let currency = row.fob_currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RecordError::import_row(
            n,
            format!("Invalid currency code: '{}'", row.fob_currency),
        ));
    }

    // transitDays is the one optional numeric field in the observed feeds
    let transit_days = match row.transit_days.trim() {
        "" => None,
        raw => Some(raw.parse::<i32>().map_err(|_| {
            RecordError::import_row(n, format!("Invalid transitDays: '{raw}'"))
        })?),
    };

    let now = Utc::now();
    let record = ShippingBillRecord {
        id: ShippingBillId::new_v7(),
        shipping_bill_no: row.shipping_bill_no.trim().to_string(),
        form_no: row.form_no.trim().to_string(),
        shipping_bill_date: parse_date(n, "shippingBillDate", &row.shipping_bill_date)?,
        port_code: row.port_code.trim().to_string(),
        export_agency: row.export_agency.trim().to_string(),
        ad_code: row.ad_code.trim().to_string(),
        bank_name: row.bank_name.trim().to_string(),
        ie_code: row.ie_code.trim().to_string(),
        invoice_no: row.invoice_no.trim().to_string(),
        invoice_date: parse_date(n, "invoiceDate", &row.invoice_date)?,
        fob_currency: currency,
        export_bill_value: parse_amount(n, "exportBillValue", &row.export_bill_value)?,
        bill_outstanding_value: parse_amount(n, "billOutstandingValue", &row.bill_outstanding_value)?,
        sb_utilization: parse_amount(n, "sbUtilization", &row.sb_utilization)?,
        buyer_name: row.buyer_name.trim().to_string(),
        buyer_address: row.buyer_address.trim().to_string(),
        buyer_country_code: row.buyer_country_code.trim().to_string(),
        consignee_name: row.consignee_name.trim().to_string(),
        consignee_country_code: row.consignee_country_code.trim().to_string(),
        port_of_destination: row.port_of_destination.trim().to_string(),
        final_destination: row.final_destination.trim().to_string(),
        transit_days,
        commodity: row.commodity.trim().to_string(),
        shipping_company: row.shipping_company.trim().to_string(),
        bl_number: row.bl_number.trim().to_string(),
        vessel_name: row.vessel_name.trim().to_string(),
        bl_date: parse_date(n, "blDate", &row.bl_date)?,
        commercial_invoice: row.commercial_invoice.trim().to_string(),
        created_at: now,
        updated_at: now,
    };

    record
        .check_balances()
        .map_err(|e| RecordError::import_row(n, e.to_string()))?;
    Ok(record)
}

/// Validates a whole IRM batch; the first bad row rejects the batch
pub fn validate_irm_rows(rows: &[IrmImportRow]) -> Result<Vec<RemittanceRecord>, RecordError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_irm_row(i, row))
        .collect()
}

/// Validates a whole Shipping Bill batch; the first bad row rejects the batch
pub fn validate_sb_rows(rows: &[SbImportRow]) -> Result<Vec<ShippingBillRecord>, RecordError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_sb_row(i, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn irm_row() -> IrmImportRow {
        IrmImportRow {
            remittance_ref_no: "REF-2024-001".to_string(),
            ad_code: "AD01".to_string(),
            bank_name: "Test Bank".to_string(),
            ie_code: "IE123".to_string(),
            remittance_date: "15-06-2024".to_string(),
            purpose_code: "P0102".to_string(),
            remittance_currency: "usd".to_string(),
            remittance_amount: "4,000,000".to_string(),
            utilized_amount: "1,000,000".to_string(),
            outstanding_amount: "3,000,000".to_string(),
            remitter_name: "Acme Importers".to_string(),
            remitter_address: "1 Harbour Rd".to_string(),
            remitter_country_code: "US".to_string(),
            remitter_bank: "Remitter Bank".to_string(),
            other_bank_ref: "OB-1".to_string(),
            status: "Active".to_string(),
            remittance_type: "Advance".to_string(),
        }
    }

    #[test]
    fn test_parse_irm_row_normalizes() {
        let record = parse_irm_row(0, &irm_row()).unwrap();
        assert_eq!(record.remittance_amount.value(), dec!(4000000));
        assert_eq!(record.remittance_currency, "USD");
        assert_eq!(
            record.remittance_date,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn test_missing_fields_reported_with_spreadsheet_row() {
        let mut row = irm_row();
        row.bank_name = String::new();
        row.status = "  ".to_string();

        let err = parse_irm_row(3, &row).unwrap_err().to_string();
        assert!(err.contains("Row 5"), "got: {err}");
        assert!(err.contains("bankName"));
        assert!(err.contains("status"));
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut row = irm_row();
        row.remittance_date = "2024-06-15".to_string();
        let err = parse_irm_row(0, &row).unwrap_err().to_string();
        assert!(err.contains("dd-mm-yyyy"));
    }

    #[test]
    fn test_inconsistent_balances_rejected() {
        let mut row = irm_row();
        row.outstanding_amount = "2,000,000".to_string();
        assert!(parse_irm_row(0, &row).is_err());
    }

    #[test]
    fn test_dual_cased_input_normalized_once() {
        // Legacy feeds spell the same fields in Pascal case
        let json = serde_json::json!({
            "RemittanceRefNo": "REF-X",
            "adCode": "AD01",
            "bankName": "Test Bank",
            "ieCode": "IE123",
            "remittanceDate": "01-01-2025",
            "purposeCode": "P01",
            "remittanceCurrency": "EUR",
            "remittanceAmount": "100.00",
            "UtilizedAmount": "25.00",
            "OutstandingAmount": "75.00",
            "remitterName": "R",
            "remitterAddress": "A",
            "remitterCountryCode": "DE",
            "remitterBank": "RB",
            "otherBankRef": "OB",
            "status": "Active",
            "remittanceType": "Advance"
        });
        let row: IrmImportRow = serde_json::from_value(json).unwrap();
        let record = parse_irm_row(0, &row).unwrap();
        assert_eq!(record.remittance_ref_no, "REF-X");
        assert_eq!(record.utilized_amount.value(), dec!(25.00));
        assert_eq!(record.outstanding_amount.value(), dec!(75.00));
    }

    #[test]
    fn test_batch_stops_on_first_bad_row() {
        let good = irm_row();
        let mut bad = irm_row();
        bad.remittance_amount = "not-a-number".to_string();

        let err = validate_irm_rows(&[good, bad]).unwrap_err().to_string();
        assert!(err.contains("Row 3"), "got: {err}");
    }
}
