//! Pre-built test data for common scenarios

use core_kernel::Amount;
use domain_records::{RemittanceRecord, ShippingBillRecord};
use domain_reconciliation::{
    IrmSnapshot, MappingEntry, MappingParticipants, SbSnapshot,
};
use serde_json::{json, Value};

/// Builds a mapping entry with an IRM anchor and the given SB allocations
///
/// The anchor utilization is set to the sum of the allocations so the entry
/// passes its own sum invariant.
pub fn mapping_entry_irm_to_sbs(
    irm: &RemittanceRecord,
    allocations: &[(&ShippingBillRecord, &str)],
) -> MappingEntry {
    let counterparties: Vec<SbSnapshot> = allocations
        .iter()
        .map(|(sb, amount)| SbSnapshot {
            record: (*sb).clone(),
            utilization_amount: Amount::parse(amount).expect("fixture amount"),
        })
        .collect();
    let total = counterparties
        .iter()
        .try_fold(Amount::zero(), |acc, s| acc.checked_add(s.utilization_amount))
        .expect("fixture total");
    MappingEntry::new(MappingParticipants::RemittanceToShippingBills {
        anchor: IrmSnapshot {
            record: irm.clone(),
            utilization_amount: total,
        },
        counterparties,
    })
    .expect("fixture entry")
}

/// Builds a mapping entry with an SB anchor and the given IRM allocations
pub fn mapping_entry_sb_to_irms(
    sb: &ShippingBillRecord,
    allocations: &[(&RemittanceRecord, &str)],
) -> MappingEntry {
    let counterparties: Vec<IrmSnapshot> = allocations
        .iter()
        .map(|(irm, amount)| IrmSnapshot {
            record: (*irm).clone(),
            utilization_amount: Amount::parse(amount).expect("fixture amount"),
        })
        .collect();
    let total = counterparties
        .iter()
        .try_fold(Amount::zero(), |acc, s| acc.checked_add(s.utilization_amount))
        .expect("fixture total");
    MappingEntry::new(MappingParticipants::ShippingBillToRemittances {
        anchor: SbSnapshot {
            record: sb.clone(),
            utilization_amount: total,
        },
        counterparties,
    })
    .expect("fixture entry")
}

/// A valid IRM import row using the legacy spellings for the dual-cased
/// fields, the way older spreadsheet exports arrive
pub fn irm_import_row_legacy(ref_no: &str, amount: &str) -> Value {
    json!({
        "RemittanceRefNo": ref_no,
        "adCode": "AD01",
        "bankName": "Test Bank",
        "ieCode": "IE0012345",
        "remittanceDate": "15-06-2024",
        "purposeCode": "P0102",
        "remittanceCurrency": "USD",
        "remittanceAmount": amount,
        "UtilizedAmount": "0",
        "OutstandingAmount": amount,
        "remitterName": "Acme Importers",
        "remitterAddress": "1 Harbour Rd",
        "remitterCountryCode": "US",
        "remitterBank": "Remitter Bank",
        "otherBankRef": "OB-1",
        "status": "Active",
        "remittanceType": "Advance"
    })
}

/// A valid SB import row in camelCase, as the newer export tool emits it
pub fn sb_import_row_camel(bill_no: &str, value: &str) -> Value {
    json!({
        "shippingBillNo": bill_no,
        "formNo": "F-1",
        "shippingBillDate": "01-05-2024",
        "portCode": "INMAA1",
        "exportAgency": "Customs",
        "adCode": "AD01",
        "bankName": "Test Bank",
        "ieCode": "IE0012345",
        "invoiceNo": "INV-9",
        "invoiceDate": "01-05-2024",
        "fobCurrency": "USD",
        "exportBillValue": value,
        "billOutstandingValue": value,
        "sbUtilization": "0",
        "buyerName": "Buyer Co",
        "buyerAddress": "2 Market St",
        "buyerCountryCode": "DE",
        "consigneeName": "Consignee GmbH",
        "consigneeCountryCode": "DE",
        "portOfDestination": "DEHAM",
        "finalDestination": "Hamburg",
        "transitDays": "21",
        "commodity": "Textiles",
        "shippingCompany": "Oceanic",
        "blNumber": "BL-77",
        "vesselName": "MV Meridian",
        "blDate": "03-05-2024",
        "commercialInvoice": "CI-5"
    })
}
