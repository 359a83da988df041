//! Test data generators
//!
//! Proptest strategies for amounts and dates, plus fake-backed generators
//! for whole records when a test needs realistic but arbitrary data.

use chrono::NaiveDate;
use core_kernel::Amount;
use domain_records::{RemittanceRecord, ShippingBillRecord};
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use proptest::prelude::*;

use crate::builders::{IrmBuilder, SbBuilder};

/// Strategy for canonical amount strings up to 12 integer digits
pub fn amount_string_strategy() -> impl Strategy<Value = String> {
    (0u64..1_000_000_000_000u64, 0u32..100u32).prop_map(|(i, f)| format!("{i}.{f:02}"))
}

/// Strategy for valid amounts
pub fn amount_strategy() -> impl Strategy<Value = Amount> {
    amount_string_strategy().prop_map(|s| Amount::parse(&s).expect("generated amount"))
}

/// Strategy for a (total, utilized, outstanding) triple that satisfies the
/// balance invariant
pub fn balanced_amounts_strategy() -> impl Strategy<Value = (String, String, String)> {
    (0u64..1_000_000_000u64, 0u64..1_000_000_000u64).prop_map(|(a, b)| {
        let (total, utilized) = (a.max(b), a.min(b));
        let outstanding = total - utilized;
        (total.to_string(), utilized.to_string(), outstanding.to_string())
    })
}

/// Strategy for external-format dates within 2024
pub fn external_date_strategy() -> impl Strategy<Value = String> {
    (1u32..=28u32, 1u32..=12u32).prop_map(|(d, m)| format!("{d:02}-{m:02}-2024"))
}

/// Strategy for valid dates within 2024
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=28u32, 1u32..=12u32)
        .prop_map(|(d, m)| NaiveDate::from_ymd_opt(2024, m, d).expect("generated date"))
}

/// A remittance record with fake parties and the given reference number
pub fn fake_irm(ref_no: &str) -> RemittanceRecord {
    let mut record = IrmBuilder::new().ref_no(ref_no).build();
    record.remitter_name = CompanyName().fake();
    record.bank_name = CompanyName().fake();
    record
}

/// A shipping bill with fake parties and the given business number
pub fn fake_sb(bill_no: &str) -> ShippingBillRecord {
    let mut record = SbBuilder::new().bill_no(bill_no).build();
    record.buyer_name = CompanyName().fake();
    record.consignee_name = CompanyName().fake();
    record.final_destination = CityName().fake();
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn balanced_triples_pass_record_validation(
            (total, utilized, outstanding) in balanced_amounts_strategy()
        ) {
            let record = IrmBuilder::new()
                .amounts(&total, &utilized, &outstanding)
                .build();
            prop_assert!(record.check_balances().is_ok());
        }

        #[test]
        fn generated_dates_parse(raw in external_date_strategy()) {
            prop_assert!(core_kernel::dates::parse_external(&raw).is_ok());
        }
    }

    #[test]
    fn test_fake_records_are_balanced() {
        assert!(fake_irm("REF-F1").check_balances().is_ok());
        assert!(fake_sb("SB-F1").check_balances().is_ok());
    }
}
