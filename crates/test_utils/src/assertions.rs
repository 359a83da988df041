//! Custom test assertions for domain types

use core_kernel::Amount;
use domain_records::{RemittanceRecord, ShippingBillRecord};

/// Asserts an amount equals the given literal, with both sides in the message
pub fn assert_amount_eq(actual: Amount, expected: &str) {
    let expected = Amount::parse(expected).expect("expected amount literal");
    assert_eq!(
        actual, expected,
        "amounts differ: actual={actual}, expected={expected}"
    );
}

/// Asserts the record's three balances are mutually consistent
pub fn assert_irm_balanced(record: &RemittanceRecord) {
    record.check_balances().unwrap_or_else(|e| {
        panic!(
            "IRM {} balances inconsistent: {e}",
            record.remittance_ref_no
        )
    });
}

/// Asserts the bill's three balances are mutually consistent
pub fn assert_sb_balanced(record: &ShippingBillRecord) {
    record.check_balances().unwrap_or_else(|e| {
        panic!("SB {} balances inconsistent: {e}", record.shipping_bill_no)
    });
}

/// Asserts a record is fully drawn down
pub fn assert_fully_utilized(outstanding: Amount, utilized: Amount, total: Amount) {
    assert!(
        outstanding.is_zero(),
        "expected zero outstanding, got {outstanding}"
    );
    assert_eq!(
        utilized, total,
        "utilized ({utilized}) should equal the record total ({total})"
    );
}
