//! Allocation request types and the pure validation steps
//!
//! Amounts arrive as raw operator input and are re-validated here through
//! [`Amount::parse`] regardless of what the UI already did to them.

use core_kernel::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::ReconciliationError;

/// Identifies the single record whose full outstanding balance is being
/// distributed in one allocation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorRef {
    /// An IRM, by remittance reference number
    Remittance(String),
    /// A Shipping Bill, by shipping bill number
    ShippingBill(String),
}

impl AnchorRef {
    pub fn natural_key(&self) -> &str {
        match self {
            AnchorRef::Remittance(key) | AnchorRef::ShippingBill(key) => key,
        }
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorRef::Remittance(key) => write!(f, "IRM {key}"),
            AnchorRef::ShippingBill(key) => write!(f, "SB {key}"),
        }
    }
}

/// One proposed allocation against a counterparty record, amount still raw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterpartyAllocation {
    pub natural_key: String,
    pub amount: String,
}

/// A counterparty allocation with its amount parsed and canonicalized
#[derive(Debug, Clone)]
pub struct ParsedAllocation {
    pub natural_key: String,
    pub amount: Amount,
}

/// Rejects an empty allocation list (validation step 1)
pub fn ensure_non_empty(
    allocations: &[CounterpartyAllocation],
) -> Result<(), ReconciliationError> {
    if allocations.is_empty() {
        Err(ReconciliationError::EmptyAllocations)
    } else {
        Ok(())
    }
}

/// Parses every proposed amount and rejects duplicate counterparty keys
/// (validation step 3)
pub fn parse_amounts(
    allocations: &[CounterpartyAllocation],
) -> Result<Vec<ParsedAllocation>, ReconciliationError> {
    let mut seen = HashSet::new();
    allocations
        .iter()
        .map(|a| {
            let key = a.natural_key.trim().to_string();
            if !seen.insert(key.clone()) {
                return Err(ReconciliationError::DuplicateCounterparty(key));
            }
            Ok(ParsedAllocation {
                natural_key: key,
                amount: Amount::parse(&a.amount)?,
            })
        })
        .collect()
}

/// Sums the parsed amounts (validation step 5)
pub fn total_allocated(parsed: &[ParsedAllocation]) -> Result<Amount, ReconciliationError> {
    parsed
        .iter()
        .try_fold(Amount::zero(), |acc, p| acc.checked_add(p.amount))
        .map_err(ReconciliationError::from)
}

/// Requires the allocated total to consume the anchor's outstanding balance
/// exactly, within the standard epsilon (validation step 6)
pub fn check_full_allocation(
    total: Amount,
    anchor_outstanding: Amount,
) -> Result<(), ReconciliationError> {
    if total.approx_eq(anchor_outstanding) {
        Ok(())
    } else {
        Err(ReconciliationError::AmountMismatch {
            allocated: total,
            outstanding: anchor_outstanding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn alloc(key: &str, amount: &str) -> CounterpartyAllocation {
        CounterpartyAllocation {
            natural_key: key.to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_ensure_non_empty() {
        assert!(matches!(
            ensure_non_empty(&[]),
            Err(ReconciliationError::EmptyAllocations)
        ));
        assert!(ensure_non_empty(&[alloc("SB-1", "10")]).is_ok());
    }

    #[test]
    fn test_parse_amounts_canonicalizes() {
        let parsed = parse_amounts(&[alloc("SB-1", "1,800,000"), alloc("SB-2", "1200000.00")]).unwrap();
        assert_eq!(parsed[0].amount.value(), dec!(1800000));
        assert_eq!(parsed[1].amount.value(), dec!(1200000));
    }

    #[test]
    fn test_parse_amounts_rejects_garbage() {
        let result = parse_amounts(&[alloc("SB-1", "12x00")]);
        assert!(matches!(result, Err(ReconciliationError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_amounts_rejects_duplicates() {
        let result = parse_amounts(&[alloc("SB-1", "10"), alloc("SB-1", "20")]);
        assert!(matches!(
            result,
            Err(ReconciliationError::DuplicateCounterparty(key)) if key == "SB-1"
        ));
    }

    #[test]
    fn test_total_allocated() {
        let parsed = parse_amounts(&[alloc("SB-1", "1800000"), alloc("SB-2", "1200000")]).unwrap();
        assert_eq!(total_allocated(&parsed).unwrap().value(), dec!(3000000));
    }

    #[test]
    fn test_check_full_allocation_exact_match() {
        let outstanding = Amount::parse("3000000").unwrap();
        assert!(check_full_allocation(Amount::parse("3,000,000.00").unwrap(), outstanding).is_ok());
    }

    #[test]
    fn test_check_full_allocation_one_cent_short_is_a_mismatch() {
        let outstanding = Amount::parse("3000000").unwrap();
        let err = check_full_allocation(Amount::parse("2999999.99").unwrap(), outstanding)
            .unwrap_err()
            .to_string();
        assert!(err.contains("2999999.99"), "got: {err}");
        assert!(err.contains("3000000.00"), "got: {err}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Any split of an outstanding balance into per-counterparty parts
        // totals back to it and passes the full-allocation check
        #[test]
        fn splits_conserve_the_outstanding_balance(
            parts in proptest::collection::vec(1u64..1_000_000u64, 1..8)
        ) {
            let allocations: Vec<CounterpartyAllocation> = parts
                .iter()
                .enumerate()
                .map(|(i, p)| CounterpartyAllocation {
                    natural_key: format!("SB-{i}"),
                    amount: p.to_string(),
                })
                .collect();
            let outstanding = Amount::parse(&parts.iter().sum::<u64>().to_string()).unwrap();

            let parsed = parse_amounts(&allocations).unwrap();
            let total = total_allocated(&parsed).unwrap();
            prop_assert_eq!(total, outstanding);
            prop_assert!(check_full_allocation(total, outstanding).is_ok());
        }

        // A short or long total is always rejected once the gap reaches a cent
        #[test]
        fn off_by_a_cent_or_more_always_mismatches(base in 1u64..1_000_000_000u64, cents in 1u64..1_000u64) {
            let outstanding = Amount::parse(&base.to_string()).unwrap();
            let short = outstanding
                .checked_sub(Amount::parse(&format!("0.{:02}", cents.min(99))).unwrap());
            prop_assume!(short.is_ok());
            let short = short.unwrap();
            prop_assert!(check_full_allocation(short, outstanding).is_err());
        }
    }
}
