//! Allocation engine tests against the in-memory store

use std::sync::Arc;

use domain_reconciliation::{
    AnchorRef, CounterpartyAllocation, MappingHistory, MappingParticipants, ReconciliationEngine,
    ReconciliationError, RecordStorePort,
};
use infra_store::MemoryRecordStore;
use test_utils::assertions::{assert_amount_eq, assert_fully_utilized};
use test_utils::builders::{IrmBuilder, SbBuilder};

fn alloc(key: &str, amount: &str) -> CounterpartyAllocation {
    CounterpartyAllocation {
        natural_key: key.to_string(),
        amount: amount.to_string(),
    }
}

async fn seeded_store() -> Arc<MemoryRecordStore> {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .insert_irm(
            IrmBuilder::new()
                .ref_no("REF-001")
                .amounts("4,000,000", "1,000,000", "3,000,000")
                .build(),
        )
        .await
        .unwrap();
    store
        .insert_sbs(vec![
            SbBuilder::new()
                .bill_no("SB-1001")
                .amounts("2,000,000", "0", "2,000,000")
                .build(),
            SbBuilder::new()
                .bill_no("SB-1002")
                .amounts("1,500,000", "0", "1,500,000")
                .build(),
        ])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_full_allocation_across_two_bills() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store.clone());

    let mapping_id = engine
        .allocate(
            AnchorRef::Remittance("REF-001".to_string()),
            vec![alloc("SB-1001", "1,800,000"), alloc("SB-1002", "1,200,000")],
        )
        .await
        .unwrap();

    // Anchor drawn to zero
    let irm = store.find_irm_by_ref("REF-001").await.unwrap().record;
    assert_fully_utilized(
        irm.outstanding_amount,
        irm.utilized_amount,
        irm.remittance_amount,
    );

    // Each bill reduced by its own amount
    let sb1 = store.find_sb_by_no("SB-1001").await.unwrap().record;
    assert_amount_eq(sb1.bill_outstanding_value, "200000");
    assert_amount_eq(sb1.sb_utilization, "1800000");

    let sb2 = store.find_sb_by_no("SB-1002").await.unwrap().record;
    assert_amount_eq(sb2.bill_outstanding_value, "300000");
    assert_amount_eq(sb2.sb_utilization, "1200000");

    // One entry, two counterparty snapshots, pre-update balances preserved
    let entries = store.list_mapping_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, mapping_id);
    match &entries[0].participants {
        MappingParticipants::RemittanceToShippingBills {
            anchor,
            counterparties,
        } => {
            assert_amount_eq(anchor.record.outstanding_amount, "3000000");
            assert_amount_eq(anchor.utilization_amount, "3000000");
            assert_eq!(counterparties.len(), 2);
            assert_amount_eq(counterparties[0].record.bill_outstanding_value, "2000000");
            assert_amount_eq(counterparties[0].utilization_amount, "1800000");
        }
        other => panic!("unexpected direction: {other:?}"),
    }
}

#[tokio::test]
async fn test_partial_allocation_rejected_with_both_totals() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store.clone());

    let err = engine
        .allocate(
            AnchorRef::Remittance("REF-001".to_string()),
            vec![alloc("SB-1001", "1,999,999.99"), alloc("SB-1002", "1,000,000")],
        )
        .await
        .unwrap_err();

    match &err {
        ReconciliationError::AmountMismatch { .. } => {
            let msg = err.to_string();
            assert!(msg.contains("2999999.99"), "got: {msg}");
            assert!(msg.contains("3000000.00"), "got: {msg}");
        }
        other => panic!("expected AmountMismatch, got {other:?}"),
    }

    // No state change on rejection
    let irm = store.find_irm_by_ref("REF-001").await.unwrap();
    assert_amount_eq(irm.record.outstanding_amount, "3000000");
    assert_eq!(irm.version, 1);
    assert!(store.list_mapping_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_counterparty_keys_all_reported() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store.clone());

    let err = engine
        .allocate(
            AnchorRef::Remittance("REF-001".to_string()),
            vec![
                alloc("SB-1001", "1,000,000"),
                alloc("SB-9998", "1,000,000"),
                alloc("SB-9999", "1,000,000"),
            ],
        )
        .await
        .unwrap_err();

    match &err {
        ReconciliationError::CounterpartiesNotFound { keys } => {
            assert_eq!(keys, &["SB-9998".to_string(), "SB-9999".to_string()]);
        }
        other => panic!("expected CounterpartiesNotFound, got {other:?}"),
    }
    assert!(store.list_mapping_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_anchor() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store);

    let err = engine
        .allocate(
            AnchorRef::Remittance("REF-404".to_string()),
            vec![alloc("SB-1001", "3,000,000")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ReconciliationError::AnchorNotFound(key) if key == "REF-404"));
}

#[tokio::test]
async fn test_empty_allocation_list_rejected() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store.clone());

    let err = engine
        .allocate(AnchorRef::Remittance("REF-001".to_string()), vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, ReconciliationError::EmptyAllocations));
    assert!(store.list_mapping_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_counterparty_overdraw_rejected_without_partial_update() {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .insert_irm(
            IrmBuilder::new()
                .ref_no("REF-001")
                .amounts("3,000,000", "0", "3,000,000")
                .build(),
        )
        .await
        .unwrap();
    // Bill can only absorb 500,000 of the 3,000,000
    store
        .insert_sbs(vec![
            SbBuilder::new()
                .bill_no("SB-1001")
                .amounts("2,000,000", "1,500,000", "500,000")
                .build(),
            SbBuilder::new()
                .bill_no("SB-1002")
                .amounts("2,500,000", "0", "2,500,000")
                .build(),
        ])
        .await
        .unwrap();

    let engine = ReconciliationEngine::new(store.clone());
    let err = engine
        .allocate(
            AnchorRef::Remittance("REF-001".to_string()),
            vec![alloc("SB-1001", "600,000"), alloc("SB-1002", "2,400,000")],
        )
        .await
        .unwrap_err();

    match &err {
        ReconciliationError::CounterpartyOverdrawn { key, .. } => assert_eq!(key, "SB-1001"),
        other => panic!("expected CounterpartyOverdrawn, got {other:?}"),
    }

    let sb2 = store.find_sb_by_no("SB-1002").await.unwrap();
    assert_amount_eq(sb2.record.bill_outstanding_value, "2500000");
    assert_eq!(sb2.version, 1);
}

#[tokio::test]
async fn test_sb_anchor_direction() {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .insert_irms(vec![
            IrmBuilder::new()
                .ref_no("REF-A")
                .amounts("1,200,000", "0", "1,200,000")
                .build(),
            IrmBuilder::new()
                .ref_no("REF-B")
                .amounts("900,000", "0", "900,000")
                .build(),
        ])
        .await
        .unwrap();
    store
        .insert_sb(
            SbBuilder::new()
                .bill_no("SB-2001")
                .amounts("2,000,000", "0", "2,000,000")
                .build(),
        )
        .await
        .unwrap();

    let engine = ReconciliationEngine::new(store.clone());
    engine
        .allocate(
            AnchorRef::ShippingBill("SB-2001".to_string()),
            vec![alloc("REF-A", "1,100,000"), alloc("REF-B", "900,000")],
        )
        .await
        .unwrap();

    let sb = store.find_sb_by_no("SB-2001").await.unwrap().record;
    assert!(sb.bill_outstanding_value.is_zero());

    let irm_a = store.find_irm_by_ref("REF-A").await.unwrap().record;
    assert_amount_eq(irm_a.outstanding_amount, "100000");
    assert_amount_eq(irm_a.utilized_amount, "1100000");
}

#[tokio::test]
async fn test_duplicate_counterparty_rejected() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store);

    let err = engine
        .allocate(
            AnchorRef::Remittance("REF-001".to_string()),
            vec![alloc("SB-1001", "1,500,000"), alloc("SB-1001", "1,500,000")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ReconciliationError::DuplicateCounterparty(key) if key == "SB-1001"));
}

#[tokio::test]
async fn test_concurrent_double_spend_exactly_one_wins() {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .insert_irm(
            IrmBuilder::new()
                .ref_no("REF-001")
                .amounts("3,000,000", "0", "3,000,000")
                .build(),
        )
        .await
        .unwrap();
    store
        .insert_sbs(vec![
            SbBuilder::new()
                .bill_no("SB-1001")
                .amounts("3,000,000", "0", "3,000,000")
                .build(),
            SbBuilder::new()
                .bill_no("SB-1002")
                .amounts("3,000,000", "0", "3,000,000")
                .build(),
        ])
        .await
        .unwrap();

    let engine = ReconciliationEngine::new(store.clone());
    let a = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .allocate(
                    AnchorRef::Remittance("REF-001".to_string()),
                    vec![alloc("SB-1001", "3,000,000")],
                )
                .await
        })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .allocate(
                    AnchorRef::Remittance("REF-001".to_string()),
                    vec![alloc("SB-1002", "3,000,000")],
                )
                .await
        })
    };

    let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
    let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one allocation must win: {ra:?} / {rb:?}");

    // The loser re-validated against the zeroed anchor
    let loser = if ra.is_err() { ra } else { rb };
    match loser.unwrap_err() {
        ReconciliationError::AmountMismatch { .. } | ReconciliationError::Conflict => {}
        other => panic!("unexpected loser error: {other:?}"),
    }

    let irm = store.find_irm_by_ref("REF-001").await.unwrap().record;
    assert!(irm.outstanding_amount.is_zero());
    assert_eq!(store.list_mapping_entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_queries_and_immutability() {
    let store = seeded_store().await;
    let engine = ReconciliationEngine::new(store.clone());
    let history = MappingHistory::new(store.clone());

    engine
        .allocate(
            AnchorRef::Remittance("REF-001".to_string()),
            vec![alloc("SB-1001", "1,800,000"), alloc("SB-1002", "1,200,000")],
        )
        .await
        .unwrap();

    let for_sb = history.for_shipping_bill("SB-1001").await.unwrap();
    assert_eq!(for_sb.len(), 1);
    let for_irm = history.for_remittance("REF-001").await.unwrap();
    assert_eq!(for_irm.len(), 1);
    assert!(history.for_shipping_bill("SB-9999").await.unwrap().is_empty());

    // Reads are idempotent
    let again = history.for_shipping_bill("SB-1001").await.unwrap();
    assert_eq!(again[0].id, for_sb[0].id);

    // Later edits to the record never rewrite the snapshot
    let sb = store.find_sb_by_no("SB-1001").await.unwrap();
    let mut edited = sb.record.clone();
    edited.buyer_name = "Renamed Buyer".to_string();
    store.update_sb(edited, sb.version).await.unwrap();

    let after_edit = history.for_shipping_bill("SB-1001").await.unwrap();
    match &after_edit[0].participants {
        MappingParticipants::RemittanceToShippingBills { counterparties, .. } => {
            assert_eq!(counterparties[0].record.buyer_name, "Buyer Co");
            assert_amount_eq(counterparties[0].record.bill_outstanding_value, "2000000");
        }
        other => panic!("unexpected direction: {other:?}"),
    }
}

#[tokio::test]
async fn test_ambiguous_sb_anchor_is_not_silently_resolved() {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .insert_sbs(vec![
            SbBuilder::new().bill_no("SB-DUP").build(),
            SbBuilder::new().bill_no("SB-DUP").build(),
        ])
        .await
        .unwrap();
    store
        .insert_irm(IrmBuilder::new().ref_no("REF-001").build())
        .await
        .unwrap();

    let engine = ReconciliationEngine::new(store);
    let err = engine
        .allocate(
            AnchorRef::ShippingBill("SB-DUP".to_string()),
            vec![alloc("REF-001", "2,000,000")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ReconciliationError::Store(e) if e.is_conflict()));
}
