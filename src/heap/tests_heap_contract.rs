// =========================================================================
// FALSIFY-HEAP: indexed priority queue contract
//
// Every contract violation must surface as InvalidState, never as a panic
// or a silently corrupted heap.
// =========================================================================

use super::*;

/// FALSIFY-HEAP-001: double insert is rejected
#[test]
fn falsify_heap_001_double_insert() {
    let mut heap = IndexedHeap::new(2);
    heap.insert(0).expect("first insert");
    let err = heap.insert(0).expect_err("second insert must fail");
    assert!(
        matches!(err, OpfError::InvalidState { .. }),
        "FALSIFIED HEAP-001: got {err:?}"
    );
    assert_eq!(heap.len(), 1, "FALSIFIED HEAP-001: heap grew on rejected insert");
}

/// FALSIFY-HEAP-002: finalized nodes cannot be requeued
#[test]
fn falsify_heap_002_insert_after_extract() {
    let mut heap = IndexedHeap::new(1);
    heap.insert(0).expect("insert");
    heap.extract_min().expect("extract");
    assert!(
        heap.insert(0).is_err(),
        "FALSIFIED HEAP-002: black node was requeued"
    );
}

/// FALSIFY-HEAP-003: update requires a queued node
#[test]
fn falsify_heap_003_update_white_or_black() {
    let mut heap = IndexedHeap::new(2);
    assert!(
        heap.update(0, 1.0).is_err(),
        "FALSIFIED HEAP-003: update accepted a white node"
    );
    heap.insert(1).expect("insert");
    heap.extract_min().expect("extract");
    assert!(
        heap.update(1, 0.0).is_err(),
        "FALSIFIED HEAP-003: update accepted a black node"
    );
}

/// FALSIFY-HEAP-004: update must strictly decrease the key
#[test]
fn falsify_heap_004_update_non_decreasing() {
    let mut heap = IndexedHeap::new(1);
    heap.set_key(0, 2.0).expect("white");
    heap.insert(0).expect("insert");
    assert!(heap.update(0, 2.0).is_err(), "FALSIFIED HEAP-004: equal key accepted");
    assert!(heap.update(0, 3.0).is_err(), "FALSIFIED HEAP-004: larger key accepted");
    assert!(
        (heap.key(0) - 2.0).abs() < f32::EPSILON,
        "FALSIFIED HEAP-004: rejected update changed the key"
    );
}

/// FALSIFY-HEAP-005: extract from an empty queue is an error
#[test]
fn falsify_heap_005_extract_empty() {
    let mut heap = IndexedHeap::new(3);
    assert!(
        heap.extract_min().is_err(),
        "FALSIFIED HEAP-005: extract_min on empty queue succeeded"
    );
}

/// FALSIFY-HEAP-006: out-of-range indices are rejected
#[test]
fn falsify_heap_006_out_of_range() {
    let mut heap = IndexedHeap::new(2);
    assert!(heap.insert(2).is_err(), "FALSIFIED HEAP-006: insert(2) on capacity 2");
    assert!(heap.set_key(5, 0.0).is_err(), "FALSIFIED HEAP-006: set_key(5)");
    assert!(heap.update(7, 0.0).is_err(), "FALSIFIED HEAP-006: update(7)");
}

/// FALSIFY-HEAP-007: set_key only applies before insertion
#[test]
fn falsify_heap_007_set_key_on_gray() {
    let mut heap = IndexedHeap::new(1);
    heap.insert(0).expect("insert");
    assert!(
        heap.set_key(0, 0.0).is_err(),
        "FALSIFIED HEAP-007: set_key bypassed the decrease-key path"
    );
}
