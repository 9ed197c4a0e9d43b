// =========================================================================
// FALSIFY-CLS: classifier contract
//
// Claims under test:
//   - every predicted label was seen during training
//   - predict returns exactly one label per input row
//   - predict never mutates the trained forest
//   - concurrent predictions through a shared reference agree with serial ones
//   - a prediction never costs less than its conqueror's own path
//   - the worked 1-D example classifies 0.5 as class 0 via node 1
// =========================================================================

use super::*;
use std::collections::BTreeSet;
use std::thread;

fn ring_dataset() -> (Matrix<f32>, Vec<usize>) {
    let mut data = Vec::new();
    let mut labels = Vec::new();
    for i in 0..24 {
        let angle = i as f32 * std::f32::consts::TAU / 24.0;
        let radius = if i % 3 == 0 { 4.0 } else { 1.0 };
        data.push(radius * angle.cos());
        data.push(radius * angle.sin());
        labels.push(usize::from(i % 3 == 0) + 2 * usize::from(i >= 12 && i % 3 == 0));
    }
    (Matrix::from_vec(24, 2, data).expect("24x2"), labels)
}

fn probes() -> Matrix<f32> {
    let data: Vec<f32> = (0..40)
        .flat_map(|i| {
            let t = i as f32 * 0.37;
            [5.0 * t.sin(), 4.5 * (1.3 * t).cos()]
        })
        .collect();
    Matrix::from_vec(40, 2, data).expect("40x2")
}

fn trained() -> OptimumPathForest {
    let (x, y) = ring_dataset();
    let mut opf = OptimumPathForest::new();
    opf.fit(&x, &y).expect("three classes");
    opf
}

/// FALSIFY-CLS-001: labels come from the training set
#[test]
fn falsify_cls_001_labels_from_training_set() {
    let (_, y) = ring_dataset();
    let known: BTreeSet<usize> = y.into_iter().collect();
    let preds = trained().predict(&probes()).expect("fitted");
    for p in preds {
        assert!(
            known.contains(&p),
            "FALSIFIED CLS-001: predicted label {p} never seen in training"
        );
    }
}

/// FALSIFY-CLS-002: one prediction per row
#[test]
fn falsify_cls_002_prediction_count() {
    let x = probes();
    let preds = trained().predict(&x).expect("fitted");
    assert_eq!(
        preds.len(),
        x.n_rows(),
        "FALSIFIED CLS-002: {} predictions for {} rows",
        preds.len(),
        x.n_rows()
    );
}

/// FALSIFY-CLS-003: predict is read-only
#[test]
fn falsify_cls_003_predict_is_read_only() {
    let opf = trained();
    let before = opf.records().expect("fitted");
    let _ = opf.predict(&probes()).expect("fitted");
    assert_eq!(
        opf.records().expect("fitted"),
        before,
        "FALSIFIED CLS-003: predict changed the trained forest"
    );
}

/// FALSIFY-CLS-004: shared-reference prediction from several threads
#[test]
fn falsify_cls_004_concurrent_predict() {
    let opf = trained();
    let x = probes();
    let serial = opf.predict(&x).expect("fitted");

    let results: Vec<Vec<usize>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| opf.predict(&x).expect("fitted")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect()
    });
    for r in results {
        assert_eq!(r, serial, "FALSIFIED CLS-004: concurrent result differs");
    }
}

/// FALSIFY-CLS-005: prediction cost dominates conqueror cost
#[test]
fn falsify_cls_005_cost_not_below_conqueror() {
    let opf = trained();
    let graph = opf.graph().expect("fitted");
    for p in opf.predict_with_conquerors(&probes()).expect("fitted") {
        let conqueror = graph.node(p.conqueror);
        assert!(
            p.cost >= conqueror.cost(),
            "FALSIFIED CLS-005: cost {} below conqueror cost {}",
            p.cost,
            conqueror.cost()
        );
        assert_eq!(
            Some(p.label),
            conqueror.predicted_label(),
            "FALSIFIED CLS-005: label not inherited from conqueror"
        );
    }
}

/// FALSIFY-CLS-006: worked 1-D example
#[test]
fn falsify_cls_006_worked_example() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
    let mut opf = OptimumPathForest::new();
    opf.fit(&x, &[0, 0, 1, 1]).expect("two classes");

    let graph = opf.graph().expect("fitted");
    assert_eq!(
        graph.settled_order(),
        &[1, 2, 0, 3],
        "FALSIFIED CLS-006: unexpected settled order"
    );
    let p = opf
        .predict_with_conquerors(&Matrix::from_vec(1, 1, vec![0.5]).expect("1x1"))
        .expect("fitted");
    assert_eq!(
        (p[0].label, p[0].conqueror),
        (0, 1),
        "FALSIFIED CLS-006: 0.5 should be conquered by node 1 with label 0"
    );
}
