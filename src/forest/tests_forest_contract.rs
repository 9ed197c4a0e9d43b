// =========================================================================
// FALSIFY-OPF: optimum-path forest invariants
//
// Papa, Falcão & Suzuki (2009) "Supervised pattern classification based on
// optimum-path forest". Each check below must hold for every training set
// with at least two classes.
// =========================================================================

use super::*;
use crate::distance::DistanceMetric;
use crate::graph::TrainingGraph;
use crate::observer::NoopObserver;
use crate::primitives::Matrix;

fn two_blobs() -> TrainingGraph {
    let x = Matrix::from_vec(
        8,
        2,
        vec![
            0.0, 0.0, 0.4, 0.1, 0.2, 0.5, 0.9, 0.3, //
            5.0, 5.0, 5.3, 4.8, 4.6, 5.4, 4.1, 4.4,
        ],
    )
    .expect("8x2");
    TrainingGraph::new(&x, &[0, 0, 0, 0, 1, 1, 1, 1]).expect("valid")
}

fn trained() -> TrainingGraph {
    let mut g = two_blobs();
    build_forest(
        &mut g,
        &MstBoundary,
        &ArcWeights::Computed(&DistanceMetric::Euclidean),
        &NoopObserver,
    )
    .expect("two classes");
    g
}

/// FALSIFY-OPF-001: prototypes are roots with zero cost
#[test]
fn falsify_opf_001_prototypes_are_zero_cost_roots() {
    let g = trained();
    assert!(!g.prototypes().is_empty(), "FALSIFIED OPF-001: no prototypes");
    for i in g.prototypes() {
        let node = g.node(i);
        assert_eq!(node.cost(), 0.0, "FALSIFIED OPF-001: prototype {i} cost {}", node.cost());
        assert_eq!(node.predecessor(), None, "FALSIFIED OPF-001: prototype {i} has a predecessor");
        assert_eq!(node.predicted_label(), Some(node.label()));
    }
}

/// FALSIFY-OPF-002: non-root cost equals max(pred cost, arc weight)
#[test]
fn falsify_opf_002_cost_matches_predecessor_arc() {
    let g = trained();
    for (i, node) in g.nodes().iter().enumerate() {
        let Some(p) = node.predecessor() else { continue };
        let pred = g.node(p);
        let w = DistanceMetric::Euclidean.distance(pred.features(), node.features());
        let expected = pred.cost().max(w);
        assert!(
            (node.cost() - expected).abs() < 1e-6,
            "FALSIFIED OPF-002: node {i} cost {} != max({}, {w})",
            node.cost(),
            pred.cost()
        );
        assert!(node.cost() >= pred.cost(), "FALSIFIED OPF-002: cost below predecessor");
        assert_eq!(node.predicted_label(), pred.predicted_label());
    }
}

/// FALSIFY-OPF-003: settled order is a permutation with non-decreasing cost
#[test]
fn falsify_opf_003_settled_order_permutation() {
    let g = trained();
    let mut seen = g.settled_order().to_vec();
    seen.sort_unstable();
    assert_eq!(seen, (0..g.len()).collect::<Vec<_>>(), "FALSIFIED OPF-003: not a permutation");
    for pair in g.settled_order().windows(2) {
        assert!(
            g.node(pair[0]).cost() <= g.node(pair[1]).cost(),
            "FALSIFIED OPF-003: costs decrease along settled order at {pair:?}"
        );
    }
}

/// FALSIFY-OPF-004: every path ends at a prototype
#[test]
fn falsify_opf_004_paths_reach_roots() {
    let g = trained();
    for i in 0..g.len() {
        let root = g.path_to_root(i).last().expect("path is non-empty");
        assert!(g.node(root).is_prototype(), "FALSIFIED OPF-004: node {i} root {root}");
    }
}

/// FALSIFY-OPF-005: repeated fits are identical
#[test]
fn falsify_opf_005_deterministic() {
    assert_eq!(trained(), trained(), "FALSIFIED OPF-005: two fits differ");
}

/// FALSIFY-OPF-006: separable blobs keep their own labels
#[test]
fn falsify_opf_006_training_labels_recovered() {
    let g = trained();
    for (i, node) in g.nodes().iter().enumerate() {
        assert_eq!(
            node.predicted_label(),
            Some(node.label()),
            "FALSIFIED OPF-006: node {i} relabelled"
        );
    }
}
