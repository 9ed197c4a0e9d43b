//! Property-based tests using proptest.
//!
//! These tests verify invariants of the trained forest and of prediction.

use opforest::prelude::*;
use proptest::prelude::*;

// Small labeled 2-D datasets with at least two classes.
fn dataset_strategy() -> impl Strategy<Value = (Matrix<f32>, Vec<usize>)> {
    (4usize..24).prop_flat_map(|n| {
        (
            proptest::collection::vec(-50.0f32..50.0, n * 2),
            proptest::collection::vec(0usize..3, n),
        )
            .prop_map(move |(data, mut labels)| {
                labels[0] = 0;
                labels[1] = 1;
                (
                    Matrix::from_vec(n, 2, data).expect("Test data should be valid"),
                    labels,
                )
            })
    })
}

fn fitted(x: &Matrix<f32>, y: &[usize]) -> OptimumPathForest {
    let mut opf = OptimumPathForest::new();
    opf.fit(x, y).expect("two classes present");
    opf
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn settled_order_is_permutation((x, y) in dataset_strategy()) {
        let opf = fitted(&x, &y);
        let graph = opf.graph().expect("fitted");
        let mut order = graph.settled_order().to_vec();
        order.sort_unstable();
        prop_assert_eq!(order, (0..x.n_rows()).collect::<Vec<_>>());
    }

    #[test]
    fn settled_costs_never_decrease((x, y) in dataset_strategy()) {
        let opf = fitted(&x, &y);
        let graph = opf.graph().expect("fitted");
        let costs: Vec<f32> = graph.settled_order().iter().map(|&i| graph.node(i).cost()).collect();
        for pair in costs.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn cost_is_minimax_over_predecessor((x, y) in dataset_strategy()) {
        let opf = fitted(&x, &y);
        let graph = opf.graph().expect("fitted");
        let metric = DistanceMetric::Euclidean;
        for (i, node) in graph.nodes().iter().enumerate() {
            match node.predecessor() {
                None => {
                    prop_assert!(node.is_prototype());
                    prop_assert_eq!(node.cost(), 0.0);
                }
                Some(p) => {
                    let parent = graph.node(p);
                    let w = metric.distance(parent.features(), node.features());
                    let expected = parent.cost().max(w);
                    prop_assert!((node.cost() - expected).abs() <= 1e-4, "node {}", i);
                }
            }
        }
    }

    #[test]
    fn prototypes_come_in_cross_label_pairs((x, y) in dataset_strategy()) {
        let opf = fitted(&x, &y);
        let graph = opf.graph().expect("fitted");
        let protos = opf.prototypes().expect("fitted");
        prop_assert!(protos.len() >= 2);
        let labels: std::collections::BTreeSet<usize> =
            protos.iter().map(|&p| graph.node(p).label()).collect();
        prop_assert!(labels.len() >= 2);
    }

    #[test]
    fn fit_is_deterministic((x, y) in dataset_strategy()) {
        let a = fitted(&x, &y);
        let b = fitted(&x, &y);
        prop_assert_eq!(a.graph(), b.graph());
    }

    #[test]
    fn training_samples_cost_no_more_than_their_node((x, y) in dataset_strategy()) {
        let opf = fitted(&x, &y);
        let graph = opf.graph().expect("fitted");
        let preds = opf.predict_with_conquerors(&x).expect("fitted");
        for (i, p) in preds.iter().enumerate() {
            prop_assert!(p.cost <= graph.node(i).cost());
        }
    }

    #[test]
    fn opf_accuracy_is_bounded(
        y_true in proptest::collection::vec(0usize..4, 1..50),
        seed in 0usize..4,
    ) {
        let y_pred: Vec<usize> = y_true.iter().map(|&c| (c + seed) % 4).collect();
        let acc = opf_accuracy(&y_pred, &y_true);
        prop_assert!((0.0..=1.0).contains(&acc));
        prop_assert!((opf_accuracy(&y_true, &y_true) - 1.0).abs() < 1e-6);
    }
}
