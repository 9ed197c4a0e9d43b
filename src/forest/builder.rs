//! Minimax forest growth from the prototypes.

use super::{ArcWeights, PrototypeSelector};
use crate::distance::Distance;
use crate::error::{OpfError, Result};
use crate::graph::{NodeStatus, TrainingGraph};
use crate::heap::{Color, IndexedHeap};
use crate::observer::FitObserver;

/// Grows the optimum-path forest over `graph`.
///
/// Every derived field of the graph is recomputed: prototypes come from
/// `selector`, then all trees grow simultaneously. A node `q` reached from a
/// settled node `p` is offered the path cost `max(cost(p), w(p, q))`; the
/// node keeps the cheapest offer, its predecessor and the predecessor's
/// label. Nodes are settled in ascending cost order, ties in queue order.
///
/// # Errors
///
/// Returns [`OpfError::DegenerateInput`] if the selector rejects the graph
/// or returns no roots (nothing is reachable). With at least one root every
/// node is queued by the first settlement, so infinite arc weights only
/// yield infinite costs.
/// A root index that is out of range or repeated is an
/// [`OpfError::InvalidState`].
///
/// # Examples
///
/// ```
/// use opforest::distance::DistanceMetric;
/// use opforest::forest::{build_forest, ArcWeights, MstBoundary};
/// use opforest::graph::TrainingGraph;
/// use opforest::observer::NoopObserver;
/// use opforest::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
/// let mut graph = TrainingGraph::new(&x, &[0, 0, 1, 1]).expect("valid");
/// let metric = DistanceMetric::Euclidean;
///
/// build_forest(&mut graph, &MstBoundary, &ArcWeights::Computed(&metric), &NoopObserver)
///     .expect("two classes");
///
/// assert_eq!(graph.prototypes(), vec![1, 2]);
/// assert_eq!(graph.node(0).predecessor(), Some(1));
/// assert_eq!(graph.settled_order(), &[1, 2, 0, 3]);
/// ```
pub fn build_forest<S, D>(
    graph: &mut TrainingGraph,
    selector: &S,
    weights: &ArcWeights<'_, D>,
    observer: &dyn FitObserver,
) -> Result<()>
where
    S: PrototypeSelector,
    D: Distance,
{
    graph.reset();
    let prototypes = selector.select(graph, weights)?;
    observer.on_prototypes(&prototypes, graph.len());

    let n = graph.len();
    let mut heap = IndexedHeap::new(n);

    for &root in &prototypes {
        heap.set_key(root, 0.0)?;
        heap.insert(root)?;
        let label = selector.root_label(graph.node(root));
        let node = &mut graph.nodes_mut()[root];
        node.status = NodeStatus::Prototype;
        node.predecessor = None;
        node.predicted_label = Some(label);
    }

    while !heap.is_empty() {
        let p = heap.extract_min()?;
        let cost_p = heap.key(p);
        graph.nodes_mut()[p].cost = cost_p;
        graph.settled_order_mut().push(p);
        observer.on_settled(p, cost_p);

        let label_p = graph.node(p).predicted_label;
        for q in 0..n {
            if q == p || heap.color(q) == Color::Black || cost_p >= heap.key(q) {
                continue;
            }

            let w = weights.between(graph.node(p), graph.node(q));
            let candidate = cost_p.max(w);

            match heap.color(q) {
                Color::White => {
                    heap.set_key(q, candidate)?;
                    heap.insert(q)?;
                }
                Color::Gray if candidate < heap.key(q) => heap.update(q, candidate)?,
                _ => continue,
            }

            let node = &mut graph.nodes_mut()[q];
            node.predecessor = Some(p);
            node.predicted_label = label_p;
        }
    }

    if graph.settled_order().len() != n {
        let settled = graph.settled_order().len();
        graph.reset();
        return Err(OpfError::DegenerateInput {
            reason: format!("only {settled} of {n} nodes reachable from a prototype"),
        });
    }

    observer.on_fit_complete(n, prototypes.len());
    Ok(())
}
