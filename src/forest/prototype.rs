//! Prototype (tree root) selection.

use serde::{Deserialize, Serialize};

use super::ArcWeights;
use crate::distance::Distance;
use crate::error::{OpfError, Result};
use crate::graph::{Node, TrainingGraph};
use crate::heap::{Color, IndexedHeap};

/// Chooses the roots of the forest and the label each root propagates.
pub trait PrototypeSelector {
    /// Returns the indices of the nodes that become prototypes, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::DegenerateInput`] when no sensible root set exists.
    fn select<D: Distance>(
        &self,
        graph: &TrainingGraph,
        weights: &ArcWeights<'_, D>,
    ) -> Result<Vec<usize>>;

    /// Label a root hands down to the nodes it conquers.
    fn root_label(&self, node: &Node) -> usize {
        node.label()
    }
}

/// Supervised root selection on the minimum spanning tree.
///
/// Builds the MST of the complete graph with Prim's algorithm (starting at
/// node 0). Both endpoints of every tree arc joining two different labels
/// become prototypes: these are the samples sitting on the class boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MstBoundary;

impl PrototypeSelector for MstBoundary {
    fn select<D: Distance>(
        &self,
        graph: &TrainingGraph,
        weights: &ArcWeights<'_, D>,
    ) -> Result<Vec<usize>> {
        let n = graph.len();
        if n == 0 {
            return Err(OpfError::degenerate("training set has zero samples"));
        }
        if graph.n_classes() < 2 {
            return Err(OpfError::degenerate(
                "fewer than 2 distinct labels, no class boundary exists",
            ));
        }

        let nodes = graph.nodes();
        let mut heap = IndexedHeap::new(n);
        let mut tree_parent: Vec<Option<usize>> = vec![None; n];
        let mut is_prototype = vec![false; n];

        heap.set_key(0, 0.0)?;
        heap.insert(0)?;

        while !heap.is_empty() {
            let p = heap.extract_min()?;

            if let Some(parent) = tree_parent[p] {
                if nodes[p].label() != nodes[parent].label() {
                    is_prototype[p] = true;
                    is_prototype[parent] = true;
                }
            }

            for q in 0..n {
                if q == p || heap.color(q) == Color::Black {
                    continue;
                }
                let w = weights.between(&nodes[p], &nodes[q]);
                if w < heap.key(q) {
                    tree_parent[q] = Some(p);
                    if heap.color(q) == Color::White {
                        heap.set_key(q, w)?;
                        heap.insert(q)?;
                    } else {
                        heap.update(q, w)?;
                    }
                }
            }
        }

        Ok(is_prototype
            .iter()
            .enumerate()
            .filter(|(_, &flag)| flag)
            .map(|(i, _)| i)
            .collect())
    }
}
