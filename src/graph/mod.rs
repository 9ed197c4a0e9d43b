//! Training graph for the optimum-path forest.
//!
//! The graph is complete and implicit: arcs are never stored, their weights
//! are distances computed (or looked up) on demand. Nodes live in one
//! contiguous arena and refer to each other by index, so predecessor links
//! are plain `Option<usize>`.
//!
//! # Examples
//!
//! ```
//! use opforest::graph::TrainingGraph;
//! use opforest::primitives::Matrix;
//!
//! let x = Matrix::from_vec(3, 1, vec![0.0, 1.0, 10.0]).expect("3x1");
//! let g = TrainingGraph::new(&x, &[0, 0, 1]).expect("valid input");
//! assert_eq!(g.len(), 3);
//! assert_eq!(g.n_classes(), 2);
//! assert!(!g.is_trained());
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{OpfError, Result};
use crate::primitives::Matrix;

mod node;

pub use node::{Node, NodeStatus};

/// Flat, serializable view of one trained node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRecord {
    /// Position in the original dataset.
    pub identity: usize,
    /// Ground-truth label.
    pub label: usize,
    /// Label inherited from the node's root.
    pub predicted_label: Option<usize>,
    /// Finalized path cost.
    pub cost: f32,
    /// Index (into the graph) of the predecessor, if any.
    pub predecessor: Option<usize>,
    /// Whether the node is a tree root.
    pub prototype: bool,
}

/// Nodes of a training set plus the order in which `fit` settled them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingGraph {
    nodes: Vec<Node>,
    n_features: usize,
    settled_order: Vec<usize>,
}

impl TrainingGraph {
    /// Builds a graph from features and labels; identities are row positions.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::DegenerateInput`] if there are no samples or the
    /// label count doesn't match the number of rows.
    pub fn new(x: &Matrix<f32>, y: &[usize]) -> Result<Self> {
        let identities: Vec<usize> = (0..x.n_rows()).collect();
        Self::with_identities(x, y, &identities)
    }

    /// Builds a graph whose nodes carry explicit dataset identities.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::DegenerateInput`] on empty input, non-finite
    /// features, or when labels or identities don't match the number of rows.
    pub fn with_identities(x: &Matrix<f32>, y: &[usize], identities: &[usize]) -> Result<Self> {
        let n = x.n_rows();
        if n == 0 {
            return Err(OpfError::degenerate("training set has zero samples"));
        }
        if y.len() != n {
            return Err(OpfError::DegenerateInput {
                reason: format!("{n} feature rows but {} labels", y.len()),
            });
        }
        if identities.len() != n {
            return Err(OpfError::DegenerateInput {
                reason: format!("{n} feature rows but {} identities", identities.len()),
            });
        }

        if let Some(pos) = x.as_slice().iter().position(|v| !v.is_finite()) {
            let (row, col) = (pos / x.n_cols(), pos % x.n_cols());
            return Err(OpfError::DegenerateInput {
                reason: format!("feature x[{row}][{col}] = {} is not finite", x.get(row, col)),
            });
        }

        let nodes = x
            .rows()
            .zip(y)
            .zip(identities)
            .map(|((row, &label), &identity)| Node::new(row.to_vec(), label, identity))
            .collect();

        Ok(Self {
            nodes,
            n_features: x.n_cols(),
            settled_order: Vec::with_capacity(n),
        })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Width of every feature vector.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// All nodes in input order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Node indices in the order they were settled (ascending cost).
    #[must_use]
    pub fn settled_order(&self) -> &[usize] {
        &self.settled_order
    }

    /// True once every node has been settled by the forest builder.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        !self.nodes.is_empty() && self.settled_order.len() == self.nodes.len()
    }

    /// Number of distinct ground-truth labels.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.nodes
            .iter()
            .map(Node::label)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Indices of the prototype nodes, ascending.
    #[must_use]
    pub fn prototypes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_prototype())
            .map(|(i, _)| i)
            .collect()
    }

    /// Walks predecessor links from `index` up to its root, inclusive.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn path_to_root(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(index), move |&i| self.nodes[i].predecessor)
    }

    /// Exports the trained state as a flat record per node, in input order.
    #[must_use]
    pub fn records(&self) -> Vec<ForestRecord> {
        self.nodes
            .iter()
            .map(|n| ForestRecord {
                identity: n.identity,
                label: n.label,
                predicted_label: n.predicted_label,
                cost: n.cost,
                predecessor: n.predecessor,
                prototype: n.is_prototype(),
            })
            .collect()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn settled_order_mut(&mut self) -> &mut Vec<usize> {
        &mut self.settled_order
    }

    /// Clears everything `fit` derives, keeping features, labels and identities.
    pub(crate) fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.settled_order.clear();
    }
}
