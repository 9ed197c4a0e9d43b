//! Training graph nodes.

use serde::{Deserialize, Serialize};

/// Whether a node roots a tree of the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Ordinary sample, conquered through a path.
    #[default]
    Standard,
    /// Tree root chosen by the prototype selector.
    Prototype,
}

/// One training sample and the forest fields derived for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) features: Vec<f32>,
    pub(crate) label: usize,
    pub(crate) predicted_label: Option<usize>,
    pub(crate) cost: f32,
    pub(crate) predecessor: Option<usize>,
    pub(crate) status: NodeStatus,
    pub(crate) identity: usize,
}

impl Node {
    /// Creates an unsettled standard node.
    #[must_use]
    pub fn new(features: Vec<f32>, label: usize, identity: usize) -> Self {
        Self {
            features,
            label,
            predicted_label: None,
            cost: f32::INFINITY,
            predecessor: None,
            status: NodeStatus::Standard,
            identity,
        }
    }

    /// Feature vector.
    #[must_use]
    pub fn features(&self) -> &[f32] {
        &self.features
    }

    /// Ground-truth label.
    #[must_use]
    pub fn label(&self) -> usize {
        self.label
    }

    /// Label inherited from the root of this node's tree, once conquered.
    #[must_use]
    pub fn predicted_label(&self) -> Option<usize> {
        self.predicted_label
    }

    /// Finalized path cost (`+inf` until settled).
    #[must_use]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Index of the node this one was conquered by; `None` for roots.
    #[must_use]
    pub fn predecessor(&self) -> Option<usize> {
        self.predecessor
    }

    /// Root or standard node.
    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// True for tree roots.
    #[must_use]
    pub fn is_prototype(&self) -> bool {
        self.status == NodeStatus::Prototype
    }

    /// Position of the sample in the original dataset.
    #[must_use]
    pub fn identity(&self) -> usize {
        self.identity
    }

    pub(crate) fn reset(&mut self) {
        self.predicted_label = None;
        self.cost = f32::INFINITY;
        self.predecessor = None;
        self.status = NodeStatus::Standard;
    }
}
