//! Optimum-path forest construction.
//!
//! Training is split into two capabilities:
//!
//! - a [`PrototypeSelector`] picks the tree roots and the label each root
//!   propagates ([`MstBoundary`] for the supervised classifier);
//! - [`build_forest`] grows every tree at once with a minimax variant of
//!   Dijkstra's algorithm, where a path costs as much as its heaviest arc.
//!
//! Arc weights come from [`ArcWeights`], either computed through a
//! [`Distance`] or looked up in a pre-computed [`DistanceMatrix`].

use crate::distance::{Distance, DistanceMatrix};
use crate::graph::Node;

mod builder;
mod prototype;

pub use builder::build_forest;
pub use prototype::{MstBoundary, PrototypeSelector};

/// Source of arc weights between two nodes.
#[derive(Debug, Clone, Copy)]
pub enum ArcWeights<'a, D> {
    /// Compute the distance between feature vectors.
    Computed(&'a D),
    /// Look the distance up by node identity.
    Precomputed(&'a DistanceMatrix),
}

impl<D: Distance> ArcWeights<'_, D> {
    /// Weight of the arc between `a` and `b`.
    #[must_use]
    pub fn between(&self, a: &Node, b: &Node) -> f32 {
        match self {
            ArcWeights::Computed(metric) => metric.distance(a.features(), b.features()),
            ArcWeights::Precomputed(matrix) => matrix.get(a.identity(), b.identity()),
        }
    }
}


#[cfg(test)]
#[path = "tests_forest_contract.rs"]
mod tests_forest_contract;
