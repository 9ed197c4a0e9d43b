//! Opforest: supervised Optimum-Path Forest classification in pure Rust.
//!
//! Training treats every sample as a node of a complete graph weighted by
//! feature distance. Samples on the class boundary (found through the
//! minimum spanning tree) become prototypes, and a minimax shortest-path
//! search grows one tree per prototype. A new sample is labeled by the
//! training node that reaches it with the cheapest path.
//!
//! # Quick Start
//!
//! ```
//! use opforest::prelude::*;
//!
//! let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1 matrix");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut opf = OptimumPathForest::new();
//! opf.fit(&x, &y).expect("two classes");
//! assert_eq!(opf.prototypes().expect("fitted"), vec![1, 2]);
//!
//! let test = Matrix::from_vec(2, 1, vec![0.5, 10.4]).expect("2x1 matrix");
//! assert_eq!(opf.predict(&test).expect("fitted"), vec![0, 1]);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major feature matrix
//! - [`distance`]: Arc weight metrics and pre-computed distance matrices
//! - [`heap`]: Indexed min-priority queue with node colors
//! - [`graph`]: Training nodes and the trained forest
//! - [`forest`]: Prototype selection and forest construction
//! - [`classifier`]: The `OptimumPathForest` estimator (fit, predict, learn, prune)
//! - [`metrics`]: Plain and class-balanced accuracy
//! - [`observer`]: Training/prediction event hooks (tracing-backed observer included)

pub mod classifier;
pub mod distance;
pub mod error;
pub mod forest;
pub mod graph;
pub mod heap;
pub mod metrics;
pub mod observer;
pub mod prelude;
pub mod primitives;

pub use classifier::{OptimumPathForest, Prediction, PruneReport};
pub use error::{OpfError, Result};
pub use primitives::Matrix;
