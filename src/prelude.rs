//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use opforest::prelude::*;
//! ```

pub use crate::classifier::{OptimumPathForest, Prediction, PruneReport};
pub use crate::distance::{Distance, DistanceMatrix, DistanceMetric};
pub use crate::error::{OpfError, Result};
pub use crate::forest::{MstBoundary, PrototypeSelector};
pub use crate::metrics::{accuracy, opf_accuracy};
pub use crate::observer::{FitObserver, NoopObserver, TracingObserver};
pub use crate::primitives::Matrix;
