//! Hooks for watching training progress.
//!
//! The algorithms never log on their own. Callers that want visibility
//! inject a [`FitObserver`]; [`TracingObserver`] forwards every event to
//! the `tracing` ecosystem so that any installed subscriber picks it up.
//!
//! # Examples
//!
//! ```
//! use opforest::observer::TracingObserver;
//! use opforest::OptimumPathForest;
//!
//! let model = OptimumPathForest::new().with_observer(TracingObserver);
//! assert!(!model.is_fitted());
//! ```

use std::fmt;
use std::sync::Arc;

/// Receives training and prediction events. Every method defaults to a no-op.
///
/// `Arc<O>` is an observer too, so one observer can be shared by several
/// models and inspected afterwards.
pub trait FitObserver: fmt::Debug + Send + Sync {
    /// Prototype selection finished.
    fn on_prototypes(&self, _prototypes: &[usize], _n_nodes: usize) {}

    /// A node left the priority queue with its final cost.
    fn on_settled(&self, _index: usize, _cost: f32) {}

    /// The forest covers every node.
    fn on_fit_complete(&self, _n_nodes: usize, _n_prototypes: usize) {}

    /// A batch of samples is about to be classified.
    fn on_predict(&self, _n_samples: usize) {}

    /// One training/evaluation round of `learn` finished.
    fn on_learn_iteration(&self, _iteration: usize, _accuracy: f32) {}

    /// One pruning round finished.
    fn on_prune_step(&self, _removed: usize, _remaining: usize, _accuracy: f32) {}
}

impl<O: FitObserver + ?Sized> FitObserver for Arc<O> {
    fn on_prototypes(&self, prototypes: &[usize], n_nodes: usize) {
        (**self).on_prototypes(prototypes, n_nodes);
    }

    fn on_settled(&self, index: usize, cost: f32) {
        (**self).on_settled(index, cost);
    }

    fn on_fit_complete(&self, n_nodes: usize, n_prototypes: usize) {
        (**self).on_fit_complete(n_nodes, n_prototypes);
    }

    fn on_predict(&self, n_samples: usize) {
        (**self).on_predict(n_samples);
    }

    fn on_learn_iteration(&self, iteration: usize, accuracy: f32) {
        (**self).on_learn_iteration(iteration, accuracy);
    }

    fn on_prune_step(&self, removed: usize, remaining: usize, accuracy: f32) {
        (**self).on_prune_step(removed, remaining, accuracy);
    }
}

/// Observer that ignores everything. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FitObserver for NoopObserver {}

/// Observer that emits `tracing` events.
///
/// Per-node events go out at `trace` level, per-fit summaries at `debug`,
/// and learning/pruning progress at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FitObserver for TracingObserver {
    fn on_prototypes(&self, prototypes: &[usize], n_nodes: usize) {
        tracing::debug!(
            prototypes = prototypes.len(),
            nodes = n_nodes,
            "prototype selection finished"
        );
    }

    fn on_settled(&self, index: usize, cost: f32) {
        tracing::trace!(index, cost, "node settled");
    }

    fn on_fit_complete(&self, n_nodes: usize, n_prototypes: usize) {
        tracing::debug!(nodes = n_nodes, prototypes = n_prototypes, "forest built");
    }

    fn on_predict(&self, n_samples: usize) {
        tracing::debug!(samples = n_samples, "classifying samples");
    }

    fn on_learn_iteration(&self, iteration: usize, accuracy: f32) {
        tracing::info!(iteration, accuracy, "learning iteration");
    }

    fn on_prune_step(&self, removed: usize, remaining: usize, accuracy: f32) {
        tracing::info!(removed, remaining, accuracy, "pruning step");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::FitObserver;
    use std::sync::Mutex;

    /// Records event counts for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) settled: Mutex<Vec<(usize, f32)>>,
        pub(crate) prototypes: Mutex<Vec<usize>>,
        pub(crate) fits: Mutex<usize>,
        pub(crate) learn_rounds: Mutex<Vec<f32>>,
    }

    impl FitObserver for RecordingObserver {
        fn on_prototypes(&self, prototypes: &[usize], _n_nodes: usize) {
            self.prototypes
                .lock()
                .expect("observer lock")
                .extend_from_slice(prototypes);
        }

        fn on_settled(&self, index: usize, cost: f32) {
            self.settled.lock().expect("observer lock").push((index, cost));
        }

        fn on_fit_complete(&self, _n_nodes: usize, _n_prototypes: usize) {
            *self.fits.lock().expect("observer lock") += 1;
        }

        fn on_learn_iteration(&self, _iteration: usize, accuracy: f32) {
            self.learn_rounds.lock().expect("observer lock").push(accuracy);
        }
    }
}
