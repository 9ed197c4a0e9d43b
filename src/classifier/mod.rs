//! Supervised optimum-path forest classifier.
//!
//! # Example
//!
//! ```
//! use opforest::prelude::*;
//!
//! let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1 matrix");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut opf = OptimumPathForest::new();
//! opf.fit(&x, &y).expect("two classes");
//!
//! let test = Matrix::from_vec(1, 1, vec![0.5]).expect("1x1 matrix");
//! assert_eq!(opf.predict(&test).expect("fitted"), vec![0]);
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::distance::{Distance, DistanceMatrix, DistanceMetric};
use crate::error::{OpfError, Result};
use crate::forest::{build_forest, ArcWeights, MstBoundary, PrototypeSelector};
use crate::graph::{ForestRecord, Node, TrainingGraph};
use crate::metrics::accuracy;
use crate::observer::{FitObserver, NoopObserver};
use crate::primitives::Matrix;

mod learning;

pub use learning::PruneReport;

/// Outcome of classifying one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Label handed down by the conquering node.
    pub label: usize,
    /// Index (into the training graph) of the conquering node.
    pub conqueror: usize,
    /// Minimax cost of the path that reaches the sample.
    pub cost: f32,
}

fn default_observer() -> Arc<dyn FitObserver> {
    Arc::new(NoopObserver)
}

/// Optimum-Path Forest classifier.
///
/// Training builds a forest over the samples rooted at class-boundary
/// prototypes; a new sample receives the label of the training node that
/// reaches it with the cheapest minimax path.
///
/// `fit` needs exclusive access; once trained, `predict` only reads, so a
/// shared reference can be used from many threads at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimumPathForest<S = MstBoundary> {
    /// Metric for arc weights when no matrix is configured
    metric: DistanceMetric,
    /// Pre-computed distances indexed by sample identity
    distances: Option<DistanceMatrix>,
    /// Root selection strategy
    selector: S,
    /// Maximum rounds of `learn`
    max_iter: usize,
    /// Accuracy delta under which `learn` stops
    tolerance: f32,
    /// Seed for the sample swaps of `learn`
    random_state: Option<u64>,
    /// Trained forest (None until fit succeeds)
    graph: Option<TrainingGraph>,
    #[serde(skip, default = "default_observer")]
    observer: Arc<dyn FitObserver>,
}

impl OptimumPathForest<MstBoundary> {
    /// Creates an unfitted classifier using Euclidean distance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metric: DistanceMetric::Euclidean,
            distances: None,
            selector: MstBoundary,
            max_iter: 10,
            tolerance: 1e-4,
            random_state: None,
            graph: None,
            observer: default_observer(),
        }
    }
}

impl Default for OptimumPathForest<MstBoundary> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PrototypeSelector> OptimumPathForest<S> {
    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Switches to pre-computed distances looked up by sample identity.
    #[must_use]
    pub fn with_distances(mut self, distances: DistanceMatrix) -> Self {
        self.distances = Some(distances);
        self
    }

    /// Replaces the prototype selection strategy.
    #[must_use]
    pub fn with_selector<T: PrototypeSelector>(self, selector: T) -> OptimumPathForest<T> {
        OptimumPathForest {
            metric: self.metric,
            distances: self.distances,
            selector,
            max_iter: self.max_iter,
            tolerance: self.tolerance,
            random_state: self.random_state,
            graph: None,
            observer: self.observer,
        }
    }

    /// Installs an observer for training and prediction events.
    #[must_use]
    pub fn with_observer<O: FitObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Sets the maximum number of `learn` rounds.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the accuracy delta under which `learn` stops early.
    #[must_use]
    pub fn with_tolerance(mut self, tol: f32) -> Self {
        self.tolerance = tol;
        self
    }

    /// Seeds the sample swaps performed by `learn`.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Distance metric in use.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Pre-computed distances, if enabled.
    #[must_use]
    pub fn distances(&self) -> Option<&DistanceMatrix> {
        self.distances.as_ref()
    }

    /// Trained forest, if any.
    #[must_use]
    pub fn graph(&self) -> Option<&TrainingGraph> {
        self.graph.as_ref()
    }

    /// True once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.graph.as_ref().is_some_and(TrainingGraph::is_trained)
    }

    /// Indices of the prototypes of the trained forest.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::NotFitted`] before a successful `fit`.
    pub fn prototypes(&self) -> Result<Vec<usize>> {
        Ok(self.fitted()?.prototypes())
    }

    /// Flat per-node export of the trained forest.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::NotFitted`] before a successful `fit`.
    pub fn records(&self) -> Result<Vec<ForestRecord>> {
        Ok(self.fitted()?.records())
    }

    /// Trains the forest. Sample identities are the row positions of `x`.
    ///
    /// On error the previously trained forest (if any) is kept.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::DegenerateInput`] for empty input, mismatched
    /// lengths or fewer than two classes.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let identities: Vec<usize> = (0..x.n_rows()).collect();
        self.fit_indexed(x, y, &identities)
    }

    /// Trains the forest with explicit dataset identities per row.
    ///
    /// Identities key the pre-computed distance lookups.
    ///
    /// # Errors
    ///
    /// Same as [`fit`](Self::fit), plus [`OpfError::DimensionMismatch`] if an
    /// identity falls outside the pre-computed matrix.
    pub fn fit_indexed(&mut self, x: &Matrix<f32>, y: &[usize], identities: &[usize]) -> Result<()> {
        let mut graph = TrainingGraph::with_identities(x, y, identities)?;
        if let Some(matrix) = &self.distances {
            matrix.check_identities(identities)?;
        }
        build_forest(
            &mut graph,
            &self.selector,
            &self.weights(),
            self.observer.as_ref(),
        )?;
        self.graph = Some(graph);
        Ok(())
    }

    /// Predicts a label for every row of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::NotFitted`] before `fit`, a dimension mismatch for
    /// the wrong feature width, and an invalid-hyperparameter error for a
    /// non-finite feature or in pre-computed mode (use
    /// [`predict_indexed`](Self::predict_indexed)).
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self
            .predict_with_conquerors(x)?
            .into_iter()
            .map(|p| p.label)
            .collect())
    }

    /// Like [`predict`](Self::predict), also reporting the conquering node
    /// and path cost of every sample.
    ///
    /// # Errors
    ///
    /// See [`predict`](Self::predict).
    pub fn predict_with_conquerors(&self, x: &Matrix<f32>) -> Result<Vec<Prediction>> {
        let graph = self.fitted()?;
        if self.distances.is_some() {
            return Err(OpfError::InvalidHyperparameter {
                param: "distances".to_string(),
                value: "pre-computed".to_string(),
                constraint: "predict_indexed() with sample identities".to_string(),
            });
        }
        if x.n_cols() != graph.n_features() {
            return Err(OpfError::dimension_mismatch(
                "n_features",
                graph.n_features(),
                x.n_cols(),
            ));
        }
        if let Some(pos) = x.as_slice().iter().position(|v| !v.is_finite()) {
            let (row, col) = (pos / x.n_cols(), pos % x.n_cols());
            return Err(OpfError::InvalidHyperparameter {
                param: format!("x[{row}][{col}]"),
                value: x.get(row, col).to_string(),
                constraint: "finite feature value".to_string(),
            });
        }
        self.observer.on_predict(x.n_rows());

        let metric = self.metric;
        let classify_row = |i: usize| {
            let sample = x.row(i);
            classify(graph, |node| metric.distance(node.features(), sample))
        };

        #[cfg(feature = "parallel")]
        let predictions = (0..x.n_rows()).into_par_iter().map(classify_row).collect();
        #[cfg(not(feature = "parallel"))]
        let predictions = (0..x.n_rows()).map(classify_row).collect();

        predictions
    }

    /// Predicts labels for samples given by identity in the pre-computed matrix.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::NotFitted`] before `fit`, an invalid-hyperparameter
    /// error when no matrix is configured, and a dimension mismatch for
    /// identities outside the matrix.
    pub fn predict_indexed(&self, identities: &[usize]) -> Result<Vec<usize>> {
        Ok(self
            .predict_indexed_with_conquerors(identities)?
            .into_iter()
            .map(|p| p.label)
            .collect())
    }

    /// Like [`predict_indexed`](Self::predict_indexed), with conquerors and costs.
    ///
    /// # Errors
    ///
    /// See [`predict_indexed`](Self::predict_indexed).
    pub fn predict_indexed_with_conquerors(&self, identities: &[usize]) -> Result<Vec<Prediction>> {
        let graph = self.fitted()?;
        let matrix = self
            .distances
            .as_ref()
            .ok_or_else(|| OpfError::InvalidHyperparameter {
                param: "distances".to_string(),
                value: "none".to_string(),
                constraint: "a pre-computed DistanceMatrix (with_distances)".to_string(),
            })?;
        matrix.check_identities(identities)?;
        self.observer.on_predict(identities.len());

        identities
            .iter()
            .map(|&id| classify(graph, |node| matrix.get(node.identity(), id)))
            .collect()
    }

    /// Plain accuracy of `predict(x)` against `y`.
    ///
    /// # Errors
    ///
    /// Returns prediction errors, a dimension mismatch if `y` doesn't match
    /// the rows of `x`, and a degenerate-input error for an empty set.
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        if y.len() != x.n_rows() {
            return Err(OpfError::dimension_mismatch("n_samples", x.n_rows(), y.len()));
        }
        if y.is_empty() {
            return Err(OpfError::degenerate("cannot score an empty set"));
        }
        let predictions = self.predict(x)?;
        Ok(accuracy(&predictions, y))
    }

    /// Saves configuration and trained forest to a binary file using bincode.
    ///
    /// The observer is not persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>
    where
        S: Serialize,
    {
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a classifier written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        S: DeserializeOwned,
    {
        let bytes = fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn fitted(&self) -> Result<&TrainingGraph> {
        self.graph
            .as_ref()
            .filter(|g| g.is_trained())
            .ok_or(OpfError::NotFitted)
    }

    fn weights(&self) -> ArcWeights<'_, DistanceMetric> {
        match &self.distances {
            Some(matrix) => ArcWeights::Precomputed(matrix),
            None => ArcWeights::Computed(&self.metric),
        }
    }
}

/// Finds the training node offering the cheapest path to a sample.
///
/// Nodes are visited in settled order, so the scan can stop as soon as a
/// node's own cost reaches the best offer; ties keep the earliest node.
fn classify<F>(graph: &TrainingGraph, distance_to_sample: F) -> Result<Prediction>
where
    F: Fn(&Node) -> f32,
{
    let mut best: Option<Prediction> = None;
    for &i in graph.settled_order() {
        let node = graph.node(i);
        if best.is_some_and(|b| node.cost() >= b.cost) {
            break;
        }
        let cost = node.cost().max(distance_to_sample(node));
        if best.map_or(true, |b| cost < b.cost) {
            best = Some(Prediction {
                label: node.predicted_label().unwrap_or(node.label()),
                conqueror: i,
                cost,
            });
        }
    }
    best.ok_or(OpfError::NotFitted)
}


#[cfg(test)]
#[path = "tests_opf_contract.rs"]
mod tests_opf_contract;
