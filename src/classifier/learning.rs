//! Training-set refinement: `learn` and `prune`.
//!
//! Both work on a training split and an evaluation split of the same
//! dataset. Sample identities number the training rows first and the
//! evaluation rows after them, so a pre-computed matrix must cover both.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{OptimumPathForest, Prediction};
use crate::error::{OpfError, Result};
use crate::forest::PrototypeSelector;
use crate::graph::TrainingGraph;
use crate::metrics::opf_accuracy;
use crate::primitives::Matrix;

/// Summary of a `prune` run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PruneReport {
    /// Training nodes before pruning.
    pub initial_nodes: usize,
    /// Training nodes kept in the final forest.
    pub final_nodes: usize,
    /// OPF accuracy of the final forest on its evaluation set.
    pub accuracy: f32,
}

/// Rows of one side of a train/evaluation split, with their identities.
#[derive(Debug, Clone)]
struct Split {
    x: Matrix<f32>,
    y: Vec<usize>,
    ids: Vec<usize>,
}

impl Split {
    fn new(x: &Matrix<f32>, y: &[usize], first_id: usize) -> Result<Self> {
        if y.len() != x.n_rows() {
            return Err(OpfError::dimension_mismatch("n_samples", x.n_rows(), y.len()));
        }
        Ok(Self {
            x: x.clone(),
            y: y.to_vec(),
            ids: (first_id..first_id + y.len()).collect(),
        })
    }

    fn len(&self) -> usize {
        self.y.len()
    }

    fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    fn n_classes(&self) -> usize {
        self.y.iter().collect::<BTreeSet<_>>().len()
    }

    fn swap(&mut self, i: usize, other: &mut Self, j: usize) {
        self.x.swap_rows_with(i, &mut other.x, j);
        std::mem::swap(&mut self.y[i], &mut other.y[j]);
        std::mem::swap(&mut self.ids[i], &mut other.ids[j]);
    }

    fn select(&self, rows: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(rows),
            y: rows.iter().map(|&i| self.y[i]).collect(),
            ids: rows.iter().map(|&i| self.ids[i]).collect(),
        }
    }

    fn append(&mut self, other: &Self) -> Result<()> {
        let mut data = self.x.as_slice().to_vec();
        data.extend_from_slice(other.x.as_slice());
        self.x = Matrix::from_vec(self.len() + other.len(), self.x.n_cols(), data)?;
        self.y.extend_from_slice(&other.y);
        self.ids.extend_from_slice(&other.ids);
        Ok(())
    }
}

fn splits(
    x_train: &Matrix<f32>,
    y_train: &[usize],
    x_eval: &Matrix<f32>,
    y_eval: &[usize],
) -> Result<(Split, Split)> {
    if x_eval.n_cols() != x_train.n_cols() {
        return Err(OpfError::dimension_mismatch(
            "n_features",
            x_train.n_cols(),
            x_eval.n_cols(),
        ));
    }
    let train = Split::new(x_train, y_train, 0)?;
    let eval = Split::new(x_eval, y_eval, train.len())?;
    if eval.is_empty() {
        return Err(OpfError::degenerate("evaluation set has zero samples"));
    }
    Ok((train, eval))
}

impl<S: PrototypeSelector> OptimumPathForest<S> {
    /// Improves the training set by trading it against an evaluation set.
    ///
    /// Each round fits on the training split, classifies the evaluation
    /// split and swaps every misclassified evaluation sample with a random
    /// non-prototype training sample. Rounds stop after `max_iter` or when
    /// the accuracy changes by less than `tolerance`. The classifier keeps
    /// the forest with the best OPF accuracy, which is returned.
    ///
    /// # Errors
    ///
    /// Returns fit/predict errors, a degenerate-input error for an empty
    /// evaluation set and an invalid-hyperparameter error for `max_iter == 0`.
    /// On error the previously trained forest is kept.
    pub fn learn(
        &mut self,
        x_train: &Matrix<f32>,
        y_train: &[usize],
        x_eval: &Matrix<f32>,
        y_eval: &[usize],
    ) -> Result<f32> {
        let (mut train, mut eval) = splits(x_train, y_train, x_eval, y_eval)?;
        self.learn_splits(&mut train, &mut eval)
    }

    /// Shrinks the training set while accuracy stays within `max_loss`.
    ///
    /// After an initial `learn`, training nodes that lie on no optimum path
    /// conquering an evaluation sample are moved to the evaluation set and
    /// the forest is learned again. Pruning stops when every node is
    /// relevant or the accuracy drops more than `max_loss` below the
    /// initial accuracy (that last round is discarded).
    ///
    /// # Errors
    ///
    /// Same as [`learn`](Self::learn), plus an invalid-hyperparameter error
    /// if `max_loss` is outside `[0, 1]`.
    pub fn prune(
        &mut self,
        x_train: &Matrix<f32>,
        y_train: &[usize],
        x_eval: &Matrix<f32>,
        y_eval: &[usize],
        max_loss: f32,
    ) -> Result<PruneReport> {
        if !(0.0..=1.0).contains(&max_loss) {
            return Err(OpfError::InvalidHyperparameter {
                param: "max_loss".to_string(),
                value: max_loss.to_string(),
                constraint: "in [0, 1]".to_string(),
            });
        }
        let (mut train, mut eval) = splits(x_train, y_train, x_eval, y_eval)?;
        let previous = self.graph.clone();
        let result = self.prune_splits(&mut train, &mut eval, max_loss);
        if result.is_err() {
            self.graph = previous;
        }
        result
    }

    fn learn_splits(&mut self, train: &mut Split, eval: &mut Split) -> Result<f32> {
        if self.max_iter == 0 {
            return Err(OpfError::InvalidHyperparameter {
                param: "max_iter".to_string(),
                value: "0".to_string(),
                constraint: ">0".to_string(),
            });
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(OpfError::InvalidHyperparameter {
                param: "tolerance".to_string(),
                value: self.tolerance.to_string(),
                constraint: ">=0".to_string(),
            });
        }
        let previous = self.graph.clone();
        let result = self.learn_rounds(train, eval);
        if result.is_err() {
            self.graph = previous;
        }
        result
    }

    fn learn_rounds(&mut self, train: &mut Split, eval: &mut Split) -> Result<f32> {
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut best: Option<(f32, TrainingGraph, Split, Split)> = None;
        let mut previous_accuracy = 0.0_f32;

        for iteration in 0..self.max_iter {
            self.fit_indexed(&train.x, &train.y, &train.ids)?;
            let labels: Vec<usize> = self
                .predict_split(eval)?
                .into_iter()
                .map(|p| p.label)
                .collect();
            let accuracy = opf_accuracy(&labels, &eval.y);
            self.observer.on_learn_iteration(iteration, accuracy);

            if best
                .as_ref()
                .map_or(true, |(best_accuracy, ..)| accuracy > *best_accuracy)
            {
                let graph = self.fitted()?.clone();
                best = Some((accuracy, graph, train.clone(), eval.clone()));
            }

            let graph = self.fitted()?;
            let mut free: Vec<usize> = (0..train.len())
                .filter(|&i| !graph.node(i).is_prototype())
                .collect();
            let misclassified: Vec<usize> = labels
                .iter()
                .zip(&eval.y)
                .enumerate()
                .filter(|(_, (pred, truth))| pred != truth)
                .map(|(i, _)| i)
                .collect();
            for e in misclassified {
                if free.is_empty() {
                    break;
                }
                let j = free.swap_remove(rng.gen_range(0..free.len()));
                train.swap(j, eval, e);
            }

            let delta = (accuracy - previous_accuracy).abs();
            previous_accuracy = accuracy;
            if delta < self.tolerance {
                break;
            }
        }

        let (accuracy, graph, best_train, best_eval) = best.ok_or(OpfError::NotFitted)?;
        self.graph = Some(graph);
        *train = best_train;
        *eval = best_eval;
        Ok(accuracy)
    }

    fn prune_splits(
        &mut self,
        train: &mut Split,
        eval: &mut Split,
        max_loss: f32,
    ) -> Result<PruneReport> {
        let initial_nodes = train.len();
        let initial_accuracy = self.learn_splits(train, eval)?;
        let mut accuracy = initial_accuracy;

        loop {
            let graph = self.fitted()?;
            let mut relevant = vec![false; graph.len()];
            for prediction in self.predict_split(eval)? {
                for i in graph.path_to_root(prediction.conqueror) {
                    if relevant[i] {
                        break;
                    }
                    relevant[i] = true;
                }
            }

            let (kept, dropped): (Vec<usize>, Vec<usize>) =
                (0..relevant.len()).partition(|&i| relevant[i]);
            if dropped.is_empty() {
                break;
            }
            let mut next_train = train.select(&kept);
            if next_train.n_classes() < 2 {
                break;
            }
            let mut next_eval = eval.clone();
            next_eval.append(&train.select(&dropped))?;

            let snapshot = self.graph.clone();
            let next_accuracy = match self.learn_splits(&mut next_train, &mut next_eval) {
                Ok(a) => a,
                // A round that leaves a single class behind ends pruning.
                Err(OpfError::DegenerateInput { .. }) => break,
                Err(e) => return Err(e),
            };
            if initial_accuracy - next_accuracy > max_loss {
                self.graph = snapshot;
                break;
            }

            *train = next_train;
            *eval = next_eval;
            accuracy = next_accuracy;
            self.observer.on_prune_step(dropped.len(), train.len(), accuracy);
        }

        Ok(PruneReport {
            initial_nodes,
            final_nodes: train.len(),
            accuracy,
        })
    }

    fn predict_split(&self, split: &Split) -> Result<Vec<Prediction>> {
        if self.distances.is_some() {
            self.predict_indexed_with_conquerors(&split.ids)
        } else {
            self.predict_with_conquerors(&split.x)
        }
    }
}
