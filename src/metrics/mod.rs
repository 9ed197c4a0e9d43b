//! Evaluation metrics for the classifier.
//!
//! [`opf_accuracy`] is the class-balanced accuracy used by `learn` and
//! `prune`; it penalizes errors on small classes as much as on large ones.

use std::collections::BTreeMap;

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use opforest::metrics::accuracy;
///
/// let acc = accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]);
/// assert!((acc - 0.75).abs() < 1e-6);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

/// Class-balanced OPF accuracy.
///
/// For every class `c` present in `y_true` with `N_c` samples out of `N`:
///
/// - false-positive rate `FP_c / (N - N_c)` (0 when `N == N_c`)
/// - false-negative rate `FN_c / N_c`
///
/// accuracy = `1 - Σ_c (fp_rate_c + fn_rate_c) / (2 * C)`
///
/// Predictions of labels absent from `y_true` only count as false negatives
/// of the true class.
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use opforest::metrics::opf_accuracy;
///
/// let acc = opf_accuracy(&[0, 1, 1, 1], &[0, 0, 1, 1]);
/// assert!((acc - 0.75).abs() < 1e-6);
/// ```
#[must_use]
pub fn opf_accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    // class -> (count, false positives, false negatives)
    let mut stats: BTreeMap<usize, (usize, usize, usize)> = BTreeMap::new();
    for &t in y_true {
        stats.entry(t).or_default().0 += 1;
    }
    for (&p, &t) in y_pred.iter().zip(y_true) {
        if p == t {
            continue;
        }
        if let Some(entry) = stats.get_mut(&p) {
            entry.1 += 1;
        }
        if let Some(entry) = stats.get_mut(&t) {
            entry.2 += 1;
        }
    }

    let total = y_true.len();
    let error: f32 = stats
        .values()
        .map(|&(count, fp, fn_)| {
            let others = total - count;
            let fp_rate = if others == 0 {
                0.0
            } else {
                fp as f32 / others as f32
            };
            fp_rate + fn_ as f32 / count as f32
        })
        .sum();

    1.0 - error / (2.0 * stats.len() as f32)
}
