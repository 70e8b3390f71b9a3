//! Classifier evaluation metrics

use crate::error::{ClaimflowError, Result};
use ndarray::Array1;
use std::cmp::Ordering;

/// ROC-AUC via the rank-sum (Mann-Whitney) formulation.
///
/// Midranks handle ties, which matters here because fold scoring runs on
/// hard 0/1 predictions. Errors when `y_true` contains a single class, the
/// metric is undefined in that case.
pub fn roc_auc(y_true: &Array1<f64>, y_score: &Array1<f64>) -> Result<f64> {
    if y_true.len() != y_score.len() {
        return Err(ClaimflowError::ValidationError(format!(
            "label/score length mismatch: {} vs {}",
            y_true.len(),
            y_score.len()
        )));
    }

    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&t| t > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ClaimflowError::ValidationError(
            "ROC-AUC requires both label classes".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        y_score[a]
            .partial_cmp(&y_score[b])
            .unwrap_or(Ordering::Equal)
    });

    // Midranks over tied score groups, 1-based.
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n
            && y_score[order[j + 1]]
                .partial_cmp(&y_score[order[i]])
                .unwrap_or(Ordering::Equal)
                == Ordering::Equal
        {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = midrank;
        }
        i = j + 1;
    }

    let rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&t, _)| t > 0.5)
        .map(|(_, &r)| r)
        .sum();

    let auc = (rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64;
    Ok(auc)
}
