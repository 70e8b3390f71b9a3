//! Stratified k-fold splitting

use crate::error::{ClaimflowError, Result};
use ndarray::Array1;
use std::collections::BTreeMap;

/// One train/held-out split.
#[derive(Debug, Clone)]
pub struct FoldSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Deterministic label-stratified k-fold split.
///
/// Rows of each class are taken in row order and dealt round-robin across
/// folds, so every fold approximately preserves the global label ratio and
/// the same input always yields the same partition. The assignment is
/// recomputed once per run and never persisted.
pub fn stratified_k_fold(y: &Array1<f64>, n_splits: usize) -> Result<Vec<FoldSplit>> {
    if n_splits < 2 {
        return Err(ClaimflowError::ValidationError(
            "n_splits must be at least 2".to_string(),
        ));
    }
    if y.len() < n_splits {
        return Err(ClaimflowError::ValidationError(format!(
            "n_samples ({}) must be >= n_splits ({})",
            y.len(),
            n_splits
        )));
    }

    // BTreeMap keeps class iteration order stable across runs.
    let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, &val) in y.iter().enumerate() {
        class_indices.entry(val.round() as i64).or_default().push(idx);
    }

    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); n_splits];
    for indices in class_indices.values() {
        for (i, &idx) in indices.iter().enumerate() {
            folds[i % n_splits].push(idx);
        }
    }

    let mut splits = Vec::with_capacity(n_splits);
    for fold_idx in 0..n_splits {
        let test_indices = folds[fold_idx].clone();
        let train_indices: Vec<usize> = folds
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != fold_idx)
            .flat_map(|(_, f)| f.iter().copied())
            .collect();

        splits.push(FoldSplit {
            train_indices,
            test_indices,
            fold_idx,
        });
    }

    Ok(splits)
}
