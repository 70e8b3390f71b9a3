//! Cross-validated training and evaluation loop
//!
//! For each fold: select -> fit -> predict -> score, strictly sequential.
//! The engineered table is read-only throughout; the fitted model is owned
//! by its fold iteration and dropped after scoring.

use crate::config::ModelParams;
use crate::data::TARGET_COL;
use crate::error::{ClaimflowError, Result};
use crate::model::metrics::roc_auc;
use crate::model::GradientBoostedClassifier;
use crate::training::cross_validation::stratified_k_fold;
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cross-validation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvReport {
    /// ROC-AUC per fold, in fold order.
    pub fold_scores: Vec<f64>,
    /// Unweighted mean of the fold scores — the single output of the run.
    pub mean_score: f64,
    /// Standard deviation of the fold scores.
    pub std_score: f64,
    pub n_folds: usize,
}

impl CvReport {
    pub fn from_scores(fold_scores: Vec<f64>) -> Self {
        let n_folds = fold_scores.len();
        let mean_score = fold_scores.iter().sum::<f64>() / n_folds as f64;
        let variance = fold_scores
            .iter()
            .map(|s| (s - mean_score).powi(2))
            .sum::<f64>()
            / n_folds as f64;

        Self {
            fold_scores,
            mean_score,
            std_score: variance.sqrt(),
            n_folds,
        }
    }
}

/// Split the engineered table into a feature matrix and label vector.
///
/// Every non-target column becomes a feature; by this point all of them are
/// numeric and fully imputed, anything else is a pipeline defect.
pub fn feature_matrix(df: &DataFrame) -> Result<(Array2<f64>, Array1<f64>, Vec<String>)> {
    let target = df
        .column(TARGET_COL)
        .map_err(|_| ClaimflowError::SchemaMismatch(TARGET_COL.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let y: Array1<f64> = target
        .f64()?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| {
                ClaimflowError::ValidationError("row with missing target label".to_string())
            })
        })
        .collect::<Result<Vec<f64>>>()?
        .into();

    let feature_names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .filter(|n| n != TARGET_COL)
        .collect();

    let n_rows = df.height();
    let mut x = Array2::zeros((n_rows, feature_names.len()));
    for (j, name) in feature_names.iter().enumerate() {
        let series = df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|_| {
                ClaimflowError::DataError(format!("non-numeric feature column '{name}'"))
            })?;
        for (i, v) in series.f64()?.into_iter().enumerate() {
            x[[i, j]] = v.ok_or_else(|| {
                ClaimflowError::DataError(format!("missing value survived into feature '{name}'"))
            })?;
        }
    }

    Ok((x, y, feature_names))
}

/// Stratified k-fold cross-validation of the gradient-boosted classifier.
///
/// Each fold trains with the held-out partition as the early-stopping eval
/// set, predicts hard labels on it, and scores ROC-AUC. A held-out partition
/// with a single label class aborts the run with `DegenerateFold`.
pub fn cross_validate(df: &DataFrame, params: &ModelParams, n_folds: usize) -> Result<CvReport> {
    let (x, y, feature_names) = feature_matrix(df)?;
    info!(
        rows = x.nrows(),
        features = feature_names.len(),
        folds = n_folds,
        "starting cross-validation"
    );

    let splits = stratified_k_fold(&y, n_folds)?;
    let mut scores = Vec::with_capacity(splits.len());

    for split in &splits {
        let xtrain = x.select(Axis(0), &split.train_indices);
        let ytrain = y.select(Axis(0), &split.train_indices);
        let xval = x.select(Axis(0), &split.test_indices);
        let yval = y.select(Axis(0), &split.test_indices);

        // ROC-AUC is undefined when the held-out labels are all one class.
        let held_out_pos = yval.iter().filter(|&&v| v > 0.5).count();
        if held_out_pos == 0 || held_out_pos == yval.len() {
            return Err(ClaimflowError::DegenerateFold {
                fold: split.fold_idx,
            });
        }

        let mut model = GradientBoostedClassifier::new(params.clone());
        model.fit(&xtrain, &ytrain, Some((&xval, &yval)))?;
        let pred = model.predict(&xval)?;
        let score = roc_auc(&yval, &pred)?;

        info!(fold = split.fold_idx, auc = score, trees = model.n_trees(), "fold scored");
        scores.push(score);
        // model drops here; nothing carries over to the next fold
    }

    Ok(CvReport::from_scores(scores))
}
