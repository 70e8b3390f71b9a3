//! Hyperparameter configuration for the gradient-boosted classifier

use serde::{Deserialize, Serialize};

/// Gradient-boosting hyperparameters.
///
/// These are the recognized configuration options of a run; everything else
/// about the pipeline is fixed policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// Balance of positive and negative weights, for unbalanced classes.
    pub scale_pos_weight: f64,
    /// Subsample ratio of columns for each tree level.
    pub colsample_bylevel: f64,
    /// Step size shrinkage used in update to prevent overfitting.
    pub eta: f64,
    /// Maximum depth of a tree.
    pub max_depth: usize,
    /// Number of trees to fit.
    pub n_estimators: usize,
    /// L1 regularization term on leaf weights.
    pub reg_alpha: f64,
    /// Boosting rounds without eval-set improvement before stopping early.
    pub early_stopping_rounds: usize,
    /// Seed for column subsampling. `None` draws from entropy.
    pub random_state: Option<u64>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            scale_pos_weight: 8.192_292_9,
            colsample_bylevel: 0.8,
            eta: 0.143_242,
            max_depth: 10,
            n_estimators: 800,
            reg_alpha: 0.8,
            early_stopping_rounds: 100,
            random_state: Some(42),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let params = ModelParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: ModelParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.n_estimators, 800);
        assert_eq!(back.max_depth, 10);
        assert!((back.eta - 0.143_242).abs() < 1e-12);
    }
}
