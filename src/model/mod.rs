//! Gradient-boosted model and evaluation metrics

pub mod metrics;
pub mod xgboost;

pub use xgboost::GradientBoostedClassifier;
