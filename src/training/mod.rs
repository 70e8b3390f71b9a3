//! Cross-validated training

pub mod cross_validation;
pub mod trainer;

pub use cross_validation::{stratified_k_fold, FoldSplit};
pub use trainer::{cross_validate, feature_matrix, CvReport};
