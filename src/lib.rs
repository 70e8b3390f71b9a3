//! claimflow - cross-validated gradient-boosted classification of insurance claims
//!
//! Ingests a tabular insurance-claims dataset, applies a fixed sequence of
//! cleaning and feature-engineering transforms, and evaluates a
//! gradient-boosted binary classifier with stratified k-fold
//! cross-validation, reporting the mean ROC-AUC.
//!
//! # Modules
//!
//! - [`data`] - dataset loading and schema validation
//! - [`pipeline`] - pure cleaning and feature-engineering transforms
//! - [`model`] - gradient-boosted trees and evaluation metrics
//! - [`training`] - stratified cross-validation driver

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod training;

pub use config::ModelParams;
pub use error::{ClaimflowError, Result};
