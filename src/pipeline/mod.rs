//! Sequential cleaning and feature-engineering pipeline
//!
//! Each stage is a pure transform taking an immutable input table and
//! returning a new table; schema changes happen only at stage boundaries.
//! The stages run strictly in order, each consuming the previous output.

pub mod dates;
pub mod encode;
pub mod engineer;
pub mod impute;
pub mod sanitize;

use crate::data;
use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

type Stage = fn(&DataFrame) -> Result<DataFrame>;

const STAGES: [(&str, Stage); 5] = [
    ("sanitize", sanitize::apply),
    ("date_features", dates::apply),
    ("impute", impute::apply),
    ("engineer", engineer::apply),
    ("encode", encode::apply),
];

/// Run the full transform sequence over a freshly loaded table, producing
/// the fully numeric table the trainer consumes.
pub fn run(df: &DataFrame) -> Result<DataFrame> {
    data::validate_schema(df)?;

    let mut current = df.clone();
    for (name, stage) in STAGES {
        current = stage(&current)?;
        debug!(
            stage = name,
            rows = current.height(),
            cols = current.width(),
            "stage complete"
        );
    }
    Ok(current)
}
