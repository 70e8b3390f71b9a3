//! Dataset schema expectations and validation

pub mod loader;

use crate::error::{ClaimflowError, Result};
use polars::prelude::*;

/// Identifier column. Carries no predictive signal and never reaches the trainer.
pub const ID_COL: &str = "ID";
/// Binary target label.
pub const TARGET_COL: &str = "target";
/// Numeric age field.
pub const AGE_COL: &str = "Age";
/// Numeric policy-count field.
pub const POLICY_COUNT_COL: &str = "No_Pol";
/// Free-text gender field, normalized to {M, F, O}.
pub const GENDER_COL: &str = "Gender";

/// Date columns, all carrying the literal `Date` suffix.
pub const DATE_COLS: [&str; 3] = [
    "Policy Start Date",
    "Policy End Date",
    "First Transaction Date",
];

/// Categorical columns replaced by full-table occurrence counts.
pub const FREQUENCY_COLS: [&str; 4] = ["LGA_Name", "State", "Subject_Car_Make", "Subject_Car_Colour"];

/// Categorical columns integer-encoded with a stable label assignment.
pub const LABEL_COLS: [&str; 2] = ["ProductName", "Car_Category"];

/// Every column the pipeline requires before the first transform runs.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![ID_COL, TARGET_COL, AGE_COL, POLICY_COUNT_COL, GENDER_COL];
    cols.extend(DATE_COLS);
    cols.extend(FREQUENCY_COLS);
    cols.extend(LABEL_COLS);
    cols
}

/// Check that the loaded table carries the expected schema.
pub fn validate_schema(df: &DataFrame) -> Result<()> {
    for col in required_columns() {
        if df.column(col).is_err() {
            return Err(ClaimflowError::SchemaMismatch(col.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let df = df!("ID" => &["a", "b"], "Age" => &[30i64, 40]).unwrap();
        let err = validate_schema(&df).unwrap_err();
        assert!(matches!(err, ClaimflowError::SchemaMismatch(_)));
    }

    #[test]
    fn test_required_columns_include_dates_and_target() {
        let cols = required_columns();
        assert!(cols.contains(&"Policy End Date"));
        assert!(cols.contains(&"target"));
        assert_eq!(cols.len(), 14);
    }
}
