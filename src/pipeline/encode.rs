//! Categorical encoding and final schema cleanup
//!
//! Integer-encodes the two remaining high-level categoricals, derives the
//! policy-count interaction feature, drops the identifier and the consumed
//! colour column, then one-hot expands whatever string columns remain. After
//! this stage every column is numeric.

use crate::data::{ID_COL, LABEL_COLS, POLICY_COUNT_COL};
use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;

const PRODUCT_COL: &str = "ProductName";
const COLOUR_COL: &str = "Subject_Car_Colour";
const INTERACTION_COL: &str = "no_pol_prod_name";

pub fn apply(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();

    for col in LABEL_COLS {
        let encoded = label_encode(result.column(col)?.as_materialized_series())?;
        result.with_column(encoded)?;
    }

    // Engineered interaction: policy count plus the encoded product name.
    // Exactly this arithmetic combination, not a generic interaction.
    let interaction = interaction_feature(&result)?;
    result.with_column(interaction)?;

    result = result.drop(ID_COL)?;
    // The raw colour column was already consumed by frequency encoding.
    if result.column(COLOUR_COL).is_ok() {
        result = result.drop(COLOUR_COL)?;
    }

    one_hot(&result)
}

/// Stable label-to-integer assignment in lexicographic category order, so
/// encoding is reproducible across runs given the same input.
fn label_encode(series: &Series) -> Result<Series> {
    let ca = series.str()?;

    let mut categories: Vec<&str> = ca.into_iter().flatten().collect();
    categories.sort_unstable();
    categories.dedup();
    let mapping: HashMap<&str, i64> = categories
        .iter()
        .enumerate()
        .map(|(idx, &cat)| (cat, idx as i64))
        .collect();

    let values: Int64Chunked = ca
        .into_iter()
        .map(|opt| opt.and_then(|s| mapping.get(s).copied()))
        .collect();
    Ok(values.with_name(series.name().clone()).into_series())
}

fn interaction_feature(df: &DataFrame) -> Result<Series> {
    let no_pol = df
        .column(POLICY_COUNT_COL)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let product = df
        .column(PRODUCT_COL)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    let values: Float64Chunked = no_pol
        .f64()?
        .into_iter()
        .zip(product.f64()?.into_iter())
        .map(|(n, p)| match (n, p) {
            (Some(n), Some(p)) => Some(n + p),
            _ => None,
        })
        .collect();
    Ok(values.with_name(INTERACTION_COL.into()).into_series())
}

/// One-hot expand every remaining string column, one indicator per distinct
/// observed category in sorted order. A category absent from the observed
/// values simply never gets a column.
fn one_hot(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();

    let string_cols: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().to_string())
        .collect();

    for col_name in string_cols {
        let series = df.column(&col_name)?.as_materialized_series().clone();
        let ca = series.str()?;

        let mut categories: Vec<&str> = ca.into_iter().flatten().collect();
        categories.sort_unstable();
        categories.dedup();

        for category in &categories {
            let values: Vec<i32> = ca
                .into_iter()
                .map(|v| if v == Some(*category) { 1 } else { 0 })
                .collect();
            let name = format!("{col_name}_{category}");
            result.with_column(Series::new(name.into(), values))?;
        }

        result = result.drop(&col_name)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_input() -> DataFrame {
        df!(
            "ID" => &["r1", "r2", "r3", "r4"],
            "ProductName" => &["Car Classic", "Muuve", "Car Classic", "CarSafe"],
            "Car_Category" => &["Saloon", "JEEP", "Saloon", "Truck"],
            "Subject_Car_Colour" => &[3.0, 3.0, 1.0, 3.0],
            "No_Pol" => &[1i64, 2, 1, 3],
            "Gender" => &["M", "F", "O", "M"],
            "target" => &[0.0, 1.0, 0.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_label_encoding_is_lexicographic() {
        let out = apply(&encoded_input()).unwrap();
        // Sorted: Car Classic=0, CarSafe=1, Muuve=2
        let product: Vec<i64> = out
            .column("ProductName")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(product, vec![0, 2, 0, 1]);
    }

    #[test]
    fn test_interaction_and_drops() {
        let out = apply(&encoded_input()).unwrap();

        let interaction: Vec<f64> = out
            .column("no_pol_prod_name")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(interaction, vec![1.0, 4.0, 1.0, 4.0]);

        assert!(out.column("ID").is_err());
        assert!(out.column("Subject_Car_Colour").is_err());
    }

    #[test]
    fn test_one_hot_expansion_and_all_numeric() {
        let out = apply(&encoded_input()).unwrap();

        // Gender expands into one indicator per observed category.
        assert!(out.column("Gender").is_err());
        for col in ["Gender_F", "Gender_M", "Gender_O"] {
            let s = out.column(col).unwrap();
            let total: i64 = s.i32().unwrap().into_iter().flatten().map(|v| v as i64).sum();
            assert!(total >= 1);
        }

        for col in out.get_columns() {
            assert!(
                crate::pipeline::impute::is_numeric_dtype(col.dtype()),
                "column {} is not numeric after encoding",
                col.name()
            );
        }
    }
}
