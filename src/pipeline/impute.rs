//! Sentinel imputation of missing values
//!
//! Column-type-driven policy: numeric gaps become a sentinel far outside the
//! plausible domain range so the classifier can treat "missing" as its own
//! signal; categorical gaps become a sentinel category. The target label is
//! never imputed, rows require a true label to be trainable.

use crate::data::TARGET_COL;
use crate::error::Result;
use polars::prelude::*;

/// Fill value for missing numeric cells.
pub const NUMERIC_SENTINEL: f64 = -999.0;
/// Fill category for missing categorical cells, distinct from any real value.
pub const CATEGORY_SENTINEL: &str = "NONE";

pub fn apply(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();

    for col in df.get_columns() {
        let name = col.name().to_string();
        if name == TARGET_COL {
            continue;
        }
        let series = col.as_materialized_series();
        if is_numeric_dtype(series.dtype()) {
            result.with_column(fill_numeric(series)?)?;
        } else if series.dtype() == &DataType::String {
            result.with_column(fill_string(series)?)?;
        }
    }

    Ok(result)
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn fill_numeric(series: &Series) -> Result<Series> {
    let casted = series.cast(&DataType::Float64)?;
    let filled: Float64Chunked = casted
        .f64()?
        .into_iter()
        .map(|opt| Some(opt.unwrap_or(NUMERIC_SENTINEL)))
        .collect();
    Ok(filled.with_name(series.name().clone()).into_series())
}

fn fill_string(series: &Series) -> Result<Series> {
    let filled: StringChunked = series
        .str()?
        .into_iter()
        .map(|opt| Some(opt.unwrap_or(CATEGORY_SENTINEL).to_string()))
        .collect();
    Ok(filled.with_name(series.name().clone()).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_sentinels() {
        let df = df!(
            "num" => &[Some(1.5), None, Some(3.0)],
            "cat" => &[Some("a"), None, Some("b")],
            "target" => &[Some(1.0), None, Some(0.0)],
        )
        .unwrap();

        let out = apply(&df).unwrap();

        let num: Vec<f64> = out
            .column("num")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(num, vec![1.5, NUMERIC_SENTINEL, 3.0]);

        let cat: Vec<&str> = out
            .column("cat")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(cat, vec!["a", CATEGORY_SENTINEL, "b"]);

        // Label gaps are intentionally left alone.
        assert_eq!(out.column("target").unwrap().null_count(), 1);
    }

    #[test]
    fn test_no_feature_nulls_survive() {
        let df = df!(
            "a" => &[None, Some(2i64), None],
            "b" => &[Option::<&str>::None, None, Some("x")],
            "target" => &[0.0, 1.0, 0.0],
        )
        .unwrap();

        let out = apply(&df).unwrap();
        assert_eq!(out.column("a").unwrap().null_count(), 0);
        assert_eq!(out.column("b").unwrap().null_count(), 0);
    }
}
