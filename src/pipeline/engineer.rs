//! Frequency encoding and gender normalization

use crate::data::{FREQUENCY_COLS, GENDER_COL};
use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;

pub fn apply(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();

    for col in FREQUENCY_COLS {
        let encoded = frequency_encode(result.column(col)?.as_materialized_series())?;
        result.with_column(encoded)?;
    }

    let gender = normalize_gender(result.column(GENDER_COL)?.as_materialized_series())?;
    result.with_column(gender)?;

    Ok(result)
}

/// Replace each category with its occurrence count across the whole table.
///
/// Counts are computed on the full dataset, not per fold, so the encoding
/// leaks information across the later cross-validation split. That is the
/// source design, preserved deliberately.
fn frequency_encode(series: &Series) -> Result<Series> {
    let ca = series.str()?;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for val in ca.into_iter().flatten() {
        *counts.entry(val).or_insert(0) += 1;
    }

    let values: Float64Chunked = ca
        .into_iter()
        .map(|opt| opt.map(|s| counts[s] as f64))
        .collect();
    Ok(values.with_name(series.name().clone()).into_series())
}

/// Canonical gender category. Only the two explicit literals map to M/F;
/// every other value, known junk literal or not, is the catch-all O.
pub(crate) fn canonical_gender(raw: Option<&str>) -> &'static str {
    match raw {
        Some("Male") => "M",
        Some("Female") => "F",
        // Entity, Joint Gender, NO GENDER, NOT STATED, SEX, the imputation
        // sentinel, missing, and anything unseen.
        _ => "O",
    }
}

fn normalize_gender(series: &Series) -> Result<Series> {
    let values: StringChunked = series
        .str()?
        .into_iter()
        .map(|opt| Some(canonical_gender(opt).to_string()))
        .collect();
    Ok(values.with_name(series.name().clone()).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_mapping_catch_all() {
        assert_eq!(canonical_gender(Some("Male")), "M");
        assert_eq!(canonical_gender(Some("Female")), "F");
        for junk in ["Entity", "Joint Gender", "NO GENDER", "NOT STATED", "SEX", "NONE", "zzz"] {
            assert_eq!(canonical_gender(Some(junk)), "O", "{junk} must map to O");
        }
        assert_eq!(canonical_gender(None), "O");
    }

    #[test]
    fn test_frequency_counts() {
        let df = df!(
            "LGA_Name" => &["Ikeja", "Epe", "Ikeja", "Ikeja"],
            "State" => &["Lagos", "Lagos", "Lagos", "Oyo"],
            "Subject_Car_Make" => &["Toyota", "Honda", "Toyota", "Kia"],
            "Subject_Car_Colour" => &["Red", "Red", "Blue", "Red"],
            "Gender" => &["Male", "Female", "SEX", "Male"],
        )
        .unwrap();

        let out = apply(&df).unwrap();

        let lga: Vec<f64> = out
            .column("LGA_Name")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(lga, vec![3.0, 1.0, 3.0, 3.0]);

        let gender: Vec<&str> = out
            .column("Gender")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(gender, vec!["M", "F", "O", "M"]);
    }

    #[test]
    fn test_distinct_counts_never_exceed_input_categories() {
        let df = df!(
            "LGA_Name" => &["a", "b", "a", "c", "b", "a"],
            "State" => &["s", "s", "s", "s", "s", "s"],
            "Subject_Car_Make" => &["m1", "m2", "m3", "m1", "m2", "m3"],
            "Subject_Car_Colour" => &["x", "x", "y", "y", "x", "y"],
            "Gender" => &["Male", "Male", "Male", "Male", "Male", "Male"],
        )
        .unwrap();

        let distinct_in = df.column("LGA_Name").unwrap().n_unique().unwrap();
        let out = apply(&df).unwrap();
        let distinct_out = out.column("LGA_Name").unwrap().n_unique().unwrap();
        assert!(distinct_out <= distinct_in);
    }
}
