//! Numeric feature extraction from date columns
//!
//! Derives a whole-month policy-duration feature plus day/month/quarter
//! sub-features for each date column, then drops the raw date columns.
//! Missing dates propagate as missing numeric values.

use crate::data::DATE_COLS;
use crate::error::Result;
use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::*;

const POLICY_START: &str = "Policy Start Date";
const POLICY_END: &str = "Policy End Date";
const DATE_DIFF: &str = "Date diff";

pub fn apply(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();

    let start = date_days(df, POLICY_START)?;
    let end = date_days(df, POLICY_END)?;
    let diff: Float64Chunked = start
        .iter()
        .zip(end.iter())
        .map(|(s, e)| match (s, e) {
            (Some(s), Some(e)) => Some(whole_months(*s, *e)),
            _ => None,
        })
        .collect();
    result.with_column(diff.with_name(DATE_DIFF.into()).into_series())?;

    for col in DATE_COLS {
        let days = date_days(df, col)?;
        let day: Float64Chunked = days
            .iter()
            .map(|d| d.map(|v| to_date(v).day() as f64))
            .collect();
        let month: Float64Chunked = days
            .iter()
            .map(|d| d.map(|v| to_date(v).month() as f64))
            .collect();
        let quarter: Float64Chunked = days
            .iter()
            .map(|d| d.map(|v| ((to_date(v).month() - 1) / 3 + 1) as f64))
            .collect();

        result.with_column(day.with_name(format!("{col}_day").into()).into_series())?;
        result.with_column(month.with_name(format!("{col}_month").into()).into_series())?;
        result.with_column(quarter.with_name(format!("{col}_quarter").into()).into_series())?;
    }

    // Schema transition: the raw date columns do not survive this stage.
    for col in DATE_COLS {
        result = result.drop(col)?;
    }

    Ok(result)
}

/// Physical day offsets of a date column, nulls preserved.
fn date_days(df: &DataFrame, col: &str) -> Result<Vec<Option<i32>>> {
    let physical = df
        .column(col)?
        .as_materialized_series()
        .cast(&DataType::Int32)?;
    Ok(physical.i32()?.into_iter().collect())
}

/// Whole months between two dates. The day component is intentionally
/// ignored, so a one-day overrun into a new month counts as a full month.
pub(crate) fn whole_months(start_days: i32, end_days: i32) -> f64 {
    let s = to_date(start_days);
    let e = to_date(end_days);
    ((e.year() - s.year()) * 12 + (e.month() as i32 - s.month() as i32)) as f64
}

pub(crate) fn to_date(days: i32) -> NaiveDate {
    NaiveDate::default() + Duration::days(days as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sanitize::days_since_epoch;

    fn days(y: i32, m: u32, d: u32) -> i32 {
        days_since_epoch(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_whole_months_ignores_days() {
        // One day into a new month still counts as a full month.
        assert_eq!(whole_months(days(2020, 1, 31), days(2020, 2, 1)), 1.0);
        assert_eq!(whole_months(days(2020, 1, 1), days(2021, 1, 1)), 12.0);
        assert_eq!(whole_months(days(2020, 5, 15), days(2020, 5, 1)), 0.0);
        assert_eq!(whole_months(days(2020, 5, 1), days(2020, 4, 30)), -1.0);
    }

    #[test]
    fn test_whole_months_shift_invariance() {
        // Adding the same number of whole months to both endpoints leaves
        // the difference unchanged.
        let base = whole_months(days(2019, 2, 10), days(2019, 11, 20));
        let shifted = whole_months(days(2019, 5, 10), days(2020, 2, 20));
        assert_eq!(base, shifted);
    }

    fn date_df() -> DataFrame {
        let cols: Vec<Column> = DATE_COLS
            .iter()
            .map(|name| {
                let raw: Int32Chunked = [Some(days(2020, 1, 15)), None, Some(days(2021, 7, 2))]
                    .into_iter()
                    .collect();
                raw.with_name((*name).into())
                    .into_series()
                    .cast(&DataType::Date)
                    .unwrap()
                    .into()
            })
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn test_apply_derives_and_drops() {
        let out = apply(&date_df()).unwrap();

        for col in DATE_COLS {
            assert!(out.column(col).is_err(), "raw date column {col} must be dropped");
            assert!(out.column(&format!("{col}_day")).is_ok());
            assert!(out.column(&format!("{col}_month")).is_ok());
            assert!(out.column(&format!("{col}_quarter")).is_ok());
        }

        let quarters = out.column("Policy Start Date_quarter").unwrap();
        let q: Vec<Option<f64>> = quarters.f64().unwrap().into_iter().collect();
        assert_eq!(q, vec![Some(1.0), None, Some(3.0)]);

        // Missing dates propagate into the derived difference.
        let diff = out.column("Date diff").unwrap();
        assert_eq!(diff.null_count(), 1);
    }
}
