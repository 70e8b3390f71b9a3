//! Value sanitation: age correction and date parsing
//!
//! Cell values change here, never the row count.

use crate::data::AGE_COL;
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;

/// Ages recorded as exactly this value are remapped to 120; anything above
/// it is clamped to 99. Fixed policy constants, not heuristics.
const AGE_OUTLIER_MARK: f64 = 320.0;
const AGE_OUTLIER_REMAP: f64 = 120.0;
const AGE_CLAMP: f64 = 99.0;

/// Date layouts tried in order; datetime strings keep only the date part.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

pub fn apply(df: &DataFrame) -> Result<DataFrame> {
    let mut result = fix_ages(df)?;

    let date_cols: Vec<String> = result
        .get_column_names()
        .iter()
        .filter(|n| n.ends_with("Date"))
        .map(|n| n.to_string())
        .collect();

    for name in date_cols {
        let parsed = parse_date_column(result.column(&name)?.as_materialized_series())?;
        result.with_column(parsed)?;
    }

    Ok(result)
}

fn fix_ages(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    let series = df
        .column(AGE_COL)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let fixed: Float64Chunked = series
        .f64()?
        .into_iter()
        .map(|opt| opt.map(fix_age_value))
        .collect();
    result.with_column(fixed.with_name(AGE_COL.into()).into_series())?;
    Ok(result)
}

/// Negative ages are sign-flipped (assumed data-entry sign error); the two
/// outlier thresholds are remapped as fixed policy.
pub(crate) fn fix_age_value(age: f64) -> f64 {
    if age < 0.0 {
        -age
    } else if age == AGE_OUTLIER_MARK {
        AGE_OUTLIER_REMAP
    } else if age > AGE_OUTLIER_MARK {
        AGE_CLAMP
    } else {
        age
    }
}

fn parse_date_column(series: &Series) -> Result<Series> {
    // CSV inference may already have produced a date column.
    if series.dtype() == &DataType::Date {
        return Ok(series.clone());
    }
    let name = series.name().clone();
    let ca = series.str()?;
    let days: Int32Chunked = ca
        .into_iter()
        .map(|opt| opt.and_then(parse_date_value).map(days_since_epoch))
        .collect();
    Ok(days.with_name(name).into_series().cast(&DataType::Date)?)
}

/// Parse a raw cell into a date; unparseable cells become the missing-date
/// marker (null) rather than failing the row.
pub(crate) fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

/// Days since the Unix epoch, the physical representation of a date cell.
pub(crate) fn days_since_epoch(d: NaiveDate) -> i32 {
    d.signed_duration_since(NaiveDate::default()).num_days() as i32
}
