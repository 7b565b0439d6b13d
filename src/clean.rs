//! Turn raw API tables into one year-indexed table of numbers.

use crate::error::{PipelineError, Result};
use crate::models::{DecimalStyle, RawSeries, YearRange};
use crate::table::{JoinReport, Table};
use log::debug;

/// Header of the period column in StatBank CSV output.
pub const YEAR_COLUMN: &str = "TID";
/// Header of the value column in StatBank CSV output.
pub const VALUE_COLUMN: &str = "INDHOLD";

/// Drop identifier columns and index the value column by year, named after the series key.
pub fn clean_series(raw: &RawSeries) -> Result<Table<String>> {
    let key = raw.spec.key.as_str();
    let year_idx = raw
        .table
        .column_index(YEAR_COLUMN)
        .ok_or_else(|| PipelineError::MissingColumn(format!("{key}.{YEAR_COLUMN}")))?;
    let value_idx = raw
        .table
        .column_index(VALUE_COLUMN)
        .ok_or_else(|| PipelineError::MissingColumn(format!("{key}.{VALUE_COLUMN}")))?;

    let mut pairs = Vec::with_capacity(raw.table.rows.len());
    for row in &raw.table.rows {
        let year_text = row.get(year_idx).map(|s| s.trim()).unwrap_or("");
        let year = year_text
            .parse::<i32>()
            .map_err(|_| PipelineError::BadYear {
                column: key.to_string(),
                raw: year_text.to_string(),
            })?;
        let value = row.get(value_idx).cloned().unwrap_or_default();
        pairs.push((year, value));
    }
    debug!("series {key}: {} raw observations", pairs.len());
    Table::from_pairs(key, pairs)
}

/// Inner-join every cleaned series onto the scaffold, one at a time.
pub fn merge_series(
    scaffold: Table<String>,
    series: &[Table<String>],
) -> Result<(Table<String>, Vec<JoinReport>)> {
    let mut merged = scaffold;
    let mut reports = Vec::with_capacity(series.len());
    for s in series {
        let (next, report) = merged.inner_join(s)?;
        report.log();
        if next.is_empty() {
            return Err(PipelineError::EmptyJoin {
                column: report.joined,
            });
        }
        merged = next;
        reports.push(report);
    }
    Ok((merged, reports))
}

/// Parse a locale-formatted number, e.g. `"1.234,5"` → `1234.5` under [`DecimalStyle::DANISH`].
///
/// Grouping separators and spaces are removed, then the decimal separator is
/// replaced by `.`. Anything that still does not parse (including the API's
/// `..` missing-value marker) is an error.
pub fn parse_locale_number(text: &str, style: DecimalStyle) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != style.grouping && !c.is_whitespace())
        .map(|c| if c == style.decimal { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert every text cell to `f64`; the first malformed cell aborts the conversion.
pub fn normalize_numbers(table: Table<String>, style: DecimalStyle) -> Result<Table<f64>> {
    table.try_map(|column, year, raw| {
        parse_locale_number(&raw, style).ok_or_else(|| PipelineError::Parse {
            column: column.to_string(),
            year,
            raw,
        })
    })
}

/// Clean, merge, truncate, and parse a set of raw series.
pub fn build_levels(
    raw: &[RawSeries],
    scaffold: YearRange,
    window: YearRange,
    style: DecimalStyle,
) -> Result<(Table<f64>, Vec<JoinReport>)> {
    let cleaned = raw.iter().map(clean_series).collect::<Result<Vec<_>>>()?;
    let (merged, reports) = merge_series(Table::scaffold(scaffold), &cleaned)?;
    let truncated = merged.restrict(window);
    if truncated.is_empty() {
        return Err(PipelineError::EmptyJoin {
            column: format!("window {}-{}", window.start, window.end),
        });
    }
    Ok((normalize_numbers(truncated, style)?, reports))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danish_numbers() {
        let da = DecimalStyle::DANISH;
        assert_eq!(parse_locale_number("1.234,5", da), Some(1234.5));
        assert_eq!(parse_locale_number("571,2", da), Some(571.2));
        assert_eq!(parse_locale_number("-12,25", da), Some(-12.25));
        assert_eq!(parse_locale_number(" 42 ", da), Some(42.0));
        assert_eq!(parse_locale_number("..", da), None);
        assert_eq!(parse_locale_number("", da), None);
    }

    #[test]
    fn english_numbers() {
        let en = DecimalStyle::ENGLISH;
        assert_eq!(parse_locale_number("1,234.5", en), Some(1234.5));
        assert_eq!(parse_locale_number("abc", en), None);
    }
}
