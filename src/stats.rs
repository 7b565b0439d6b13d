use crate::derive::growth_column;
use crate::error::{PipelineError, Result};
use crate::models::SeriesSpec;
use crate::table::Table;
use log::warn;
use serde::{Deserialize, Serialize};

/// One row of the summary table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
    pub key: String,
    pub label: String,
    /// `(end - base) / base * 100`, rounded to 2 decimals.
    pub total_change_pct: f64,
    /// Mean of the yearly percentage changes, rounded to 2 decimals.
    pub average_change_pct: Option<f64>,
    pub level_base: f64,
    pub level_end: f64,
}

/// Summary statistics between a base year and an end year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub base_year: i32,
    pub end_year: i32,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn row(&self, key: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Copy of the summary without the rows named in `keys`.
    pub fn excluding(&self, keys: &[String]) -> Summary {
        Summary {
            base_year: self.base_year,
            end_year: self.end_year,
            rows: self
                .rows
                .iter()
                .filter(|r| !keys.contains(&r.key))
                .cloned()
                .collect(),
        }
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Percentage change between two levels.
pub fn total_change_pct(base: f64, end: f64) -> f64 {
    (end - base) / base * 100.0
}

/// Arithmetic mean of the finite values, `None` when there are none.
pub fn mean_finite(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        None
    } else {
        Some(finite.iter().sum::<f64>() / finite.len() as f64)
    }
}

/// Build the summary table from the levels table and its percentage-change table.
///
/// Rows whose total change is not finite (e.g. a zero base level) are dropped
/// and logged.
pub fn summarize(
    levels: &Table<f64>,
    growth: &Table<f64>,
    series: &[SeriesSpec],
    base_year: i32,
    end_year: i32,
) -> Result<Summary> {
    let mut rows = Vec::with_capacity(series.len());
    for spec in series {
        let values = levels.require(&spec.key)?;
        let level = |year: i32| -> Result<f64> {
            levels
                .row_of(year)
                .map(|row| values[row])
                .ok_or_else(|| PipelineError::MissingYear {
                    column: spec.key.clone(),
                    year,
                })
        };
        let level_base = level(base_year)?;
        let level_end = level(end_year)?;

        let total = total_change_pct(level_base, level_end);
        if !total.is_finite() {
            warn!(
                "dropping {} from summary: change {base_year}-{end_year} is undefined (base level {level_base})",
                spec.key
            );
            continue;
        }
        let changes = growth.require(&growth_column(&spec.key))?;
        rows.push(SummaryRow {
            key: spec.key.clone(),
            label: spec.label.clone(),
            total_change_pct: round2(total),
            average_change_pct: mean_finite(changes).map(round2),
            level_base,
            level_end,
        });
    }
    Ok(Summary {
        base_year,
        end_year,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_and_means() {
        assert_eq!(round2(12.345_678), 12.35);
        assert_eq!(mean_finite(&[f64::NAN, 2.0, 4.0]), Some(3.0));
        assert_eq!(mean_finite(&[f64::NAN]), None);
    }

    #[test]
    fn zero_base_level_is_dropped() {
        let levels = Table::from_pairs("a", vec![(2000, 0.0), (2001, 5.0)]).unwrap();
        let growth = Table::from_pairs("pct. change in a", vec![(2001, f64::INFINITY)]).unwrap();
        let spec = SeriesSpec::new("a", "", "Alpha", "A");
        let s = summarize(&levels, &growth, &[spec], 2000, 2001).unwrap();
        assert!(s.rows.is_empty());
    }
}
