//! Derived series: net exports and year-over-year percentage changes.

use crate::error::{PipelineError, Result};
use crate::table::{JoinPolicy, JoinReport, Table, format_years};
use log::warn;

/// Prefix given to every percentage-change column.
pub const GROWTH_PREFIX: &str = "pct. change in ";

/// Name of the percentage-change column for a series key.
pub fn growth_column(key: &str) -> String {
    format!("{GROWTH_PREFIX}{key}")
}

/// Append `key = exports - imports` to a copy of `levels`.
pub fn add_net_exports(
    levels: &Table<f64>,
    exports: &str,
    imports: &str,
    key: &str,
) -> Result<Table<f64>> {
    let exp = levels.require(exports)?;
    let imp = levels.require(imports)?;
    let nx: Vec<f64> = exp.iter().zip(imp).map(|(e, i)| e - i).collect();
    let mut out = levels.clone();
    out.push_column(key, nx)?;
    Ok(out)
}

/// `(v[y] - v[y-1]) / v[y-1] * 100` for every column, first row dropped.
///
/// A year whose predecessor is absent from the index gets `NaN`, never a
/// change over a longer span. Columns come back renamed with [`GROWTH_PREFIX`].
pub fn pct_change(levels: &Table<f64>) -> Result<Table<f64>> {
    let mut out: Table<f64> = levels.skip_rows(1).index_only();
    let prev_rows: Vec<Option<usize>> = out
        .years()
        .iter()
        .map(|&year| levels.row_of(year - 1))
        .collect();
    let gaps: Vec<i32> = out
        .years()
        .iter()
        .zip(&prev_rows)
        .filter(|(_, prev)| prev.is_none())
        .map(|(year, _)| *year)
        .collect();
    if !gaps.is_empty() {
        warn!(
            "no growth for {}: previous year missing",
            format_years(&gaps)
        );
    }
    for column in levels.columns() {
        let values: Vec<f64> = prev_rows
            .iter()
            .enumerate()
            .map(|(i, prev)| match prev {
                // growth rows start one row after the levels
                Some(p) => (column.values[i + 1] - column.values[*p]) / column.values[*p] * 100.0,
                None => f64::NAN,
            })
            .collect();
        out.push_column(&growth_column(&column.name), values)?;
    }
    Ok(out)
}

/// Join growth columns back onto the levels table under an explicit policy.
///
/// `Left` keeps every level year and leaves the first year's growth as `NaN`;
/// `Inner` keeps only years that have a growth value.
pub fn attach_growth(
    levels: &Table<f64>,
    growth: &Table<f64>,
    policy: JoinPolicy,
) -> Result<(Table<f64>, JoinReport)> {
    let (joined, report) = match policy {
        JoinPolicy::Inner => levels.inner_join(growth)?,
        JoinPolicy::Left => levels.left_join(growth, f64::NAN)?,
    };
    report.log();
    if joined.is_empty() {
        return Err(PipelineError::EmptyJoin {
            column: report.joined,
        });
    }
    Ok((joined, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> Table<f64> {
        let mut t = Table::from_pairs("exp", vec![(2000, 50.0), (2001, 60.0), (2002, 45.0)]).unwrap();
        t.push_column("imp", vec![40.0, 70.0, 45.0]).unwrap();
        t
    }

    #[test]
    fn net_exports_is_exact_difference() {
        let t = add_net_exports(&levels(), "exp", "imp", "nx").unwrap();
        assert_eq!(t.column("nx").unwrap(), &[10.0, -10.0, 0.0]);
    }

    #[test]
    fn growth_drops_first_year() {
        let g = pct_change(&levels()).unwrap();
        assert_eq!(g.years(), &[2001, 2002]);
        assert_eq!(g.column("pct. change in exp").unwrap(), &[20.0, -25.0]);
    }

    #[test]
    fn growth_after_a_gap_is_missing() {
        let t = Table::from_pairs("v", vec![(2000, 100.0), (2001, 110.0), (2003, 121.0), (2004, 133.1)])
            .unwrap();
        let g = pct_change(&t).unwrap();
        assert_eq!(g.years(), &[2001, 2003, 2004]);
        let v = g.column("pct. change in v").unwrap();
        assert!((v[0] - 10.0).abs() < 1e-9);
        assert!(v[1].is_nan());
        assert!((v[2] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn missing_operand_is_reported() {
        let err = add_net_exports(&levels(), "exp", "nope", "nx").unwrap_err();
        assert_eq!(err, PipelineError::MissingColumn("nope".into()));
    }
}
