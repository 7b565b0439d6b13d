//! Year-indexed column tables and explicit join policies.
//!
//! A [`Table`] holds a strictly ascending, duplicate-free year index and any
//! number of named columns of equal length. Joins never discard rows silently:
//! every join returns a [`JoinReport`] listing the years that only one side had.

use crate::error::{PipelineError, Result};
use crate::models::YearRange;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How rows without a partner on the right-hand side are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Keep only years present on both sides.
    Inner,
    /// Keep every left year; missing right cells receive a fill value.
    #[default]
    Left,
}

/// Years that did not line up during a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    /// Comma-separated names of the right-hand columns.
    pub joined: String,
    pub policy: JoinPolicy,
    /// Years present on the left only (dropped under `Inner`, filled under `Left`).
    pub left_only: Vec<i32>,
    /// Years present on the right only (always dropped).
    pub right_only: Vec<i32>,
}

impl JoinReport {
    pub fn is_lossless(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }

    pub fn log(&self) {
        if self.is_lossless() {
            debug!("join {}: all years aligned", self.joined);
            return;
        }
        if !self.left_only.is_empty() {
            let verb = match self.policy {
                JoinPolicy::Inner => "dropped",
                JoinPolicy::Left => "kept with missing values",
            };
            info!(
                "join {}: {} {} year(s) absent from {}: {}",
                self.joined,
                verb,
                self.left_only.len(),
                self.joined,
                format_years(&self.left_only)
            );
        }
        if !self.right_only.is_empty() {
            info!(
                "join {}: dropped {} year(s) outside the base table: {}",
                self.joined,
                self.right_only.len(),
                format_years(&self.right_only)
            );
        }
    }
}

/// Compact rendering of a sorted year list, e.g. `1966-1977, 2019`.
pub fn format_years(years: &[i32]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = years.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
    }
    parts.join(", ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    pub name: String,
    pub values: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    years: Vec<i32>,
    columns: Vec<Column<T>>,
}

impl<T> Table<T> {
    /// Column-less table spanning every year of `range`.
    pub fn scaffold(range: YearRange) -> Self {
        Self {
            years: range.years().collect(),
            columns: Vec::new(),
        }
    }

    /// Build a single-column table from `(year, value)` pairs in any order.
    pub fn from_pairs(name: &str, mut pairs: Vec<(i32, T)>) -> Result<Self> {
        pairs.sort_by_key(|(y, _)| *y);
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(PipelineError::DuplicateYear {
                column: name.to_string(),
                year: w[0].0,
            });
        }
        let (years, values): (Vec<i32>, Vec<T>) = pairs.into_iter().unzip();
        Ok(Self {
            years,
            columns: vec![Column {
                name: name.to_string(),
                values,
            }],
        })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[T]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Like [`Table::column`] but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<&[T]> {
        self.column(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    pub fn row_of(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn get(&self, name: &str, year: i32) -> Option<&T> {
        let row = self.row_of(year)?;
        self.column(name).map(|values| &values[row])
    }

    /// Append a column aligned with the existing year index.
    pub fn push_column(&mut self, name: &str, values: Vec<T>) -> Result<()> {
        if self.column(name).is_some() {
            return Err(PipelineError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.years.len() {
            return Err(PipelineError::LengthMismatch {
                column: name.to_string(),
                expected: self.years.len(),
                got: values.len(),
            });
        }
        self.columns.push(Column {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Same year index, no columns.
    pub fn index_only<U>(&self) -> Table<U> {
        Table {
            years: self.years.clone(),
            columns: Vec::new(),
        }
    }

    /// True when the year index has no gaps between its first and last year.
    pub fn is_contiguous(&self) -> bool {
        self.years.windows(2).all(|w| w[1] == w[0] + 1)
    }

    /// Convert every cell, stopping at the first failure.
    pub fn try_map<U, E>(
        self,
        mut convert: impl FnMut(&str, i32, T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Table<U>, E> {
        let years = self.years;
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            let mut values = Vec::with_capacity(column.values.len());
            for (year, cell) in years.iter().zip(column.values) {
                values.push(convert(&column.name, *year, cell)?);
            }
            columns.push(Column {
                name: column.name,
                values,
            });
        }
        Ok(Table { years, columns })
    }
}

impl<T: Clone> Table<T> {
    /// Keep only rows whose year falls inside `range`.
    pub fn restrict(&self, range: YearRange) -> Self {
        let rows: Vec<usize> = (0..self.years.len())
            .filter(|&i| range.contains(self.years[i]))
            .collect();
        self.select_rows(&rows)
    }

    /// Drop the first `n` rows.
    pub fn skip_rows(&self, n: usize) -> Self {
        let rows: Vec<usize> = (n.min(self.years.len())..self.years.len()).collect();
        self.select_rows(&rows)
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            years: rows.iter().map(|&i| self.years[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&i| c.values[i].clone()).collect(),
                })
                .collect(),
        }
    }

    /// Keep only years present in both tables.
    pub fn inner_join(&self, other: &Table<T>) -> Result<(Self, JoinReport)> {
        self.join_rows(other, None)
    }

    /// Keep every year of `self`; right-hand cells without a partner become `fill`.
    pub fn left_join(&self, other: &Table<T>, fill: T) -> Result<(Self, JoinReport)> {
        self.join_rows(other, Some(fill))
    }

    fn join_rows(&self, other: &Table<T>, fill: Option<T>) -> Result<(Self, JoinReport)> {
        if let Some(dup) = other.column_names().find(|n| self.column(n).is_some()) {
            return Err(PipelineError::DuplicateColumn(dup.to_string()));
        }
        let policy = if fill.is_some() {
            JoinPolicy::Left
        } else {
            JoinPolicy::Inner
        };
        let right_rows: HashMap<i32, usize> =
            other.years.iter().enumerate().map(|(i, y)| (*y, i)).collect();

        let mut left_only = Vec::new();
        let mut pairs: Vec<(usize, Option<usize>)> = Vec::with_capacity(self.years.len());
        for (li, year) in self.years.iter().enumerate() {
            match right_rows.get(year) {
                Some(&ri) => pairs.push((li, Some(ri))),
                None => {
                    left_only.push(*year);
                    if fill.is_some() {
                        pairs.push((li, None));
                    }
                }
            }
        }
        let left_years: HashSet<i32> = self.years.iter().copied().collect();
        let right_only: Vec<i32> = other
            .years
            .iter()
            .copied()
            .filter(|y| !left_years.contains(y))
            .collect();

        let mut columns: Vec<Column<T>> = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: pairs.iter().map(|(li, _)| c.values[*li].clone()).collect(),
            })
            .collect();
        for c in &other.columns {
            let values = pairs
                .iter()
                .filter_map(|(_, ri)| match (ri, &fill) {
                    (Some(ri), _) => Some(c.values[*ri].clone()),
                    (None, Some(f)) => Some(f.clone()),
                    (None, None) => None,
                })
                .collect();
            columns.push(Column {
                name: c.name.clone(),
                values,
            });
        }

        let report = JoinReport {
            joined: other.column_names().collect::<Vec<_>>().join(","),
            policy,
            left_only,
            right_only,
        };
        let table = Self {
            years: pairs.iter().map(|(li, _)| self.years[*li]).collect(),
            columns,
        };
        Ok((table, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, years: std::ops::RangeInclusive<i32>) -> Table<f64> {
        Table::from_pairs(name, years.map(|y| (y, y as f64)).collect()).unwrap()
    }

    #[test]
    fn inner_join_reports_both_sides() {
        let base: Table<f64> = Table::scaffold(YearRange::new(2000, 2005));
        let (joined, report) = base.inner_join(&series("a", 2003..=2008)).unwrap();
        assert_eq!(joined.years(), &[2003, 2004, 2005]);
        assert_eq!(report.left_only, vec![2000, 2001, 2002]);
        assert_eq!(report.right_only, vec![2006, 2007, 2008]);
        assert_eq!(report.policy, JoinPolicy::Inner);
    }

    #[test]
    fn left_join_fills_missing_cells() {
        let left = series("a", 2000..=2002);
        let right = series("b", 2001..=2002);
        let (joined, report) = left.left_join(&right, f64::NAN).unwrap();
        assert_eq!(joined.years(), &[2000, 2001, 2002]);
        assert!(joined.get("b", 2000).unwrap().is_nan());
        assert_eq!(joined.get("b", 2001), Some(&2001.0));
        assert_eq!(report.left_only, vec![2000]);
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let a = series("a", 2000..=2001);
        let err = a.inner_join(&series("a", 2000..=2001)).unwrap_err();
        assert_eq!(err, PipelineError::DuplicateColumn("a".into()));
    }

    #[test]
    fn duplicate_years_are_rejected() {
        let err = Table::from_pairs("x", vec![(2000, 1.0), (2000, 2.0)]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateYear { year: 2000, .. }));
    }

    #[test]
    fn years_render_as_ranges() {
        assert_eq!(format_years(&[1966, 1967, 1968, 1970, 2019, 2020]), "1966-1968, 1970, 2019-2020");
        assert_eq!(format_years(&[]), "");
    }
}
