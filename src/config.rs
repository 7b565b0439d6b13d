//! Pipeline configuration.
//!
//! Every field has a default matching the NAN1 analysis (six aggregates in
//! chained 2010 prices, 1980-2018 window). A JSON file may override any subset:
//!
//! ```json
//! { "window": { "start": 1990, "end": 2018 }, "growth_join": "inner" }
//! ```

use crate::models::{SeriesSpec, YearRange, default_series, net_exports_series};
use crate::table::JoinPolicy;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// StatBank table id.
    pub table: String,
    /// Value of the `PRISENHED` variable (price unit), e.g. `LAN_M` for chained values.
    pub price_unit: String,
    /// Response language; also decides the decimal separator of values.
    pub lang: String,
    /// Year index every series is joined onto.
    pub scaffold: YearRange,
    /// Analysis window; its start and end are the summary's base and end year.
    pub window: YearRange,
    pub growth_join: JoinPolicy,
    pub series: Vec<SeriesSpec>,
    pub exports_key: String,
    pub imports_key: String,
    pub net_exports: SeriesSpec,
    pub charts: ChartConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            table: "NAN1".into(),
            price_unit: "LAN_M".into(),
            lang: "da".into(),
            scaffold: YearRange::new(1966, 2018),
            window: YearRange::new(1980, 2018),
            growth_join: JoinPolicy::Left,
            series: default_series(),
            exports_key: "exp".into(),
            imports_key: "imp".into(),
            net_exports: net_exports_series(),
            charts: ChartConfig::default(),
        }
    }
}

/// Which series appear in which chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Series every paired chart is compared against.
    pub reference: String,
    /// One paired level/growth chart per key.
    pub paired: Vec<String>,
    /// Component shares shown in the pie charts.
    pub pie: Vec<String>,
    /// Summary rows left out of the bar chart.
    pub bar_exclude: Vec<String>,
    /// Axis label for levels.
    pub value_unit: String,
    pub source_note: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            reference: "gdp".into(),
            paired: keys(&["priv_cons", "publ_cons", "inv", "nx"]),
            pie: keys(&["priv_cons", "publ_cons", "inv", "nx"]),
            bar_exclude: keys(&["gdp", "exp", "imp"]),
            value_unit: "Billion DKK".into(),
            source_note: "Source: Danmarks Statistik - http://www.statistikbanken.dk/NAN1".into(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Fetched series followed by the derived net-exports series.
    pub fn all_series(&self) -> Vec<SeriesSpec> {
        let mut all = self.series.clone();
        all.push(self.net_exports.clone());
        all
    }

    pub fn spec(&self, key: &str) -> Option<SeriesSpec> {
        self.all_series().into_iter().find(|s| s.key == key)
    }

    /// Copy whose scaffold is widened to cover the window.
    pub fn normalized(&self) -> Self {
        let mut cfg = self.clone();
        cfg.scaffold = YearRange::new(
            self.scaffold.start.min(self.window.start),
            self.scaffold.end.max(self.window.end),
        );
        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            bail!("at least one series required");
        }
        if self.window.start >= self.window.end {
            bail!(
                "window start ({}) must be before its end ({})",
                self.window.start,
                self.window.end
            );
        }
        let mut keys = BTreeSet::new();
        for s in self.all_series() {
            if s.key.trim().is_empty() {
                bail!("series key must not be empty");
            }
            if !keys.insert(s.key.clone()) {
                bail!("duplicate series key: {}", s.key);
            }
        }
        for s in &self.series {
            if s.code.trim().is_empty() {
                bail!("series {} has no transaction code", s.key);
            }
        }
        for key in [&self.exports_key, &self.imports_key] {
            if !self.series.iter().any(|s| &s.key == key) {
                bail!("net exports need series {key}, which is not fetched");
            }
        }
        let charts = &self.charts;
        let chart_keys = std::iter::once(&charts.reference)
            .chain(&charts.paired)
            .chain(&charts.pie)
            .chain(&charts.bar_exclude);
        for key in chart_keys {
            if !keys.contains(key) {
                bail!("chart configuration refers to unknown series {key}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"window":{"start":1990,"end":2010},"growth_join":"inner"}"#)
                .unwrap();
        assert_eq!(cfg.window, YearRange::new(1990, 2010));
        assert_eq!(cfg.growth_join, JoinPolicy::Inner);
        assert_eq!(cfg.table, "NAN1");
        assert_eq!(cfg.series.len(), 6);
    }

    #[test]
    fn scaffold_grows_to_cover_window() {
        let cfg = PipelineConfig {
            scaffold: YearRange::new(1990, 2010),
            window: YearRange::new(1980, 2018),
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.normalized().scaffold, YearRange::new(1980, 2018));
        let inside = PipelineConfig::default();
        assert_eq!(inside.normalized().scaffold, YearRange::new(1966, 2018));
    }

    #[test]
    fn unknown_chart_key_is_rejected() {
        let mut cfg = PipelineConfig::default();
        cfg.charts.pie.push("bogus".into());
        assert!(cfg.validate().is_err());
    }
}
