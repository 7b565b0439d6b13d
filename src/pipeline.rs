//! Orchestration: fetch → clean/merge → derive → summarize.
//!
//! Each stage is a function of the previous stage's output; [`build`] runs the
//! offline part on already-fetched raw tables, [`run`] adds the fetch.

use crate::api::Client;
use crate::clean::build_levels;
use crate::config::PipelineConfig;
use crate::derive::{add_net_exports, attach_growth, pct_change};
use crate::error::PipelineError;
use crate::models::{DecimalStyle, RawSeries};
use crate::stats::{Summary, summarize};
use crate::table::{JoinReport, Table};
use log::info;

/// Everything the pipeline produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Levels of every series (fetched and derived) inside the window.
    pub levels: Table<f64>,
    /// Year-over-year percentage changes; starts one year after `levels`.
    pub growth: Table<f64>,
    /// Levels and growth side by side, joined under the configured policy.
    pub unified: Table<f64>,
    pub summary: Summary,
    /// Every join performed, in order.
    pub joins: Vec<JoinReport>,
}

/// Run all offline stages on raw tables, one per configured series.
///
/// The scaffold is widened to cover the window first (see [`PipelineConfig::normalized`]).
pub fn build(raw: &[RawSeries], cfg: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
    let cfg = &cfg.normalized();
    let style = DecimalStyle::for_lang(&cfg.lang);
    let (levels, mut joins) = build_levels(raw, cfg.scaffold, cfg.window, style)?;
    info!(
        "merged {} series over {} years ({}-{})",
        raw.len(),
        levels.len(),
        levels.years().first().copied().unwrap_or_default(),
        levels.years().last().copied().unwrap_or_default()
    );

    let levels = add_net_exports(
        &levels,
        &cfg.exports_key,
        &cfg.imports_key,
        &cfg.net_exports.key,
    )?;
    let growth = pct_change(&levels)?;
    let (unified, report) = attach_growth(&levels, &growth, cfg.growth_join)?;
    joins.push(report);

    let summary = summarize(
        &levels,
        &growth,
        &cfg.all_series(),
        cfg.window.start,
        cfg.window.end,
    )?;
    Ok(PipelineOutput {
        levels,
        growth,
        unified,
        summary,
        joins,
    })
}

/// Fetch every configured series, then [`build`].
pub fn run(client: &Client, cfg: &PipelineConfig) -> anyhow::Result<PipelineOutput> {
    cfg.validate()?;
    let raw = client.fetch_all(cfg)?;
    Ok(build(&raw, cfg)?)
}
