//! Two-panel comparison of a series against a reference series.
//!
//! The left panel shows levels and the right panel yearly growth rates. In
//! both panels the reference (GDP by default) uses the primary Y axis and is
//! drawn with point markers; the compared series uses the secondary Y axis.

use super::util::{
    column_points, compute_label_area_px, format_tick, office_color, padded_range, plot_err,
    year_range,
};
use super::{Chart, with_footnote};
use crate::derive::growth_column;
use crate::models::SeriesSpec;
use crate::table::Table;
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

/// Levels and growth of one series, as `(year, value)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSeries {
    pub key: String,
    pub label: String,
    pub levels: Vec<(f64, f64)>,
    pub growth: Vec<(f64, f64)>,
}

impl PairedSeries {
    pub fn from_tables(levels: &Table<f64>, growth: &Table<f64>, spec: &SeriesSpec) -> Result<Self> {
        Ok(Self {
            key: spec.key.clone(),
            label: spec.short.clone(),
            levels: column_points(levels, &spec.key)?,
            growth: column_points(growth, &growth_column(&spec.key))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairedGrowthChart {
    pub reference: PairedSeries,
    pub series: PairedSeries,
    pub value_unit: String,
    pub source_note: String,
}

impl PairedGrowthChart {
    /// Compare `spec` against `reference`, e.g. private consumption against GDP.
    pub fn from_tables(
        levels: &Table<f64>,
        growth: &Table<f64>,
        spec: &SeriesSpec,
        reference: &SeriesSpec,
        value_unit: &str,
        source_note: &str,
    ) -> Result<Self> {
        Ok(Self {
            reference: PairedSeries::from_tables(levels, growth, reference)?,
            series: PairedSeries::from_tables(levels, growth, spec)?,
            value_unit: value_unit.to_string(),
            source_note: source_note.to_string(),
        })
    }
}

struct Panel<'a> {
    title: String,
    primary: (&'a str, &'a [(f64, f64)], String),
    secondary: (&'a str, &'a [(f64, f64)], String),
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> Result<()> {
    let (p_label, p_points, p_desc) = &panel.primary;
    let (s_label, s_points, s_desc) = &panel.secondary;

    let all: Vec<(f64, f64)> = p_points.iter().chain(s_points.iter()).copied().collect();
    let (x0, x1) = year_range(&all).ok_or_else(|| anyhow!("no data for {}", panel.title))?;
    let (p0, p1) = padded_range(p_points.iter().map(|p| &p.1))
        .ok_or_else(|| anyhow!("no values for {p_label}"))?;
    let (s0, s1) = padded_range(s_points.iter().map(|p| &p.1))
        .ok_or_else(|| anyhow!("no values for {s_label}"))?;

    let y_ticks = 8usize;
    let x_ticks = ((x1 - x0) as usize + 1).min(8);
    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| format_tick(*v);

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .caption(&panel.title, (FontFamily::SansSerif, 18))
        .set_label_area_size(
            LabelAreaPosition::Left,
            compute_label_area_px(p0, p1, y_ticks, 12),
        )
        .set_label_area_size(
            LabelAreaPosition::Right,
            compute_label_area_px(s0, s1, y_ticks, 12),
        )
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(x0..x1, p0..p1)
        .map_err(plot_err)?
        .set_secondary_coord(x0..x1, s0..s1);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Years")
        .y_desc(p_desc.as_str())
        .x_labels(x_ticks)
        .y_labels(y_ticks)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(plot_err)?;

    chart
        .configure_secondary_axes()
        .y_desc(s_desc.as_str())
        .y_labels(y_ticks)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(plot_err)?;

    let p_color = office_color(0);
    let s_color = office_color(1);

    chart
        .draw_series(LineSeries::new(p_points.to_vec(), p_color.stroke_width(2)))
        .map_err(plot_err)?
        .label(*p_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], p_color.stroke_width(2)));
    // markers tell the reference apart when colors are not distinguishable
    chart
        .draw_series(
            p_points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, p_color.filled())),
        )
        .map_err(plot_err)?;

    chart
        .draw_secondary_series(LineSeries::new(s_points.to_vec(), s_color.stroke_width(2)))
        .map_err(plot_err)?
        .label(*s_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], s_color.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 12))
        .draw()
        .map_err(plot_err)?;
    Ok(())
}

impl Chart for PairedGrowthChart {
    fn file_stem(&self) -> String {
        format!("paired_{}", self.series.key)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let body = with_footnote(root, &self.source_note)?;
        let panels = body.split_evenly((1, 2));
        let (r, s) = (&self.reference, &self.series);
        let title = format!("{} and {}", r.label, s.label);

        let levels = Panel {
            title: title.clone(),
            primary: (&r.label, &r.levels, format!("{} ({})", r.label, self.value_unit)),
            secondary: (&s.label, &s.levels, format!("{} ({})", s.label, self.value_unit)),
        };
        let growth = Panel {
            title: format!("{title}, growth"),
            primary: (&r.label, &r.growth, format!("{} (growth rate, %)", r.label)),
            secondary: (&s.label, &s.growth, format!("{} (growth rate, %)", s.label)),
        };
        draw_panel(&panels[0], &levels)?;
        draw_panel(&panels[1], &growth)?;
        Ok(())
    }
}
