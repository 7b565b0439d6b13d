//! Grouped bar chart: base and end year level per component.

use super::text::truncate_to_width;
use super::util::{compute_label_area_px, format_tick, office_color, padded_range, plot_err};
use super::{Chart, with_footnote};
use crate::stats::Summary;
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

/// Width of one bar in category units; two bars share a category.
const BAR_WIDTH: f64 = 0.35;

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBars {
    pub labels: Vec<String>,
    pub base_year: i32,
    pub base: Vec<f64>,
    pub end_year: i32,
    pub end: Vec<f64>,
    pub value_unit: String,
    pub source_note: String,
}

impl ComponentBars {
    pub fn from_summary(summary: &Summary, value_unit: &str, source_note: &str) -> Result<Self> {
        if summary.rows.is_empty() {
            return Err(anyhow!("bar chart has no components to show"));
        }
        Ok(Self {
            labels: summary.rows.iter().map(|r| r.label.clone()).collect(),
            base_year: summary.base_year,
            base: summary.rows.iter().map(|r| r.level_base).collect(),
            end_year: summary.end_year,
            end: summary.rows.iter().map(|r| r.level_end).collect(),
            value_unit: value_unit.to_string(),
            source_note: source_note.to_string(),
        })
    }
}

impl Chart for ComponentBars {
    fn file_stem(&self) -> String {
        "components_bar".into()
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let body = with_footnote(root, &self.source_note)?;
        let n = self.labels.len();

        // bars grow from zero, so zero is always on the axis
        let zero = 0.0;
        let (y0, y1) = padded_range(self.base.iter().chain(&self.end).chain([&zero]))
            .ok_or_else(|| anyhow!("no values to plot"))?;
        let (y0, y1) = (y0.min(0.0), y1.max(0.0));

        let (w, _) = body.dim_in_pixel();
        let slot_px = (w / n.max(1) as u32).saturating_sub(8).max(24);
        let labels: Vec<String> = self
            .labels
            .iter()
            .map(|l| truncate_to_width(l, 12, slot_px))
            .collect();
        let x_label_fmt = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };
        let y_ticks = 10usize;
        let y_label_fmt = |v: &f64| format_tick(*v);

        let mut chart = ChartBuilder::on(&body)
            .margin(16)
            .caption(
                format!("GDP components {} and {}", self.base_year, self.end_year),
                (FontFamily::SansSerif, 22),
            )
            .set_label_area_size(
                LabelAreaPosition::Left,
                compute_label_area_px(y0, y1, y_ticks, 12),
            )
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), y0..y1)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(format!("({})", self.value_unit))
            .x_labels(n + 1)
            .y_labels(y_ticks)
            .x_label_formatter(&x_label_fmt)
            .y_label_formatter(&y_label_fmt)
            .label_style((FontFamily::SansSerif, 12))
            .axis_desc_style((FontFamily::SansSerif, 16))
            .draw()
            .map_err(plot_err)?;

        let groups = [
            (self.base_year, &self.base, -BAR_WIDTH, 0usize),
            (self.end_year, &self.end, 0.0, 1usize),
        ];
        for (year, values, offset, color_idx) in groups {
            let color = office_color(color_idx);
            chart
                .draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let x = i as f64 + offset;
                    Rectangle::new([(x, 0.0), (x + BAR_WIDTH, v)], color.filled())
                }))
                .map_err(plot_err)?
                .label(year.to_string())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(plot_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SummaryRow;

    fn row(key: &str, base: f64, end: f64) -> SummaryRow {
        SummaryRow {
            key: key.into(),
            label: key.to_uppercase(),
            total_change_pct: 0.0,
            average_change_pct: None,
            level_base: base,
            level_end: end,
        }
    }

    #[test]
    fn bars_follow_summary_order() {
        let summary = Summary {
            base_year: 1980,
            end_year: 2018,
            rows: vec![row("inv", 10.0, 30.0), row("nx", -2.0, 4.0)],
        };
        let bars = ComponentBars::from_summary(&summary, "Billion DKK", "").unwrap();
        assert_eq!(bars.labels, vec!["INV", "NX"]);
        assert_eq!(bars.base, vec![10.0, -2.0]);
        assert_eq!(bars.end, vec![30.0, 4.0]);
    }

    #[test]
    fn empty_summary_is_rejected() {
        let summary = Summary {
            base_year: 1980,
            end_year: 2018,
            rows: vec![],
        };
        assert!(ComponentBars::from_summary(&summary, "", "").is_err());
    }
}
