//! Multi-series line chart on a shared Y axis (exports vs imports).

use super::util::{
    column_points, compute_label_area_px, format_tick, office_color, padded_range, plot_err,
    year_range,
};
use super::{Chart, with_footnote};
use crate::models::SeriesSpec;
use crate::table::Table;
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

#[derive(Debug, Clone, PartialEq)]
pub struct LinesChart {
    pub stem: String,
    pub title: String,
    pub value_unit: String,
    /// `(legend label, points)` in drawing order.
    pub series: Vec<(String, Vec<(f64, f64)>)>,
    pub source_note: String,
}

impl LinesChart {
    pub fn from_levels(
        stem: &str,
        title: &str,
        levels: &Table<f64>,
        specs: &[&SeriesSpec],
        value_unit: &str,
        source_note: &str,
    ) -> Result<Self> {
        if specs.is_empty() {
            return Err(anyhow!("line chart {stem} needs at least one series"));
        }
        let series = specs
            .iter()
            .map(|s| Ok((s.short.clone(), column_points(levels, &s.key)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            stem: stem.to_string(),
            title: title.to_string(),
            value_unit: value_unit.to_string(),
            series,
            source_note: source_note.to_string(),
        })
    }
}

impl Chart for LinesChart {
    fn file_stem(&self) -> String {
        self.stem.clone()
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let body = with_footnote(root, &self.source_note)?;

        let all: Vec<(f64, f64)> = self
            .series
            .iter()
            .flat_map(|(_, pts)| pts.iter().copied())
            .collect();
        let (x0, x1) = year_range(&all).ok_or_else(|| anyhow!("no data to plot"))?;
        let (y0, y1) =
            padded_range(all.iter().map(|p| &p.1)).ok_or_else(|| anyhow!("no values to plot"))?;

        let y_ticks = 10usize;
        let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
        let y_label_fmt = |v: &f64| format_tick(*v);

        let mut chart = ChartBuilder::on(&body)
            .margin(16)
            .caption(&self.title, (FontFamily::SansSerif, 22))
            .set_label_area_size(
                LabelAreaPosition::Left,
                compute_label_area_px(y0, y1, y_ticks, 12),
            )
            .set_label_area_size(LabelAreaPosition::Bottom, 48)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("Years")
            .y_desc(format!("({})", self.value_unit))
            .x_labels(((x1 - x0) as usize + 1).min(12))
            .y_labels(y_ticks)
            .x_label_formatter(&x_label_fmt)
            .y_label_formatter(&y_label_fmt)
            .label_style((FontFamily::SansSerif, 12))
            .axis_desc_style((FontFamily::SansSerif, 16))
            .draw()
            .map_err(plot_err)?;

        for (idx, (label, points)) in self.series.iter().enumerate() {
            let color = office_color(idx);
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(plot_err)?
                .label(label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2))
                });
            // every series after the first also gets markers
            if idx > 0 {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                    )
                    .map_err(plot_err)?;
            }
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(plot_err)?;
        Ok(())
    }
}
