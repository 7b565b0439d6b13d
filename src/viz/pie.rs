//! Component shares of two years as side-by-side pie charts.

use super::util::{office_rgb, plot_err};
use super::{Chart, with_footnote};
use crate::error::PipelineError;
use crate::models::SeriesSpec;
use crate::table::Table;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPies {
    pub labels: Vec<String>,
    pub base_year: i32,
    pub base: Vec<f64>,
    pub end_year: i32,
    pub end: Vec<f64>,
    pub source_note: String,
}

/// Shares must be non-negative and sum to something positive.
fn check_shares(year: i32, values: &[f64]) -> Result<(), PipelineError> {
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(PipelineError::InvalidShares(format!(
            "{year}: negative or missing component"
        )));
    }
    if values.iter().sum::<f64>() <= 0.0 {
        return Err(PipelineError::InvalidShares(format!("{year}: total is zero")));
    }
    Ok(())
}

impl ComponentPies {
    /// Levels of `components` in `base_year` and `end_year`.
    pub fn from_levels(
        levels: &Table<f64>,
        components: &[SeriesSpec],
        base_year: i32,
        end_year: i32,
        source_note: &str,
    ) -> Result<Self> {
        let at = |year: i32| -> Result<Vec<f64>, PipelineError> {
            components
                .iter()
                .map(|c| {
                    let values = levels.require(&c.key)?;
                    levels
                        .row_of(year)
                        .map(|row| values[row])
                        .ok_or_else(|| PipelineError::MissingYear {
                            column: c.key.clone(),
                            year,
                        })
                })
                .collect()
        };
        let base = at(base_year)?;
        let end = at(end_year)?;
        check_shares(base_year, &base)?;
        check_shares(end_year, &end)?;
        Ok(Self {
            labels: components.iter().map(|c| c.short.clone()).collect(),
            base_year,
            base,
            end_year,
            end,
            source_note: source_note.to_string(),
        })
    }
}

fn draw_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    sizes: &[f64],
    labels: &[String],
) -> Result<()> {
    let inner = area
        .titled(title, (FontFamily::SansSerif, 20.0).into_font())
        .map_err(plot_err)?;
    let (w, h) = inner.dim_in_pixel();
    let center = ((w / 2) as i32, (h / 2) as i32);
    // leave room for the outside labels
    let radius = (w.min(h) as f64) * 0.30;
    let colors: Vec<RGBColor> = (0..sizes.len()).map(office_rgb).collect();

    let mut pie = Pie::new(&center, &radius, sizes, &colors, labels);
    pie.start_angle(90.0);
    pie.label_style((FontFamily::SansSerif, 14.0).into_font().color(&BLACK));
    pie.percentages((FontFamily::SansSerif, 12.0).into_font().color(&WHITE));
    inner.draw(&pie).map_err(plot_err)?;
    Ok(())
}

impl Chart for ComponentPies {
    fn file_stem(&self) -> String {
        "components_pie".into()
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let body = with_footnote(root, &self.source_note)?;
        let panels = body.split_evenly((1, 2));
        draw_pie(
            &panels[0],
            &format!("GDP components {}", self.base_year),
            &self.base,
            &self.labels,
        )?;
        draw_pie(
            &panels[1],
            &format!("GDP components {}", self.end_year),
            &self.end,
            &self.labels,
        )?;
        Ok(())
    }
}
