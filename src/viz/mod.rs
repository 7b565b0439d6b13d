//! Visualization: render the pipeline's tables to **SVG** or **PNG** charts.
//!
//! - Component pie charts (base year vs end year)
//! - Paired level/growth charts, each panel with a secondary Y axis
//! - Exports vs imports line chart
//! - Grouped bar chart of base and end year levels
//!
//! Every chart implements [`Chart`] and is drawn through [`render`], which picks
//! the backend from the file extension.

pub mod bars;
pub mod lines;
pub mod paired;
pub mod pie;
pub mod text;
pub mod types;
pub mod util;

pub use bars::ComponentBars;
pub use lines::LinesChart;
pub use paired::{PairedGrowthChart, PairedSeries};
pub use pie::ComponentPies;
pub use types::{ChartFormat, ChartSize};

use crate::config::PipelineConfig;
use crate::pipeline::PipelineOutput;
use anyhow::{Context, Result, anyhow};
use log::info;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};
use std::sync::Once;

use types::FOOTNOTE_PX;
use util::plot_err;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Something that can draw itself onto any Plotters backend.
pub trait Chart {
    /// File name without extension, e.g. `components_pie`.
    fn file_stem(&self) -> String;

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Draw `chart` to `path`; `.svg` gives vector output, anything else PNG.
pub fn render<C: Chart, P: AsRef<Path>>(chart: &C, path: P, size: ChartSize) -> Result<()> {
    if size.width < 200 || size.height < 150 {
        return Err(anyhow!(
            "chart size {}x{} is too small",
            size.width,
            size.height
        ));
    }
    ensure_fonts_registered();
    let path = path.as_ref();
    let path_string = path.to_string_lossy().into_owned();
    let dims = (size.width, size.height);

    match ChartFormat::from_path(path) {
        ChartFormat::Svg => {
            let root = SVGBackend::new(path_string.as_str(), dims).into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;
            chart.draw(&root)?;
            root.present().map_err(plot_err)?;
        }
        ChartFormat::Png => {
            let root = BitMapBackend::new(path_string.as_str(), dims).into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;
            chart.draw(&root)?;
            root.present().map_err(plot_err)?;
        }
    }
    Ok(())
}

/// Split off the bottom band and write the source note into it.
pub(crate) fn with_footnote<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    note: &str,
) -> Result<DrawingArea<DB, Shift>> {
    if note.trim().is_empty() {
        return Ok(root.clone());
    }
    let (_, h) = root.dim_in_pixel();
    let (body, foot) = root.split_vertically(h.saturating_sub(FOOTNOTE_PX) as i32);
    let style = (FontFamily::SansSerif, 12.0)
        .into_font()
        .color(&RGBColor(90, 90, 90));
    foot.draw_text(note, &style, (10, 4)).map_err(plot_err)?;
    Ok(body)
}

/// Render the full chart set into `dir`; returns the written paths in drawing order.
pub fn render_all<P: AsRef<Path>>(
    output: &PipelineOutput,
    cfg: &PipelineConfig,
    dir: P,
    format: ChartFormat,
    size: ChartSize,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let charts_cfg = &cfg.charts;
    let mut written = Vec::new();

    let mut emit = |stem: String, draw: &dyn Fn(&Path) -> Result<()>| -> Result<()> {
        let path = dir.join(format!("{stem}.{}", format.extension()));
        draw(&path).with_context(|| format!("render {}", path.display()))?;
        info!("wrote {}", path.display());
        written.push(path);
        Ok(())
    };

    let pies = ComponentPies::from_levels(
        &output.levels,
        &pie_specs(cfg)?,
        cfg.window.start,
        cfg.window.end,
        &charts_cfg.source_note,
    )?;
    emit(pies.file_stem(), &|p: &Path| render(&pies, p, size))?;

    let reference = spec_of(cfg, &charts_cfg.reference)?;
    for key in &charts_cfg.paired {
        let spec = spec_of(cfg, key)?;
        let chart = PairedGrowthChart::from_tables(
            &output.levels,
            &output.growth,
            &spec,
            &reference,
            &charts_cfg.value_unit,
            &charts_cfg.source_note,
        )?;
        emit(chart.file_stem(), &|p: &Path| render(&chart, p, size))?;
    }

    let exports = spec_of(cfg, &cfg.exports_key)?;
    let imports = spec_of(cfg, &cfg.imports_key)?;
    let lines = LinesChart::from_levels(
        "exports_imports",
        &format!("{} and {}", exports.short, imports.short),
        &output.levels,
        &[&exports, &imports],
        &charts_cfg.value_unit,
        &charts_cfg.source_note,
    )?;
    emit(lines.file_stem(), &|p: &Path| render(&lines, p, size))?;

    let bars = ComponentBars::from_summary(
        &output.summary.excluding(&charts_cfg.bar_exclude),
        &charts_cfg.value_unit,
        &charts_cfg.source_note,
    )?;
    emit(bars.file_stem(), &|p: &Path| render(&bars, p, size))?;

    Ok(written)
}

fn spec_of(cfg: &PipelineConfig, key: &str) -> Result<crate::models::SeriesSpec> {
    cfg.spec(key)
        .ok_or_else(|| anyhow!("unknown series {key} in chart configuration"))
}

fn pie_specs(cfg: &PipelineConfig) -> Result<Vec<crate::models::SeriesSpec>> {
    cfg.charts.pie.iter().map(|k| spec_of(cfg, k)).collect()
}
