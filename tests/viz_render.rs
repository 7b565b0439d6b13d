mod common;

use common::raw_series;
use dstna_rs::models::SeriesSpec;
use dstna_rs::viz::{self, ChartFormat, ChartSize, ComponentPies, LinesChart};
use dstna_rs::{PipelineConfig, PipelineError, Table, build};
use tempfile::tempdir;

#[test]
fn render_all_writes_every_chart_as_svg() {
    let cfg = PipelineConfig::default();
    let out = build(&raw_series(), &cfg).unwrap();
    let dir = tempdir().unwrap();
    let written = viz::render_all(&out, &cfg, dir.path(), ChartFormat::Svg, ChartSize::default())
        .unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "components_pie.svg",
            "paired_priv_cons.svg",
            "paired_publ_cons.svg",
            "paired_inv.svg",
            "paired_nx.svg",
            "exports_imports.svg",
            "components_bar.svg",
        ]
    );
    for path in &written {
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("<svg"), "{} is not an svg", path.display());
    }
}

#[test]
fn render_png() {
    let cfg = PipelineConfig::default();
    let out = build(&raw_series(), &cfg).unwrap();
    let dir = tempdir().unwrap();
    let size = ChartSize {
        width: 800,
        height: 400,
    };
    let written = viz::render_all(&out, &cfg, dir.path(), ChartFormat::Png, size).unwrap();
    assert_eq!(written.len(), 7);
    for path in &written {
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}

#[test]
fn tiny_canvas_is_rejected() {
    let cfg = PipelineConfig::default();
    let out = build(&raw_series(), &cfg).unwrap();
    let exports = cfg.spec("exp").unwrap();
    let chart = LinesChart::from_levels("exp", "Exports", &out.levels, &[&exports], "DKK", "")
        .unwrap();
    let dir = tempdir().unwrap();
    let size = ChartSize {
        width: 100,
        height: 100,
    };
    assert!(viz::render(&chart, dir.path().join("exp.svg"), size).is_err());
}

#[test]
fn negative_pie_share_is_rejected() {
    let mut levels = Table::from_pairs("a", vec![(1980, 10.0), (2018, 12.0)]).unwrap();
    levels.push_column("b", vec![-1.0, 3.0]).unwrap();
    let specs = [
        SeriesSpec::new("a", "", "Alpha", "A"),
        SeriesSpec::new("b", "", "Beta", "B"),
    ];
    let err = ComponentPies::from_levels(&levels, &specs, 1980, 2018, "").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidShares(_))
    ));
}

#[test]
fn unknown_line_series_is_an_error() {
    let levels = Table::from_pairs("a", vec![(1980, 1.0), (1981, 2.0)]).unwrap();
    let missing = SeriesSpec::new("zz", "", "Missing", "Missing");
    assert!(LinesChart::from_levels("x", "x", &levels, &[&missing], "", "").is_err());
}
