//! Utility functions for visualization: colors, ranges, locale mapping, label sizing.

use crate::table::Table;
use anyhow::{Result, anyhow};
use num_format::Locale;
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_rgb(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    office_rgb(idx).to_rgba()
}

/// Plotters errors carry backend-specific types; flatten them for `anyhow`.
pub fn plot_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// `(year, value)` points of a column, skipping non-finite cells.
pub fn column_points(table: &Table<f64>, column: &str) -> Result<Vec<(f64, f64)>> {
    let values = table.require(column)?;
    Ok(table
        .years()
        .iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(y, v)| (*y as f64, *v))
        .collect())
}

/// Min/max of all values with 5% headroom; a flat series gets ±1.
pub fn padded_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if (hi - lo).abs() < f64::EPSILON {
        return Some((lo - 1.0, hi + 1.0));
    }
    let pad = (hi - lo) * 0.05;
    Some((lo - pad, hi + pad))
}

/// X range spanning every point's year.
pub fn year_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() {
        return None;
    }
    if lo == hi {
        Some((lo - 1.0, hi + 1.0))
    } else {
        Some((lo, hi))
    }
}

/// Tick label with precision shrinking as magnitude grows.
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `da`, `da_DK`, `de`, `de_DE`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "da" | "da_dk" | "danish" => (&Locale::da, ','),
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Compute a tight label area width for a Y axis (in pixels),
/// based on the formatted tick labels that will appear.
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn compute_label_area_px(ymin: f64, ymax: f64, ticks: usize, font_px: u32) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin + (ymax - ymin) * t;
        max_px = max_px.max(estimate_text_width_px(&format_tick(v), font_px));
    }
    // tick marks and axis description need room too
    max_px.saturating_add(34).clamp(56, 150)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_pads_and_handles_flat_series() {
        let (lo, hi) = padded_range(&[10.0, 20.0]).unwrap();
        assert!((lo - 9.5).abs() < 1e-9 && (hi - 20.5).abs() < 1e-9);
        assert_eq!(padded_range(&[5.0, 5.0]), Some((4.0, 6.0)));
        assert_eq!(padded_range(&[f64::NAN]), None);
    }

    #[test]
    fn ticks_shrink_precision() {
        assert_eq!(format_tick(1234.56), "1235");
        assert_eq!(format_tick(12.345), "12.3");
        assert_eq!(format_tick(-1.234), "-1.23");
    }
}
