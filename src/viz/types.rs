//! Public types for the visualization module.

use std::path::Path;

/// Output format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChartFormat {
    #[default]
    Svg,
    Png,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }

    /// `.svg` renders vector output; anything else goes through the bitmap backend.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartFormat::Svg,
            _ => ChartFormat::Png,
        }
    }
}

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

/// Height of the footnote band carrying the source note.
pub const FOOTNOTE_PX: u32 = 24;
