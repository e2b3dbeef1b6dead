//! Public types and constants for the visualization module.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (upper right, may overlap data).
    Inside,
    /// Separate, non-overlapping legend panel on the right side.
    Right,
    /// Separate, non-overlapping legend band at the top.
    Top,
    /// Separate, non-overlapping legend band at the bottom.
    Bottom,
    /// No legend.
    Hidden,
}

/// Chart kinds supported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Grouped bars: one cluster per group, one bar per series.
    #[default]
    Bar,
    /// Annotated cell grid: rows are groups (sources), columns are series (targets).
    Heatmap,
    /// Polar polygon per series over one spoke per group.
    Radar,
    /// One line per series over an ordered numeric x axis (one x per group).
    Line,
}

/// Where the bars of one group sit relative to the group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarAlignment {
    /// Bar `i` centred at `g + i * bar_width`; group tick at `g + bar_width * n / 2`.
    #[default]
    Leading,
    /// Bars spread symmetrically around `g`; group tick at `g`.
    Centered,
}

/// Rotation of category tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickRotation {
    #[default]
    Horizontal,
    Vertical,
}

/// Output image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl OutputFormat {
    /// Infer from the file extension; anything unknown is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("svg") => OutputFormat::Svg,
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            Some("bmp") => OutputFormat::Bmp,
            _ => OutputFormat::Png,
        }
    }
}

/// Default legend placement: horizontal band **below** the chart.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Bottom;

/// Resolution used for files, in dots per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Resolution used for the interactive display.
pub const SCREEN_DPI: u32 = 100;
