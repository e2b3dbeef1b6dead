//! Render configuration.
//!
//! Every struct here implements `Default` and deserializes with `#[serde(default)]`, so a
//! JSON config file only needs to name the options it changes:
//!
//! ```json
//! {
//!   "kind": "bar",
//!   "title": "Comparison of Settings Across Datasets",
//!   "y_label": "F1-Macro Score",
//!   "value_bounds": { "min": 30.0 },
//!   "colors": { "policy": "cyclic", "palette": "tab20c" },
//!   "bar": { "group_width": 0.8 }
//! }
//! ```

use crate::models::MissingLabelPolicy;
use crate::style::{ColorAssignment, Colormap, LineDash, MarkerShape};
use crate::viz::types::{
    BarAlignment, ChartKind, DEFAULT_DPI, DEFAULT_LEGEND_MODE, LegendMode, OutputFormat,
    TickRotation,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional lower/upper bounds of the value axis. Unset bounds are derived per chart kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Physical figure size and file encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureOptions {
    pub width_in: f64,
    pub height_in: f64,
    /// Pixels per inch for file output; font sizes are given in points and scale with it.
    pub dpi: u32,
    /// Crop the saved image to its drawn content plus `pad_in`.
    pub tight_bbox: bool,
    pub pad_in: f64,
    /// Overrides the format inferred from the output extension.
    pub format: Option<OutputFormat>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            width_in: 12.0,
            height_in: 6.0,
            dpi: DEFAULT_DPI,
            tight_bbox: true,
            pad_in: 0.1,
            format: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub mode: LegendMode,
    pub title: Option<String>,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            mode: DEFAULT_LEGEND_MODE,
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    /// Fraction of the unit group slot covered by the bars; the rest is inter-group gap.
    pub group_width: f64,
    pub alignment: BarAlignment,
    /// Default lower bound = observed minimum minus this margin, rounded down to a multiple of 5.
    pub floor_margin: f64,
    /// Default upper bound = observed maximum plus this headroom.
    pub headroom: f64,
    /// Per-cell text drawn above each bar (rows = groups, columns = series).
    pub annotations: Option<Vec<Vec<String>>>,
    /// Bold title drawn inside the top of the plot area.
    pub inset_title: Option<String>,
    /// Horizontal grid lines at the value ticks.
    pub grid: bool,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            group_width: 0.8,
            alignment: BarAlignment::Leading,
            floor_margin: 10.0,
            headroom: 5.0,
            annotations: None,
            inset_title: None,
            grid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    pub colormap: Colormap,
    pub annotate: bool,
    pub colorbar: bool,
    /// Cell separator width in points (drawn gray).
    pub cell_border_pt: f64,
    pub square_cells: bool,
    pub missing_labels: MissingLabelPolicy,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            colormap: Colormap::Blues,
            annotate: true,
            colorbar: true,
            cell_border_pt: 0.5,
            square_cells: true,
            missing_labels: MissingLabelPolicy::Lenient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarOptions {
    /// Added to every spoke angle, in radians.
    pub angle_offset: f64,
    /// Radial lower bound (polygon centre), independent of the data. The default of 20
    /// assumes scores on a 0..100 scale; lower it for 0..1 scores, since a chart whose
    /// values all fall below the floor is rejected.
    pub radial_min: f64,
    /// Radial upper bound; defaults to the observed maximum when unset.
    pub radial_max: Option<f64>,
    /// Concentric grid rings between the bounds.
    pub rings: usize,
    /// Draw at most this many series; the rest are reported in `RenderedChart::omitted_series`.
    pub max_series: Option<usize>,
    pub markers: bool,
    pub radial_labels: bool,
    pub line_width_pt: f64,
}

impl Default for RadarOptions {
    fn default() -> Self {
        Self {
            angle_offset: 0.0,
            radial_min: 20.0,
            radial_max: None,
            rings: 4,
            max_series: None,
            markers: true,
            radial_labels: false,
            line_width_pt: 2.0,
        }
    }
}

/// Stroke style of one line series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceStyle {
    pub dash: LineDash,
    pub marker: Option<MarkerShape>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    /// Numeric x position per group; defaults to `0, 1, 2, ...`.
    pub x_values: Option<Vec<f64>>,
    /// Default x upper bound = max(x) + this margin, for explicit `x_values` only.
    pub x_margin: f64,
    /// Default x lower bound, for explicit `x_values` only.
    pub x_min: f64,
    /// Per-series styles in series order; missing entries are solid without markers.
    pub styles: Vec<TraceStyle>,
    pub line_width_pt: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            x_values: None,
            x_margin: 100.0,
            x_min: 0.0,
            styles: Vec::new(),
            line_width_pt: 2.0,
        }
    }
}

/// Cosmetic options for one render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub value_bounds: ValueBounds,
    pub colors: ColorAssignment,
    /// When set, `render` writes the chart here before returning.
    pub output: Option<PathBuf>,
    pub figure: FigureOptions,
    pub legend: LegendOptions,
    /// Number formatting locale tag (`en`, `de`, `fr`, ...).
    pub locale: String,
    /// Decimal places for annotations and value tick labels.
    pub annotation_precision: usize,
    pub tick_rotation: TickRotation,
    pub font_pt: f64,
    pub title_font_pt: f64,
    pub bar: BarOptions,
    pub heatmap: HeatmapOptions,
    pub radar: RadarOptions,
    pub line: LineOptions,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::Bar,
            title: None,
            x_label: None,
            y_label: None,
            value_bounds: ValueBounds::default(),
            colors: ColorAssignment::default(),
            output: None,
            figure: FigureOptions::default(),
            legend: LegendOptions::default(),
            locale: "en".to_string(),
            annotation_precision: 2,
            tick_rotation: TickRotation::Horizontal,
            font_pt: 10.0,
            title_font_pt: 14.0,
            bar: BarOptions::default(),
            heatmap: HeatmapOptions::default(),
            radar: RadarOptions::default(),
            line: LineOptions::default(),
        }
    }
}

impl ChartConfig {
    /// Default config for the given chart kind.
    pub fn for_kind(kind: ChartKind) -> Self {
        let mut cfg = Self {
            kind,
            ..Self::default()
        };
        match kind {
            ChartKind::Heatmap => {
                cfg.figure.width_in = 10.0;
                cfg.legend.mode = LegendMode::Hidden;
            }
            ChartKind::Radar => {
                cfg.figure.width_in = 8.0;
                cfg.figure.height_in = 8.0;
                cfg.legend.mode = LegendMode::Right;
            }
            ChartKind::Line => {
                cfg.figure.width_in = 10.0;
                cfg.legend.mode = LegendMode::Inside;
            }
            ChartKind::Bar => {}
        }
        cfg
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_colors(mut self, colors: ColorAssignment) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_value_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.value_bounds = ValueBounds { min, max };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Palette;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ChartConfig = serde_json::from_str(
            r#"{"kind":"radar","radar":{"max_series":5},"colors":{"policy":"cyclic","palette":"tab10"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.kind, ChartKind::Radar);
        assert_eq!(cfg.radar.max_series, Some(5));
        assert_eq!(cfg.radar.rings, 4);
        assert_eq!(cfg.figure.dpi, 300);
        assert_eq!(cfg.bar.group_width, 0.8);
        assert_eq!(cfg.colors, ColorAssignment::Cyclic { palette: Palette::Tab10 });
    }

    #[test]
    fn radar_and_line_strokes_are_separate() {
        let cfg: ChartConfig =
            serde_json::from_str(r#"{"kind":"radar","radar":{"line_width_pt":3.5}}"#).unwrap();
        assert_eq!(cfg.radar.line_width_pt, 3.5);
        assert_eq!(cfg.line.line_width_pt, 2.0);
    }

    #[test]
    fn kind_defaults() {
        let radar = ChartConfig::for_kind(ChartKind::Radar);
        assert_eq!(radar.figure.width_in, radar.figure.height_in);
        assert_eq!(radar.legend.mode, LegendMode::Right);
        assert_eq!(ChartConfig::for_kind(ChartKind::Heatmap).legend.mode, LegendMode::Hidden);
    }
}
