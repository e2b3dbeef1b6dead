//! Chart geometry, computed before anything is drawn.
//!
//! Everything in this module is a pure function of (matrix, labels, options): bar
//! positions, tick positions, heatmap cells and their annotations, radar angles and
//! closed value sequences, line points and axis ranges. The drawing code in
//! [`crate::viz`] only maps these coordinates onto a backend, so two renders with the
//! same arguments always place labels and marks identically.

use crate::config::{BarOptions, HeatmapOptions, LineOptions, RadarOptions, TraceStyle, ValueBounds};
use crate::error::{ChartError, Result};
use crate::models::ScoreMatrix;
use crate::stats::observed_range;
use crate::viz::types::BarAlignment;
use crate::viz::util::format_number;
use serde::Serialize;
use std::f64::consts::PI;

/// A labelled position along an axis (data units; radians for radar spokes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub label: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub group: usize,
    pub series: usize,
    pub x_center: f64,
    pub width: f64,
    /// `None` for absent cells, which draw no bar.
    pub value: Option<f64>,
    pub annotation: Option<String>,
}

impl Bar {
    pub fn x_left(&self) -> f64 {
        self.x_center - self.width / 2.0
    }

    pub fn x_right(&self) -> f64 {
        self.x_center + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLayout {
    pub bar_width: f64,
    /// Series-major: all bars of series 0, then series 1, ...
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCell {
    pub row: usize,
    pub column: usize,
    /// Plotted value; absent cells plot as zero.
    pub value: f64,
    pub present: bool,
    /// Formatted value, or empty for absent cells.
    pub annotation: String,
    /// Position of `value` within `value_range`, clamped to 0..1.
    pub shade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLayout {
    /// Row label ticks; row 0 is at the top of the grid.
    pub rows: Vec<Tick>,
    pub columns: Vec<Tick>,
    /// Row-major.
    pub cells: Vec<HeatCell>,
    pub value_range: (f64, f64),
}

impl HeatmapLayout {
    pub fn cell(&self, row: usize, column: usize) -> Option<&HeatCell> {
        let n_cols = self.columns.len();
        self.cells.get(row * n_cols + column)
    }

    /// Data-space rectangle `(x0, y0, x1, y1)` of a cell.
    pub fn cell_rect(&self, row: usize, column: usize) -> (f64, f64, f64, f64) {
        let n_rows = self.rows.len();
        let y0 = (n_rows - row - 1) as f64;
        (column as f64, y0, column as f64 + 1.0, y0 + 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarTrace {
    pub label: String,
    /// One value per spoke plus the first value repeated to close the polygon.
    pub values: Vec<Option<f64>>,
    /// Unit-disc coordinates (x right, y up) matching `values`, radius clamped to 0..1.
    pub points: Vec<Option<(f64, f64)>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarLayout {
    /// One angle per spoke plus the first angle repeated.
    pub angles: Vec<f64>,
    pub spokes: Vec<Tick>,
    pub traces: Vec<RadarTrace>,
    pub radial_range: (f64, f64),
    /// Series beyond the configured cap, in caller order.
    pub omitted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub label: String,
    pub style: TraceStyle,
    /// Measured points only; absent cells leave a gap in the x sequence.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayout {
    pub ticks: Vec<Tick>,
    pub traces: Vec<LineTrace>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    Bar(BarLayout),
    Heatmap(HeatmapLayout),
    Radar(RadarLayout),
    Line(LineLayout),
}

impl Layout {
    pub fn as_bar(&self) -> Option<&BarLayout> {
        match self {
            Layout::Bar(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_heatmap(&self) -> Option<&HeatmapLayout> {
        match self {
            Layout::Heatmap(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_radar(&self) -> Option<&RadarLayout> {
        match self {
            Layout::Radar(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineLayout> {
        match self {
            Layout::Line(l) => Some(l),
            _ => None,
        }
    }
}

fn check_bounds(lo: f64, hi: f64, what: &str) -> Result<(f64, f64)> {
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(ChartError::InvalidConfig(format!(
            "{what} bounds must be finite with min < max, got {lo}..{hi}"
        )));
    }
    Ok((lo, hi))
}

/// Completes `bounds` from the kind's `derived` range. An explicit side is kept as
/// given; a missing side falls back to `derived`, or sits one derived span away from the
/// explicit side when the fallback would invert the range.
fn resolve_bounds(bounds: ValueBounds, derived: (f64, f64), what: &str) -> Result<(f64, f64)> {
    let (d_lo, d_hi) = derived;
    let span = if d_hi > d_lo { d_hi - d_lo } else { 1.0 };
    let (lo, hi) = match (bounds.min, bounds.max) {
        (Some(lo), Some(hi)) => (lo, hi),
        (Some(lo), None) => (lo, if d_hi > lo { d_hi } else { lo + span }),
        (None, Some(hi)) => (if d_lo < hi { d_lo } else { hi - span }, hi),
        (None, None) if d_hi > d_lo => (d_lo, d_hi),
        (None, None) => (d_lo, d_lo + 1.0),
    };
    check_bounds(lo, hi, what)
}

/// Default lower bound for bars: below the observed minimum, never below zero for
/// non-negative data.
fn bar_floor(min: f64, margin: f64) -> f64 {
    let floor = ((min - margin) / 5.0).floor() * 5.0;
    if min >= 0.0 { floor.max(0.0) } else { floor }
}

pub fn bar_layout(
    matrix: &ScoreMatrix,
    groups: &[String],
    series: &[String],
    opts: &BarOptions,
    bounds: ValueBounds,
) -> Result<BarLayout> {
    if !(opts.group_width > 0.0 && opts.group_width <= 1.0) {
        return Err(ChartError::InvalidConfig(format!(
            "bar group width must be in (0, 1], got {}",
            opts.group_width
        )));
    }
    if let Some(ann) = &opts.annotations {
        if ann.len() != groups.len() {
            return Err(ChartError::shape("bar annotation rows", groups.len(), ann.len()));
        }
        for row in ann {
            if row.len() != series.len() {
                return Err(ChartError::shape("bar annotation columns", series.len(), row.len()));
            }
        }
    }

    let n = series.len();
    let bar_width = opts.group_width / n as f64;
    let center_of = |g: usize, i: usize| -> f64 {
        match opts.alignment {
            BarAlignment::Leading => g as f64 + i as f64 * bar_width,
            BarAlignment::Centered => g as f64 + (i as f64 - (n as f64 - 1.0) / 2.0) * bar_width,
        }
    };

    let mut bars = Vec::with_capacity(groups.len() * n);
    for i in 0..n {
        for g in 0..groups.len() {
            let value = matrix.get(g, i);
            let annotation = value.and(
                opts.annotations
                    .as_ref()
                    .map(|a| a[g][i].clone())
                    .filter(|s| !s.trim().is_empty()),
            );
            bars.push(Bar {
                group: g,
                series: i,
                x_center: center_of(g, i),
                width: bar_width,
                value,
                annotation,
            });
        }
    }

    let ticks = groups
        .iter()
        .enumerate()
        .map(|(g, label)| Tick {
            label: label.clone(),
            position: match opts.alignment {
                BarAlignment::Leading => g as f64 + bar_width * n as f64 / 2.0,
                BarAlignment::Centered => g as f64,
            },
        })
        .collect();

    let gap = (1.0 - opts.group_width).max(0.1);
    let x_lo = bars.iter().map(Bar::x_left).fold(f64::INFINITY, f64::min) - gap / 2.0;
    let x_hi = bars.iter().map(Bar::x_right).fold(f64::NEG_INFINITY, f64::max) + gap / 2.0;

    let (obs_lo, obs_hi) = observed_range(matrix).unwrap_or((0.0, 1.0));
    let y_range = resolve_bounds(
        bounds,
        (bar_floor(obs_lo, opts.floor_margin), obs_hi + opts.headroom),
        "value axis",
    )?;

    log::debug!(
        "bar layout: {} groups x {} series, bar width {bar_width:.4}, y {:?}",
        groups.len(),
        n,
        y_range
    );

    Ok(BarLayout {
        bar_width,
        bars,
        ticks,
        x_range: (x_lo, x_hi),
        y_range,
    })
}

pub fn heatmap_layout(
    matrix: &ScoreMatrix,
    rows: &[String],
    columns: &[String],
    _opts: &HeatmapOptions,
    bounds: ValueBounds,
    precision: usize,
    locale: &str,
) -> Result<HeatmapLayout> {
    let any_absent = matrix.rows().flatten().any(Option::is_none);
    let (obs_lo, obs_hi) = match observed_range(matrix) {
        Some((lo, hi)) if any_absent => (lo.min(0.0), hi.max(0.0)),
        Some(r) => r,
        None => (0.0, 1.0),
    };
    let value_range = resolve_bounds(bounds, (obs_lo, obs_hi), "heatmap value")?;
    let (lo, hi) = value_range;

    let n_rows = rows.len();
    let mut cells = Vec::with_capacity(n_rows * columns.len());
    for r in 0..n_rows {
        for c in 0..columns.len() {
            let cell = matrix.get(r, c);
            let value = cell.unwrap_or(0.0);
            cells.push(HeatCell {
                row: r,
                column: c,
                value,
                present: cell.is_some(),
                annotation: cell
                    .map(|v| format_number(v, precision, locale))
                    .unwrap_or_default(),
                shade: ((value - lo) / (hi - lo)).clamp(0.0, 1.0),
            });
        }
    }

    Ok(HeatmapLayout {
        rows: rows
            .iter()
            .enumerate()
            .map(|(r, label)| Tick {
                label: label.clone(),
                position: (n_rows - r) as f64 - 0.5,
            })
            .collect(),
        columns: columns
            .iter()
            .enumerate()
            .map(|(c, label)| Tick {
                label: label.clone(),
                position: c as f64 + 0.5,
            })
            .collect(),
        cells,
        value_range,
    })
}

/// Spoke angles `2πk/n + offset` for `k in 0..n`, followed by the first angle again.
pub fn radar_angles(n: usize, offset: f64) -> Vec<f64> {
    let mut angles: Vec<f64> = (0..n)
        .map(|k| 2.0 * PI * k as f64 / n as f64 + offset)
        .collect();
    if let Some(first) = angles.first().copied() {
        angles.push(first);
    }
    angles
}

/// Map a polar `(angle, value)` onto the unit disc for the given radial range.
pub fn polar_to_unit(angle: f64, value: f64, radial_range: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = radial_range;
    let r = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    (r * angle.cos(), r * angle.sin())
}

pub fn radar_layout(
    matrix: &ScoreMatrix,
    groups: &[String],
    series: &[String],
    opts: &RadarOptions,
    bounds: ValueBounds,
) -> Result<RadarLayout> {
    let drawn = match opts.max_series {
        Some(0) => {
            return Err(ChartError::InvalidConfig(
                "radar max_series must be at least 1".into(),
            ));
        }
        Some(cap) => cap.min(series.len()),
        None => series.len(),
    };
    let omitted: Vec<String> = series[drawn..].to_vec();
    if !omitted.is_empty() {
        log::warn!(
            "radar chart draws {drawn} of {} series; omitted: {}",
            series.len(),
            omitted.join(", ")
        );
    }

    let observed = observed_range(matrix);
    let explicit = ValueBounds {
        min: bounds.min,
        max: bounds.max.or(opts.radial_max),
    };
    let derived_hi = observed.map(|(_, hi)| hi).unwrap_or(opts.radial_min);
    let radial_range = resolve_bounds(explicit, (opts.radial_min, derived_hi), "radial")?;
    let lo = radial_range.0;
    if let Some((_, obs_hi)) = observed
        && obs_hi < lo
    {
        return Err(ChartError::InvalidConfig(format!(
            "every radar value is below the radial floor {lo} (largest is {obs_hi}); \
             lower radar.radial_min or value_bounds.min"
        )));
    }

    let angles = radar_angles(groups.len(), opts.angle_offset);
    let mut traces = Vec::with_capacity(drawn);
    for (i, label) in series.iter().take(drawn).enumerate() {
        let mut values = matrix.column(i);
        if let Some(first) = values.first().copied() {
            values.push(first);
        }
        if values.iter().flatten().any(|v| *v < lo) {
            log::warn!("radar series `{label}` has values below the radial floor {lo}; drawn at the centre");
        }
        let points = values
            .iter()
            .zip(&angles)
            .map(|(v, a)| v.map(|v| polar_to_unit(*a, v, radial_range)))
            .collect();
        traces.push(RadarTrace {
            label: label.clone(),
            values,
            points,
        });
    }

    Ok(RadarLayout {
        spokes: groups
            .iter()
            .zip(&angles)
            .map(|(label, a)| Tick {
                label: label.clone(),
                position: *a,
            })
            .collect(),
        angles,
        traces,
        radial_range,
        omitted,
    })
}

/// Padding of an index-based line x axis, in group steps.
const INDEX_AXIS_PAD: f64 = 0.5;

pub fn line_layout(
    matrix: &ScoreMatrix,
    groups: &[String],
    series: &[String],
    opts: &LineOptions,
    bounds: ValueBounds,
) -> Result<LineLayout> {
    let xs: Vec<f64> = match &opts.x_values {
        Some(xs) => {
            if xs.len() != groups.len() {
                return Err(ChartError::shape("line x values", groups.len(), xs.len()));
            }
            if xs.iter().any(|x| !x.is_finite()) {
                return Err(ChartError::InvalidConfig("line x values must be finite".into()));
            }
            if xs.windows(2).any(|w| w[1] <= w[0]) {
                return Err(ChartError::InvalidConfig(
                    "line x values must be strictly increasing".into(),
                ));
            }
            xs.clone()
        }
        None => (0..groups.len()).map(|g| g as f64).collect(),
    };
    if opts.styles.len() > series.len() {
        return Err(ChartError::shape("line styles", series.len(), opts.styles.len()));
    }

    let traces = series
        .iter()
        .enumerate()
        .map(|(i, label)| LineTrace {
            label: label.clone(),
            style: opts.styles.get(i).copied().unwrap_or_default(),
            points: matrix
                .column(i)
                .iter()
                .zip(&xs)
                .filter_map(|(v, x)| v.map(|v| (*x, v)))
                .collect(),
        })
        .collect();

    let x_first = xs.first().copied().unwrap_or(0.0);
    let x_last = xs.last().copied().unwrap_or(0.0);
    // Margins are in data units, so they only apply to caller-supplied x values;
    // index positions get half a step on each side.
    let x_range = if opts.x_values.is_some() {
        check_bounds(opts.x_min.min(x_first), x_last + opts.x_margin, "x axis")?
    } else {
        check_bounds(x_first - INDEX_AXIS_PAD, x_last + INDEX_AXIS_PAD, "x axis")?
    };

    let (obs_lo, obs_hi) = observed_range(matrix).unwrap_or((0.0, 1.0));
    let pad = ((obs_hi - obs_lo) * 0.05).max(1.0);
    let y_range = resolve_bounds(bounds, (obs_lo - pad, obs_hi + pad), "value axis")?;

    Ok(LineLayout {
        ticks: groups
            .iter()
            .zip(&xs)
            .map(|(label, x)| Tick {
                label: label.clone(),
                position: *x,
            })
            .collect(),
        traces,
        x_range,
        y_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("L{i}")).collect()
    }

    #[test]
    fn bar_floor_rounds_down_and_stays_non_negative() {
        assert_eq!(bar_floor(47.02, 10.0), 35.0);
        assert_eq!(bar_floor(3.0, 10.0), 0.0);
        assert_eq!(bar_floor(-2.0, 10.0), -15.0);
    }

    #[test]
    fn centered_bars_are_symmetric_around_group() {
        let m = ScoreMatrix::from_values(vec![vec![1.0, 2.0, 3.0, 4.0]]).unwrap();
        let opts = BarOptions {
            alignment: BarAlignment::Centered,
            ..BarOptions::default()
        };
        let l = bar_layout(&m, &labels(1), &labels(4), &opts, ValueBounds::default()).unwrap();
        let centers: Vec<f64> = l.bars.iter().map(|b| b.x_center).collect();
        assert!((centers[0] + centers[3]).abs() < 1e-12);
        assert!((centers[1] + centers[2]).abs() < 1e-12);
        assert_eq!(l.ticks[0].position, 0.0);
    }

    #[test]
    fn absent_bars_carry_no_annotation() {
        let m = ScoreMatrix::new(vec![vec![Some(60.0), None]]).unwrap();
        let opts = BarOptions {
            annotations: Some(vec![vec!["CoT".into(), "-".into()]]),
            ..BarOptions::default()
        };
        let l = bar_layout(&m, &labels(1), &labels(2), &opts, ValueBounds::default()).unwrap();
        assert_eq!(l.bars[0].annotation.as_deref(), Some("CoT"));
        assert_eq!(l.bars[1].value, None);
        assert_eq!(l.bars[1].annotation, None);
    }

    #[test]
    fn explicit_bounds_are_validated() {
        let m = ScoreMatrix::from_values(vec![vec![1.0]]).unwrap();
        let err = bar_layout(
            &m,
            &labels(1),
            &labels(1),
            &BarOptions::default(),
            ValueBounds { min: Some(5.0), max: Some(5.0) },
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn single_bound_keeps_the_given_side() {
        let d = (50.0, 75.0);
        let only_max = ValueBounds { min: None, max: Some(30.0) };
        assert_eq!(resolve_bounds(only_max, d, "v").unwrap(), (5.0, 30.0));
        let only_min = ValueBounds { min: Some(90.0), max: None };
        assert_eq!(resolve_bounds(only_min, d, "v").unwrap(), (90.0, 115.0));
        let inside = ValueBounds { min: Some(60.0), max: None };
        assert_eq!(resolve_bounds(inside, d, "v").unwrap(), (60.0, 75.0));
        assert_eq!(resolve_bounds(ValueBounds::default(), (3.0, 3.0), "v").unwrap(), (3.0, 4.0));
    }

    #[test]
    fn bar_max_below_derived_floor_is_accepted() {
        let m = ScoreMatrix::from_values(vec![vec![61.0, 70.0]]).unwrap();
        let bounds = ValueBounds { min: None, max: Some(30.0) };
        let l = bar_layout(&m, &labels(1), &labels(2), &BarOptions::default(), bounds).unwrap();
        assert_eq!(l.y_range.1, 30.0);
        assert!(l.y_range.0 < 30.0);
    }

    #[test]
    fn line_min_above_data_is_accepted() {
        let m = ScoreMatrix::from_values(vec![vec![60.0], vec![70.0]]).unwrap();
        let bounds = ValueBounds { min: Some(90.0), max: None };
        let l = line_layout(&m, &labels(2), &labels(1), &LineOptions::default(), bounds).unwrap();
        assert_eq!(l.y_range.0, 90.0);
        assert!(l.y_range.1 > 90.0);

        let bounds = ValueBounds { min: None, max: Some(10.0) };
        let l = line_layout(&m, &labels(2), &labels(1), &LineOptions::default(), bounds).unwrap();
        assert_eq!(l.y_range.1, 10.0);
        assert!(l.y_range.0 < 10.0);
    }

    #[test]
    fn index_line_axis_spans_the_groups() {
        let m = ScoreMatrix::from_values(vec![vec![1.0]; 4]).unwrap();
        let l = line_layout(&m, &labels(4), &labels(1), &LineOptions::default(), ValueBounds::default())
            .unwrap();
        assert_eq!(l.x_range, (-0.5, 3.5));
        let ticks: Vec<f64> = l.ticks.iter().map(|t| t.position).collect();
        assert_eq!(ticks, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn radar_rejects_data_entirely_below_the_floor() {
        let m = ScoreMatrix::from_values(vec![vec![0.5, 0.9, 0.7]; 9]).unwrap();
        let opts = RadarOptions::default();
        let err = radar_layout(&m, &labels(9), &labels(3), &opts, ValueBounds::default()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));

        let opts = RadarOptions { radial_min: 0.0, ..RadarOptions::default() };
        let l = radar_layout(&m, &labels(9), &labels(3), &opts, ValueBounds::default()).unwrap();
        assert_eq!(l.radial_range, (0.0, 0.9));
        assert!(l.traces[0].points.iter().flatten().all(|p| *p != (0.0, 0.0)));
    }

    #[test]
    fn polar_mapping_clamps_to_unit_disc() {
        let (x, y) = polar_to_unit(0.0, 100.0, (20.0, 60.0));
        assert!((x - 1.0).abs() < 1e-12 && y.abs() < 1e-12);
        let (x, y) = polar_to_unit(PI / 2.0, 10.0, (20.0, 60.0));
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn line_x_values_must_increase() {
        let m = ScoreMatrix::from_values(vec![vec![1.0], vec![2.0]]).unwrap();
        let opts = LineOptions {
            x_values: Some(vec![10.0, 10.0]),
            ..LineOptions::default()
        };
        let err = line_layout(&m, &labels(2), &labels(1), &opts, ValueBounds::default()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }
}
