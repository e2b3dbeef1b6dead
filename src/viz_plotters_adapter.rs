//! Adapter helpers to use crate styles with the plotters crate.
//!
//! Usage example (inside a plotting function):
//! ```ignore
//!     use plotters::prelude::*;
//!     use crate::viz_plotters_adapter::{line_style, fill_style, make_marker};
//!
//!     // 1) Draw a line:
//!     chart.draw_series(LineSeries::new(points.clone(), line_style(color, 6)))?;
//!
//!     // 2) Draw markers along the line:
//!     chart.draw_series(points.iter().map(|p| make_marker(*p, 12, fill_style(color), MarkerShape::Square)))?;
//!
//!     // 3) For bars: use `fill_style(color)` with Rectangle::new(..., fill_style(color))
//! ```

use std::ops::Range;

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::element::DynElement;
use plotters::prelude::*;

use crate::style::{MarkerShape, Rgba};

pub fn rgba_color(color: Rgba) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a as f64 / 255.0)
}

/// Build a ShapeStyle for line strokes.
/// Plotters’ dashed strokes are backend-dependent; combine lines with markers for redundancy.
pub fn line_style(color: Rgba, width_px: u32) -> ShapeStyle {
    rgba_color(color).stroke_width(width_px)
}

/// Build a filled style for bars, cells and markers.
pub fn fill_style(color: Rgba) -> ShapeStyle {
    rgba_color(color).filled()
}

/// Linear `f64` axis whose bold ticks sit only at fixed positions, e.g. category centres.
///
/// Labels come from the mesh's label formatter; the fallback prints the raw value.
#[derive(Clone)]
pub struct KeyPointAxis {
    inner: RangedCoordf64,
    keys: Vec<f64>,
}

impl KeyPointAxis {
    pub fn new(range: Range<f64>, keys: Vec<f64>) -> Self {
        let keys = keys.into_iter().filter(|k| range.contains(k) || *k == range.end).collect();
        Self {
            inner: range.into(),
            keys,
        }
    }

    pub fn keys(&self) -> &[f64] {
        &self.keys
    }
}

impl Ranged for KeyPointAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        // no light lines between categories
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.keys.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

impl ValueFormatter<f64> for KeyPointAxis {
    fn format_ext(&self, value: &f64) -> String {
        format!("{value}")
    }
}

/// Construct a marker element of half-size `s` pixels anchored at data coordinate `c`.
pub fn make_marker<'a, DB, C>(
    c: C,
    s: i32,
    st: ShapeStyle,
    marker: MarkerShape,
) -> DynElement<'a, DB, C>
where
    DB: DrawingBackend + 'a,
    C: Clone + 'a,
{
    let stroke = (s / 3).max(1) as u32;
    match marker {
        MarkerShape::Circle => {
            (EmptyElement::at(c) + Circle::new((0, 0), s, st.filled())).into_dyn()
        }
        MarkerShape::Square => {
            (EmptyElement::at(c) + Rectangle::new([(-s, -s), (s, s)], st.filled())).into_dyn()
        }
        MarkerShape::Triangle => (EmptyElement::at(c)
            + Polygon::new(vec![(0, -s), (-s, s), (s, s)], st.filled()))
        .into_dyn(),
        MarkerShape::Diamond => (EmptyElement::at(c)
            + Polygon::new(vec![(0, -s), (-s, 0), (0, s), (s, 0)], st.filled()))
        .into_dyn(),
        MarkerShape::Cross => (EmptyElement::at(c)
            + PathElement::new(vec![(-s, 0), (s, 0)], st.stroke_width(stroke))
            + PathElement::new(vec![(0, -s), (0, s)], st.stroke_width(stroke)))
        .into_dyn(),
        MarkerShape::X => (EmptyElement::at(c)
            + PathElement::new(vec![(-s, -s), (s, s)], st.stroke_width(stroke))
            + PathElement::new(vec![(-s, s), (s, -s)], st.stroke_width(stroke)))
        .into_dyn(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_point_axis_ticks_only_at_keys() {
        let axis = KeyPointAxis::new(0.0..4.0, vec![0.5, 1.5, 2.5, 3.5, 9.0]);
        assert_eq!(axis.keys(), &[0.5, 1.5, 2.5, 3.5]);
        assert_eq!(axis.key_points(2usize), Vec::<f64>::new());
        assert_eq!(
            axis.key_points(plotters::coord::ranged1d::BoldPoints(2)),
            vec![0.5, 1.5, 2.5, 3.5]
        );
        assert_eq!(axis.range(), 0.0..4.0);
        assert_eq!(axis.map(&2.0, (0, 100)), 50);
        assert_eq!(axis.format_ext(&1.5), "1.5");
    }

    #[test]
    fn alpha_maps_to_unit_interval() {
        let c = rgba_color(Rgba::new(10, 20, 30, 51));
        assert_eq!((c.0, c.1, c.2), (10, 20, 30));
        assert!((c.3 - 0.2).abs() < 1e-9);
        assert_eq!(rgba_color(Rgba::rgb(1, 2, 3)).3, 1.0);
    }
}
