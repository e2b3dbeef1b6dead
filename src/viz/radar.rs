//! Radar drawing in pixel space: rings, spokes, spoke labels, one polygon per series.
//!
//! Unit-disc coordinates from the layout (x right, y up) map to pixels as
//! `(cx + R·x, cy − R·y)`.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::util::{category_label_extent_px, format_number, tick_precision};
use super::{DrawContext, PlotRegion, RenderedChart};
use crate::error::{Result, draw_err};
use crate::layout::RadarLayout;
use crate::style::MarkerShape;
use crate::viz_plotters_adapter::{fill_style, line_style, make_marker};

/// Anchor for a label placed just outside the rim at `angle`.
fn spoke_anchor(angle: f64) -> Pos {
    let (s, c) = angle.sin_cos();
    let h = if c > 0.1 {
        HPos::Left
    } else if c < -0.1 {
        HPos::Right
    } else {
        HPos::Center
    };
    let v = if s > 0.1 {
        VPos::Bottom
    } else if s < -0.1 {
        VPos::Top
    } else {
        VPos::Center
    };
    Pos::new(h, v)
}

pub(crate) fn draw_radar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &RenderedChart,
    layout: &RadarLayout,
    ctx: &DrawContext,
) -> Result<PlotRegion> {
    let opts = &ctx.config.radar;
    let (w, h) = area.dim_in_pixel();
    let labels: Vec<String> = layout.spokes.iter().map(|t| t.label.clone()).collect();
    let label_w = category_label_extent_px(&labels, ctx.font_px, w / 4) as i32;
    let gap = (ctx.font_px as i32 / 2).max(2);
    let margin = ctx.margin_px as i32;
    let radius = (w as i32 / 2 - label_w - gap - margin)
        .min(h as i32 / 2 - ctx.font_px as i32 * 2 - margin)
        .max(10);
    let (cx, cy) = (w as i32 / 2, h as i32 / 2);
    let at = |ux: f64, uy: f64, r: i32| -> (i32, i32) {
        (
            cx + (ux * r as f64).round() as i32,
            cy - (uy * r as f64).round() as i32,
        )
    };

    let grid = RGBColor(204, 204, 204).stroke_width(ctx.stroke_px);
    let rings = opts.rings.max(1) as i32;
    for k in 1..rings {
        area.draw(&Circle::new((cx, cy), radius * k / rings, grid))
            .map_err(draw_err)?;
    }
    area.draw(&Circle::new((cx, cy), radius, BLACK.stroke_width(ctx.stroke_px)))
        .map_err(draw_err)?;

    let label_style = ctx.label_style();
    for spoke in &layout.spokes {
        let (s, c) = spoke.position.sin_cos();
        area.draw(&PathElement::new(vec![(cx, cy), at(c, s, radius)], grid))
            .map_err(draw_err)?;
        area.draw(&Text::new(
            spoke.label.as_str(),
            at(c, s, radius + gap),
            label_style.pos(spoke_anchor(spoke.position)),
        ))
        .map_err(draw_err)?;
    }

    if opts.radial_labels {
        let (lo, hi) = layout.radial_range;
        let precision = tick_precision(lo, hi);
        let style = label_style.pos(Pos::new(HPos::Left, VPos::Bottom));
        for k in 1..=rings {
            let value = lo + (hi - lo) * k as f64 / rings as f64;
            area.draw(&Text::new(
                format_number(value, precision, &ctx.config.locale),
                (cx + gap / 2, cy - radius * k / rings),
                style.clone(),
            ))
            .map_err(draw_err)?;
        }
    }

    let width = ctx.scale.pt(opts.line_width_pt);
    let marker_r = ctx.scale.pt_i(3.0);
    for (trace, color) in layout.traces.iter().zip(&chart.colors) {
        let style = line_style(*color, width);
        // Absent values break the outline into separate runs.
        let mut run: Vec<(i32, i32)> = Vec::new();
        for point in &trace.points {
            match point {
                Some((ux, uy)) => run.push(at(*ux, *uy, radius)),
                None => {
                    if run.len() > 1 {
                        area.draw(&PathElement::new(std::mem::take(&mut run), style))
                            .map_err(draw_err)?;
                    }
                    run.clear();
                }
            }
        }
        if run.len() > 1 {
            area.draw(&PathElement::new(run, style)).map_err(draw_err)?;
        }

        if opts.markers {
            let spokes = trace.points.len().saturating_sub(1);
            for (ux, uy) in trace.points.iter().take(spokes).flatten() {
                area.draw(&make_marker(
                    at(*ux, *uy, radius),
                    marker_r,
                    fill_style(*color),
                    MarkerShape::Circle,
                ))
                .map_err(draw_err)?;
            }
        }
    }

    let (xr, yr) = area.get_pixel_range();
    Ok((
        xr.start + cx - radius..xr.start + cx + radius,
        yr.start + cy - radius..yr.start + cy + radius,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn labels_are_anchored_away_from_the_rim() {
        let right = spoke_anchor(0.0);
        assert!(matches!(right.h_pos, HPos::Left));
        assert!(matches!(right.v_pos, VPos::Center));
        let top = spoke_anchor(PI / 2.0);
        assert!(matches!(top.h_pos, HPos::Center));
        assert!(matches!(top.v_pos, VPos::Bottom));
        let left = spoke_anchor(PI);
        assert!(matches!(left.h_pos, HPos::Right));
    }
}
