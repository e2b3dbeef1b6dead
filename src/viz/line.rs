//! Line drawing over an ordered numeric x axis with per-series dash and marker.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::util::{format_number, tick_precision};
use super::{DrawContext, PlotRegion, RenderedChart, VALUE_TICKS, tick_label};
use crate::error::{Result, draw_err};
use crate::layout::LineLayout;
use crate::style::LineDash;
use crate::viz_plotters_adapter::{KeyPointAxis, fill_style, line_style, make_marker};

/// `(dash length, gap)` in multiples of the stroke width.
fn dash_pattern(dash: LineDash) -> Option<(u32, u32)> {
    match dash {
        LineDash::Solid => None,
        LineDash::Dash => Some((4, 2)),
        LineDash::Dot => Some((1, 2)),
        // plotters has no mixed pattern; a short dash with a wide gap reads as dash-dot
        LineDash::DashDot => Some((3, 3)),
    }
}

pub(crate) fn draw_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &RenderedChart,
    layout: &LineLayout,
    ctx: &DrawContext,
) -> Result<PlotRegion> {
    let cfg = ctx.config;
    let (w, h) = area.dim_in_pixel();
    let tick_labels: Vec<String> = layout.ticks.iter().map(|t| t.label.clone()).collect();
    let (x_lo, x_hi) = layout.x_range;
    let (y_lo, y_hi) = layout.y_range;
    let key_points: Vec<f64> = layout.ticks.iter().map(|t| t.position).collect();

    let mut plot = ChartBuilder::on(area)
        .margin(ctx.margin_px)
        .set_label_area_size(LabelAreaPosition::Left, ctx.left_gutter_px(&chart.layout, w))
        .set_label_area_size(
            LabelAreaPosition::Bottom,
            ctx.bottom_gutter_px(&tick_labels, h),
        )
        .build_cartesian_2d(KeyPointAxis::new(x_lo..x_hi, key_points), y_lo..y_hi)
        .map_err(draw_err)?;

    let precision = tick_precision(y_lo, y_hi);
    let locale = cfg.locale.as_str();
    let x_fmt = |x: &f64| tick_label(&layout.ticks, *x);
    let y_fmt = |v: &f64| format_number(*v, precision, locale);

    let mut mesh = plot.configure_mesh();
    mesh.x_labels(layout.ticks.len())
        .y_labels(VALUE_TICKS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style(ctx.category_tick_style())
        .y_label_style(ctx.label_style())
        .axis_desc_style(ctx.label_style())
        .axis_style(BLACK.stroke_width(ctx.stroke_px))
        .bold_line_style(RGBColor(224, 224, 224).stroke_width(ctx.stroke_px))
        .light_line_style(TRANSPARENT.stroke_width(1));
    if let Some(desc) = &cfg.x_label {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &cfg.y_label {
        mesh.y_desc(desc.as_str());
    }
    mesh.draw().map_err(draw_err)?;

    let width = ctx.scale.pt(cfg.line.line_width_pt);
    let marker_r = ctx.scale.pt_i(3.5);
    for (trace, color) in layout.traces.iter().zip(&chart.colors) {
        let style = line_style(*color, width);
        match dash_pattern(trace.style.dash) {
            None => {
                plot.draw_series(LineSeries::new(trace.points.clone(), style))
                    .map_err(draw_err)?;
            }
            Some((dash, gap)) => {
                plot.draw_series(DashedLineSeries::new(
                    trace.points.clone(),
                    dash * width,
                    gap * width,
                    style,
                ))
                .map_err(draw_err)?;
            }
        }
        if let Some(shape) = trace.style.marker {
            let plotting = plot.plotting_area();
            for p in &trace.points {
                plotting
                    .draw(&make_marker(*p, marker_r, fill_style(*color), shape))
                    .map_err(draw_err)?;
            }
        }
    }

    Ok(plot.plotting_area().get_pixel_range())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_lines_have_no_pattern() {
        assert_eq!(dash_pattern(LineDash::Solid), None);
        let (dash, gap) = dash_pattern(LineDash::Dot).unwrap();
        assert!(dash < gap);
    }
}
