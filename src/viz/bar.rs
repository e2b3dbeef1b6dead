//! Grouped bar drawing.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::util::{format_number, tick_precision};
use super::{DrawContext, PlotRegion, RenderedChart, VALUE_TICKS, tick_label};
use crate::error::{Result, draw_err};
use crate::layout::BarLayout;
use crate::viz_plotters_adapter::{KeyPointAxis, fill_style};

pub(crate) fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &RenderedChart,
    layout: &BarLayout,
    ctx: &DrawContext,
) -> Result<PlotRegion> {
    let cfg = ctx.config;
    let (w, h) = area.dim_in_pixel();
    let group_labels: Vec<String> = layout.ticks.iter().map(|t| t.label.clone()).collect();
    let (x_lo, x_hi) = layout.x_range;
    let (y_lo, y_hi) = layout.y_range;
    let key_points: Vec<f64> = layout.ticks.iter().map(|t| t.position).collect();

    let mut plot = ChartBuilder::on(area)
        .margin(ctx.margin_px)
        .set_label_area_size(LabelAreaPosition::Left, ctx.left_gutter_px(&chart.layout, w))
        .set_label_area_size(
            LabelAreaPosition::Bottom,
            ctx.bottom_gutter_px(&group_labels, h),
        )
        .build_cartesian_2d(KeyPointAxis::new(x_lo..x_hi, key_points), y_lo..y_hi)
        .map_err(draw_err)?;

    let precision = tick_precision(y_lo, y_hi);
    let locale = cfg.locale.as_str();
    let x_fmt = |x: &f64| tick_label(&layout.ticks, *x);
    let y_fmt = |v: &f64| format_number(*v, precision, locale);

    let mut mesh = plot.configure_mesh();
    mesh.disable_x_mesh()
        .x_labels(layout.ticks.len())
        .y_labels(VALUE_TICKS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style(ctx.category_tick_style())
        .y_label_style(ctx.label_style())
        .axis_desc_style(ctx.label_style())
        .axis_style(BLACK.stroke_width(ctx.stroke_px))
        .bold_line_style(RGBColor(204, 204, 204).stroke_width(ctx.stroke_px))
        .light_line_style(TRANSPARENT.stroke_width(1));
    if !cfg.bar.grid {
        mesh.disable_y_mesh();
    }
    if let Some(desc) = &cfg.x_label {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &cfg.y_label {
        mesh.y_desc(desc.as_str());
    }
    mesh.draw().map_err(draw_err)?;

    // Bars grow from zero; the visible part is clipped to the value axis.
    let mut rects = Vec::with_capacity(layout.bars.len());
    for bar in &layout.bars {
        let Some(v) = bar.value else { continue };
        let y0 = v.min(0.0).clamp(y_lo, y_hi);
        let y1 = v.max(0.0).clamp(y_lo, y_hi);
        if y1 <= y0 {
            continue;
        }
        rects.push(Rectangle::new(
            [(bar.x_left(), y0), (bar.x_right(), y1)],
            fill_style(chart.colors[bar.series]),
        ));
    }
    plot.draw_series(rects).map_err(draw_err)?;

    let pad = ctx.scale.pt_i(2.0);
    let annotation_style = TextStyle::from((FontFamily::SansSerif, ctx.scale.pt(cfg.font_pt * 0.8)))
        .transform(FontTransform::Rotate270)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let annotations = layout.bars.iter().filter_map(|bar| {
        let text = bar.annotation.as_ref()?;
        let top = bar.value?.max(0.0).clamp(y_lo, y_hi);
        Some(
            EmptyElement::at((bar.x_center, top))
                + Text::new(text.clone(), (0, -pad), annotation_style.clone()),
        )
    });
    plot.draw_series(annotations).map_err(draw_err)?;

    if let Some(title) = cfg.bar.inset_title.as_deref().filter(|t| !t.trim().is_empty()) {
        let style = ctx
            .bold_style(ctx.font_px + ctx.font_px / 5)
            .pos(Pos::new(HPos::Center, VPos::Top));
        plot.draw_series(std::iter::once(
            EmptyElement::at(((x_lo + x_hi) / 2.0, y_hi))
                + Text::new(title.to_string(), (0, pad * 2), style),
        ))
        .map_err(draw_err)?;
    }

    Ok(plot.plotting_area().get_pixel_range())
}
