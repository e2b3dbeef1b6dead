//! Annotated heatmap drawing: filled cells, gray cell lines, a full outer border and an
//! optional colorbar on the right.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::util::{format_number, tick_precision};
use super::{DrawContext, PlotRegion, tick_label};
use crate::error::{Result, draw_err};
use crate::layout::HeatmapLayout;
use crate::style::Colormap;
use crate::viz_plotters_adapter::{KeyPointAxis, fill_style};

const COLORBAR_SLICES: usize = 64;
const COLORBAR_TICKS: usize = 5;

pub(crate) fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    layout: &HeatmapLayout,
    ctx: &DrawContext,
) -> Result<PlotRegion> {
    let cfg = ctx.config;
    let opts = &cfg.heatmap;
    let n_rows = layout.rows.len();
    let n_cols = layout.columns.len();
    let (w, h) = area.dim_in_pixel();

    let colorbar_w = if opts.colorbar { ctx.font_px * 6 } else { 0 };
    let (main, colorbar) = if opts.colorbar {
        let (main, bar) = area.split_horizontally(w.saturating_sub(colorbar_w) as i32);
        (main, Some(bar))
    } else {
        (area.clone(), None)
    };
    let (main_w, main_h) = main.dim_in_pixel();

    let column_labels: Vec<String> = layout.columns.iter().map(|t| t.label.clone()).collect();
    let row_labels: Vec<String> = layout.rows.iter().map(|t| t.label.clone()).collect();
    let left = ctx.category_gutter_px(&row_labels, main_w) + ctx.y_desc_px();
    let bottom = ctx.bottom_gutter_px(&column_labels, main_h);
    let frame_w = left + ctx.margin_px * 2;
    let frame_h = bottom + ctx.margin_px * 2;

    let grid_area = if opts.square_cells && main_w > frame_w && main_h > frame_h {
        let cell = ((main_w - frame_w) / n_cols as u32)
            .min((main_h - frame_h) / n_rows as u32)
            .max(1);
        let grid_w = cell * n_cols as u32 + frame_w;
        let grid_h = cell * n_rows as u32 + frame_h;
        main.clone().shrink(
            ((main_w.saturating_sub(grid_w) / 2), (main_h.saturating_sub(grid_h) / 2)),
            (grid_w, grid_h),
        )
    } else {
        main.clone()
    };

    let x_keys: Vec<f64> = layout.columns.iter().map(|t| t.position).collect();
    let y_keys: Vec<f64> = layout.rows.iter().map(|t| t.position).collect();
    let mut plot = ChartBuilder::on(&grid_area)
        .margin(ctx.margin_px)
        .set_label_area_size(LabelAreaPosition::Left, left)
        .set_label_area_size(LabelAreaPosition::Bottom, bottom)
        .build_cartesian_2d(
            KeyPointAxis::new(0.0..n_cols as f64, x_keys),
            KeyPointAxis::new(0.0..n_rows as f64, y_keys),
        )
        .map_err(draw_err)?;

    let x_fmt = |x: &f64| tick_label(&layout.columns, *x);
    let y_fmt = |y: &f64| tick_label(&layout.rows, *y);
    let mut mesh = plot.configure_mesh();
    mesh.disable_x_mesh()
        .disable_y_mesh()
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style(ctx.category_tick_style())
        .y_label_style(ctx.label_style())
        .axis_desc_style(ctx.label_style())
        .axis_style(BLACK.stroke_width(ctx.stroke_px));
    if let Some(desc) = &cfg.x_label {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &cfg.y_label {
        mesh.y_desc(desc.as_str());
    }
    mesh.draw().map_err(draw_err)?;

    let fills: Vec<_> = layout
        .cells
        .iter()
        .map(|cell| {
            let (x0, y0, x1, y1) = layout.cell_rect(cell.row, cell.column);
            let color = opts.colormap.sample(cell.shade);
            (cell, [(x0, y0), (x1, y1)], color)
        })
        .collect();

    plot.draw_series(
        fills
            .iter()
            .map(|(_, rect, color)| Rectangle::new(*rect, fill_style(*color))),
    )
    .map_err(draw_err)?;

    if opts.cell_border_pt > 0.0 {
        let line = RGBColor(128, 128, 128).stroke_width(ctx.scale.pt(opts.cell_border_pt));
        plot.draw_series(fills.iter().map(|(_, rect, _)| Rectangle::new(*rect, line)))
            .map_err(draw_err)?;
    }

    if opts.annotate {
        let base = ctx.label_style().pos(Pos::new(HPos::Center, VPos::Center));
        let light = base.color(&WHITE);
        let dark = base.color(&BLACK);
        plot.draw_series(fills.iter().filter(|(cell, _, _)| cell.present).map(
            |(cell, [(x0, y0), (x1, y1)], color)| {
                let style = if color.luminance() < 0.5 { &light } else { &dark };
                Text::new(
                    cell.annotation.clone(),
                    ((x0 + x1) / 2.0, (y0 + y1) / 2.0),
                    style.clone(),
                )
            },
        ))
        .map_err(draw_err)?;
    }

    // All four sides, independent of which axes plotters draws.
    plot.draw_series(std::iter::once(Rectangle::new(
        [(0.0, 0.0), (n_cols as f64, n_rows as f64)],
        BLACK.stroke_width(ctx.stroke_px),
    )))
    .map_err(draw_err)?;

    let region = plot.plotting_area().get_pixel_range();

    if let Some(bar) = colorbar {
        draw_colorbar(&bar, &region, layout.value_range, opts.colormap, ctx)?;
    }

    Ok(region)
}

/// Vertical colour ramp aligned with the grid's pixel rows, labelled on its right.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    grid: &PlotRegion,
    (lo, hi): (f64, f64),
    colormap: Colormap,
    ctx: &DrawContext,
) -> Result<()> {
    let (_, own_y) = area.get_pixel_range();
    let top = grid.1.start - own_y.start;
    let bottom = grid.1.end - own_y.start;
    let x0 = ctx.font_px as i32;
    let x1 = x0 + ctx.font_px as i32;
    let span = (bottom - top).max(1) as f64;

    for k in 0..COLORBAR_SLICES {
        let t0 = k as f64 / COLORBAR_SLICES as f64;
        let t1 = (k + 1) as f64 / COLORBAR_SLICES as f64;
        let y_hi = bottom - (t1 * span).round() as i32;
        let y_lo = bottom - (t0 * span).round() as i32;
        let color = colormap.sample((t0 + t1) / 2.0);
        area.draw(&Rectangle::new([(x0, y_hi), (x1, y_lo)], fill_style(color)))
            .map_err(draw_err)?;
    }
    area.draw(&Rectangle::new(
        [(x0, top), (x1, bottom)],
        BLACK.stroke_width(ctx.stroke_px),
    ))
    .map_err(draw_err)?;

    let precision = tick_precision(lo, hi);
    let style = ctx.label_style().pos(Pos::new(HPos::Left, VPos::Center));
    let tick_len = (ctx.font_px as i32 / 3).max(2);
    for i in 0..COLORBAR_TICKS {
        let t = i as f64 / (COLORBAR_TICKS - 1) as f64;
        let y = bottom - (t * span).round() as i32;
        area.draw(&PathElement::new(
            vec![(x1, y), (x1 + tick_len, y)],
            BLACK.stroke_width(ctx.stroke_px),
        ))
        .map_err(draw_err)?;
        let label = format_number(lo + (hi - lo) * t, precision, &ctx.config.locale);
        area.draw(&Text::new(label, (x1 + tick_len * 2, y), style.clone()))
            .map_err(draw_err)?;
    }
    Ok(())
}
