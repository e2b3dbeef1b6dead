//! Legend layout and drawing for external bands/panels and the inside box.
//!
//! Top/Bottom bands use a table-like flow: items are greedily packed into rows, column
//! widths come from the longest single-line label per column when they fit, and fall back
//! to uniform slots with wrapping otherwise. The estimator and the drawer share
//! [`pack_table`] so the reserved band height always matches what is drawn.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{block_width_px, estimate_text_width_px, wrap_text_to_width};
use super::types::LegendMode;
use crate::error::{Result, draw_err};
use crate::style::{LineDash, MarkerShape, Rgba};
use crate::viz_plotters_adapter::{fill_style, line_style, rgba_color};

/// What is drawn left of a legend label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendGlyph {
    /// Filled square (bars).
    Swatch,
    /// Short line sample with its dash pattern, optionally with a marker on top.
    Line {
        dash: LineDash,
        marker: Option<MarkerShape>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: Rgba,
    pub glyph: LegendGlyph,
}

/// Pixel constants of one legend, all derived from the label font size.
#[derive(Debug, Clone, Copy)]
pub struct LegendMetrics {
    pub font_px: u32,
    pub title_font_px: u32,
    pub line_h: i32,
    pub row_gap: i32,
    pub pad: i32,
    pub marker_radius: i32,
    pub glyph_w: i32,
    pub glyph_gap: i32,
    pub trailing_gap: i32,
    pub stroke_px: u32,
}

impl LegendMetrics {
    pub fn new(font_px: u32) -> Self {
        let f = font_px as i32;
        Self {
            font_px,
            title_font_px: font_px + font_px / 7 + 1,
            line_h: f + f / 7 + 1,
            row_gap: (f / 3).max(2),
            pad: (f / 2).max(4),
            marker_radius: (f * 2 / 7).max(2),
            glyph_w: f * 2,
            glyph_gap: (f * 5 / 7).max(4),
            trailing_gap: f,
            stroke_px: (font_px / 7).max(1),
        }
    }

    fn block_overhead(&self) -> i32 {
        self.glyph_w + self.glyph_gap + self.trailing_gap
    }

    fn title_h(&self, has_title: bool) -> i32 {
        if has_title {
            self.title_font_px as i32 + self.row_gap * 2
        } else {
            0
        }
    }
}

/// Rows of item indices plus per-column x offsets and text caps.
struct TableLayout {
    rows: Vec<Vec<usize>>,
    col_x: Vec<i32>,
    text_cap: Vec<u32>,
}

fn pack_table(labels: &[String], start_x: i32, total_w: i32, m: &LegendMetrics) -> TableLayout {
    let usable_row_w = total_w - m.pad;
    let overhead = m.block_overhead();
    let per_item_cap_px: i32 = ((usable_row_w - start_x) as f32 * 0.35).max(140.0) as i32;

    let block_width_for_cap = |label: &str, cap_px: i32| -> i32 {
        let cap = cap_px.max(40) as u32;
        let lines = wrap_text_to_width(label, m.font_px, cap);
        overhead + block_width_px(&lines, m.font_px) as i32
    };

    // Pass 1: greedy pack into rows to determine K columns
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut cur: Vec<usize> = Vec::new();
    let mut x = start_x;
    for (i, label) in labels.iter().enumerate() {
        let remaining = (usable_row_w - x).max(40);
        let mut block_w = block_width_for_cap(label, (remaining - overhead).min(per_item_cap_px));
        if x + block_w > usable_row_w && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = start_x;
            block_w =
                block_width_for_cap(label, (usable_row_w - start_x - overhead).min(per_item_cap_px));
        }
        x += block_w;
        cur.push(i);
    }
    if !cur.is_empty() {
        rows.push(cur);
    }

    let k_cols = rows.iter().map(Vec::len).max().unwrap_or(1);

    // Per-column preferred widths from the longest single-line label in that column.
    let mut col_block_w: Vec<i32> = vec![overhead * 2; k_cols];
    for row in &rows {
        for (ci, &i) in row.iter().enumerate() {
            let w = overhead + estimate_text_width_px(&labels[i], m.font_px) as i32;
            col_block_w[ci] = col_block_w[ci].max(w);
        }
    }
    let total_needed = start_x + col_block_w.iter().sum::<i32>();
    let slot_w: Vec<i32> = if total_needed <= usable_row_w {
        col_block_w
    } else {
        let uniform = ((usable_row_w - start_x) / k_cols as i32).max(overhead * 2);
        vec![uniform; k_cols]
    };

    let mut col_x = Vec::with_capacity(k_cols);
    let mut acc = start_x;
    for sw in &slot_w {
        col_x.push(acc);
        acc += *sw;
    }
    let text_cap = slot_w
        .iter()
        .map(|sw| (*sw - overhead).max(40) as u32)
        .collect();

    TableLayout {
        rows,
        col_x,
        text_cap,
    }
}

/// Estimate how tall the Top/Bottom legend band must be to fit all items. Returns pixels.
pub fn estimate_band_height_px(
    labels: &[String],
    start_x: i32,
    total_w: i32,
    has_title: bool,
    m: &LegendMetrics,
) -> i32 {
    let table = pack_table(labels, start_x, total_w, m);
    let mut height = m.pad * 2 + m.title_h(has_title);
    for (ri, row) in table.rows.iter().enumerate() {
        let row_h = row
            .iter()
            .enumerate()
            .map(|(ci, &i)| {
                wrap_text_to_width(&labels[i], m.font_px, table.text_cap[ci])
                    .len()
                    .max(1) as i32
                    * m.line_h
            })
            .max()
            .unwrap_or(m.line_h);
        height += row_h;
        if ri + 1 < table.rows.len() {
            height += m.row_gap;
        }
    }
    height
}

/// Width for a single-column panel: the widest label plus glyph, clamped to `max_w`.
pub fn estimate_panel_width_px(labels: &[String], title: Option<&str>, m: &LegendMetrics, max_w: i32) -> i32 {
    let widest_label = labels
        .iter()
        .map(|l| estimate_text_width_px(l, m.font_px) as i32 + m.block_overhead())
        .max()
        .unwrap_or(0);
    let title_w = title
        .map(|t| estimate_text_width_px(t, m.title_font_px) as i32)
        .unwrap_or(0);
    (widest_label.max(title_w) + m.pad * 2).min(max_w)
}

/// Height of a single-column panel of width `w`.
pub fn estimate_panel_height_px(labels: &[String], has_title: bool, w: i32, m: &LegendMetrics) -> i32 {
    let cap = (w - m.pad * 2 - m.glyph_w - m.glyph_gap).max(40) as u32;
    let body: i32 = labels
        .iter()
        .map(|l| wrap_text_to_width(l, m.font_px, cap).len().max(1) as i32 * m.line_h + m.row_gap)
        .sum();
    m.pad * 2 + m.title_h(has_title) + body
}

/// Draw the legend (Right/Inside: single column; Top/Bottom: table-like multi-row, column-aligned).
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[LegendItem],
    title: Option<&str>,
    placement: LegendMode,
    axis_x_start_px: i32,
    m: &LegendMetrics,
) -> Result<()> {
    let (w_u32, h_u32) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;

    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let title_style = TextStyle::from((FontFamily::SansSerif, m.title_font_px))
        .pos(Pos::new(HPos::Left, VPos::Top));
    let label_style =
        TextStyle::from((FontFamily::SansSerif, m.font_px)).pos(Pos::new(HPos::Left, VPos::Center));

    match placement {
        LegendMode::Right | LegendMode::Inside => {
            if placement == LegendMode::Inside {
                legend_area
                    .fill(&WHITE.mix(0.85))
                    .map_err(draw_err)?;
                legend_area
                    .draw(&Rectangle::new(
                        [(0, 0), (w - 1, h_u32 as i32 - 1)],
                        BLACK.stroke_width(m.stroke_px),
                    ))
                    .map_err(draw_err)?;
            } else {
                legend_area.fill(&WHITE).map_err(draw_err)?;
            }

            let mut y = m.pad;
            if let Some(t) = title {
                legend_area
                    .draw(&Text::new(t, (m.pad, y), title_style.clone()))
                    .map_err(draw_err)?;
                y += m.title_h(true);
            }

            let text_x = m.pad + m.glyph_w + m.glyph_gap;
            let cap = (w - text_x - m.pad).max(40) as u32;
            for item in items {
                let lines = wrap_text_to_width(&item.label, m.font_px, cap);
                let block_h = lines.len().max(1) as i32 * m.line_h;
                draw_legend_glyph(legend_area, m.pad, y + block_h / 2, item, m)?;
                for (i, line) in lines.iter().enumerate() {
                    let line_center_y = y + i as i32 * m.line_h + m.line_h / 2;
                    legend_area
                        .draw(&Text::new(line.as_str(), (text_x, line_center_y), label_style.clone()))
                        .map_err(draw_err)?;
                }
                y += block_h + m.row_gap;
            }
        }

        LegendMode::Top | LegendMode::Bottom => {
            legend_area.fill(&WHITE).map_err(draw_err)?;
            let start_x = axis_x_start_px;
            let mut y_top = m.pad;
            if let Some(t) = title {
                legend_area
                    .draw(&Text::new(t, (start_x, y_top), title_style.clone()))
                    .map_err(draw_err)?;
                y_top += m.title_h(true);
            }

            let labels: Vec<String> = items.iter().map(|it| it.label.clone()).collect();
            let table = pack_table(&labels, start_x, w, m);

            for row in &table.rows {
                let blocks: Vec<Vec<String>> = row
                    .iter()
                    .enumerate()
                    .map(|(ci, &i)| wrap_text_to_width(&labels[i], m.font_px, table.text_cap[ci]))
                    .collect();
                let row_h = blocks
                    .iter()
                    .map(|b| b.len().max(1) as i32 * m.line_h)
                    .max()
                    .unwrap_or(m.line_h);
                let y_center = y_top + row_h / 2;

                for (ci, &i) in row.iter().enumerate() {
                    let glyph_x = table.col_x[ci];
                    draw_legend_glyph(legend_area, glyph_x, y_center, &items[i], m)?;

                    let text_x = glyph_x + m.glyph_w + m.glyph_gap;
                    let lines = &blocks[ci];
                    let top = y_center - lines.len().max(1) as i32 * m.line_h / 2;
                    for (li, ln) in lines.iter().enumerate() {
                        let line_center_y = top + li as i32 * m.line_h + m.line_h / 2;
                        legend_area
                            .draw(&Text::new(ln.as_str(), (text_x, line_center_y), label_style.clone()))
                            .map_err(draw_err)?;
                    }
                }
                y_top += row_h + m.row_gap;
            }
        }

        LegendMode::Hidden => {}
    }

    Ok(())
}

/// Draw one glyph occupying `[x, x + glyph_w]`, vertically centred on `y`.
fn draw_legend_glyph<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    x: i32,
    y: i32,
    item: &LegendItem,
    m: &LegendMetrics,
) -> Result<()> {
    let color = item.color;
    let mid = x + m.glyph_w / 2;
    match item.glyph {
        LegendGlyph::Swatch => {
            let half = m.line_h * 2 / 5;
            area.draw(&Rectangle::new(
                [(mid - half, y - half), (mid + half, y + half)],
                fill_style(color),
            ))
            .map_err(draw_err)?;
        }
        LegendGlyph::Line { dash, marker } => {
            draw_legend_line_sample(area, x, x + m.glyph_w, y, color, dash, m)?;
            if let Some(shape) = marker {
                draw_legend_marker(area, mid, y, m.marker_radius, color, shape, m.stroke_px)?;
            }
        }
    }
    Ok(())
}

/// Draw a line sample with the specified dash pattern
fn draw_legend_line_sample<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    start_x: i32,
    end_x: i32,
    y: i32,
    color: Rgba,
    dash: LineDash,
    m: &LegendMetrics,
) -> Result<()> {
    let style = line_style(color, m.stroke_px * 2);
    let unit = (m.font_px as i32 / 4).max(2);
    let segment = |x0: i32, x1: i32| PathElement::new(vec![(x0, y), (x1.min(end_x), y)], style);

    match dash {
        LineDash::Solid => {
            area.draw(&segment(start_x, end_x)).map_err(draw_err)?;
        }
        LineDash::Dash => {
            let mut x = start_x;
            while x < end_x {
                area.draw(&segment(x, x + unit * 2)).map_err(draw_err)?;
                x += unit * 3;
            }
        }
        LineDash::Dot => {
            let mut x = start_x;
            while x <= end_x {
                area.draw(&Circle::new((x, y), (m.stroke_px as i32).max(1), fill_style(color)))
                    .map_err(draw_err)?;
                x += unit;
            }
        }
        LineDash::DashDot => {
            let mut x = start_x;
            let mut is_dash = true;
            while x < end_x {
                if is_dash {
                    area.draw(&segment(x, x + unit * 3)).map_err(draw_err)?;
                    x += unit * 4;
                } else {
                    area.draw(&Circle::new((x, y), (m.stroke_px as i32).max(1), fill_style(color)))
                        .map_err(draw_err)?;
                    x += unit;
                }
                is_dash = !is_dash;
            }
        }
    }

    Ok(())
}

/// Draw a marker in the legend with the specified shape
fn draw_legend_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    x: i32,
    y: i32,
    size: i32,
    color: Rgba,
    shape: MarkerShape,
    stroke_px: u32,
) -> Result<()> {
    let fill = fill_style(color);
    let stroke = rgba_color(color).stroke_width(stroke_px * 2);
    match shape {
        MarkerShape::Circle => {
            area.draw(&Circle::new((x, y), size, fill)).map_err(draw_err)?;
        }
        MarkerShape::Square => {
            area.draw(&Rectangle::new([(x - size, y - size), (x + size, y + size)], fill))
                .map_err(draw_err)?;
        }
        MarkerShape::Triangle => {
            area.draw(&Polygon::new(
                vec![(x, y - size), (x - size, y + size), (x + size, y + size)],
                fill,
            ))
            .map_err(draw_err)?;
        }
        MarkerShape::Diamond => {
            area.draw(&Polygon::new(
                vec![(x, y - size), (x - size, y), (x, y + size), (x + size, y)],
                fill,
            ))
            .map_err(draw_err)?;
        }
        MarkerShape::Cross => {
            area.draw(&PathElement::new(vec![(x - size, y), (x + size, y)], stroke))
                .map_err(draw_err)?;
            area.draw(&PathElement::new(vec![(x, y - size), (x, y + size)], stroke))
                .map_err(draw_err)?;
        }
        MarkerShape::X => {
            area.draw(&PathElement::new(vec![(x - size, y - size), (x + size, y + size)], stroke))
                .map_err(draw_err)?;
            area.draw(&PathElement::new(vec![(x - size, y + size), (x + size, y - size)], stroke))
                .map_err(draw_err)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn band_grows_with_more_rows() {
        let m = LegendMetrics::new(14);
        let few = labels(&["A", "B"]);
        let many: Vec<String> = (0..30).map(|i| format!("Long method name number {i}")).collect();
        let h_few = estimate_band_height_px(&few, 60, 1000, false, &m);
        let h_many = estimate_band_height_px(&many, 60, 1000, false, &m);
        assert!(h_many > h_few);
        assert_eq!(h_few, m.pad * 2 + m.line_h);
    }

    #[test]
    fn title_adds_height() {
        let m = LegendMetrics::new(14);
        let l = labels(&["A"]);
        assert!(
            estimate_band_height_px(&l, 0, 800, true, &m) > estimate_band_height_px(&l, 0, 800, false, &m)
        );
    }

    #[test]
    fn panel_width_is_clamped() {
        let m = LegendMetrics::new(14);
        let l = labels(&["A very very very long series label that will not fit"]);
        assert_eq!(estimate_panel_width_px(&l, None, &m, 200), 200);
    }

    #[test]
    fn table_columns_align_across_rows() {
        let m = LegendMetrics::new(10);
        let l: Vec<String> = (0..9).map(|i| format!("Series {i}")).collect();
        let t = pack_table(&l, 50, 400, &m);
        assert!(t.rows.len() > 1);
        assert_eq!(t.col_x[0], 50);
        assert!(t.col_x.windows(2).all(|w| w[1] > w[0]));
    }
}
