//! Visualization: render score matrices to **PNG**, **JPEG**, **BMP** or **SVG**.
//!
//! - Four chart kinds: grouped `Bar`, annotated `Heatmap`, `Radar`, `Line`
//! - Physical figure size in inches with DPI scaling (fonts in points)
//! - Legend placement: `Inside`, `Right`, `Top`, `Bottom` (non-overlapping for external legends)
//! - Locale-aware annotations and tick labels (`1,234.50` vs `1.234,50`)
//! - Tight bounding-box cropping of saved output
//!
//! [`render`] never touches global state: it validates the inputs, computes the chart
//! geometry and returns a [`RenderedChart`]. Drawing happens when the chart is saved,
//! rasterized or shown, so one chart can be written to several formats.

pub mod bar;
pub mod crop;
pub mod heatmap;
pub mod legend;
pub mod line;
pub mod radar;
pub mod text;
pub mod types;
pub mod util;

pub use types::{
    BarAlignment, ChartKind, DEFAULT_DPI, DEFAULT_LEGEND_MODE, LegendMode, OutputFormat,
    SCREEN_DPI, TickRotation,
};

use crate::config::ChartConfig;
use crate::error::{ChartError, Result, draw_err};
use crate::layout::{self, Layout};
use crate::models::{RelationMap, ScoreMatrix, validate_shape};
use crate::style::{MarkerShape, Rgba};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontFamily, FontStyle, FontTransform};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Once;

use legend::{
    LegendGlyph, LegendItem, LegendMetrics, draw_legend_panel, estimate_band_height_px,
    estimate_panel_height_px, estimate_panel_width_px,
};
use util::{Scale, category_label_extent_px, compute_left_label_area_px, tick_precision};

/// SVG output is laid out in points, so the document size is the figure size at 72 DPI.
const SVG_DPI: u32 = 72;

/// Number of value-axis ticks requested from plotters.
pub(crate) const VALUE_TICKS: usize = 10;

/// One-time registration for the bundled "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
        let _ = plotters::style::register_font(
            "sans-serif",
            FontStyle::Bold,
            include_bytes!("../../assets/DejaVuSans-Bold.ttf"),
        );
    });
}

/// Pixel range `(x, y)` of the inner plotting region, in root coordinates.
pub(crate) type PlotRegion = (Range<i32>, Range<i32>);

/// Pixel sizes for one draw pass, derived from the config's point sizes and the target DPI.
pub(crate) struct DrawContext<'a> {
    pub config: &'a ChartConfig,
    pub scale: Scale,
    pub font_px: u32,
    pub title_px: u32,
    pub stroke_px: u32,
    pub margin_px: u32,
}

impl<'a> DrawContext<'a> {
    fn new(config: &'a ChartConfig, scale: Scale) -> Self {
        Self {
            config,
            scale,
            font_px: scale.pt(config.font_pt),
            title_px: scale.pt(config.title_font_pt),
            stroke_px: scale.pt(0.8),
            margin_px: scale.pt(8.0),
        }
    }

    pub fn label_style(&self) -> TextStyle<'static> {
        TextStyle::from((FontFamily::SansSerif, self.font_px))
    }

    pub fn bold_style(&self, px: u32) -> TextStyle<'static> {
        TextStyle::from((FontFamily::SansSerif, px).into_font().style(FontStyle::Bold))
    }

    /// Width of the left label gutter: value ticks for cartesian charts, row labels for heatmaps.
    pub fn left_gutter_px(&self, layout: &Layout, plot_w: u32) -> u32 {
        let ticks = match layout {
            Layout::Bar(l) => self.value_gutter(l.y_range),
            Layout::Line(l) => self.value_gutter(l.y_range),
            Layout::Heatmap(l) => {
                let labels: Vec<String> = l.rows.iter().map(|t| t.label.clone()).collect();
                self.category_gutter_px(&labels, plot_w)
            }
            Layout::Radar(_) => return 0,
        };
        ticks + self.y_desc_px()
    }

    /// Room for the rotated y-axis description, if any.
    pub fn y_desc_px(&self) -> u32 {
        if self.config.y_label.is_some() {
            self.font_px * 2
        } else {
            0
        }
    }

    pub fn category_gutter_px(&self, labels: &[String], plot_w: u32) -> u32 {
        category_label_extent_px(labels, self.font_px, plot_w / 3) + self.font_px
    }

    fn value_gutter(&self, (lo, hi): (f64, f64)) -> u32 {
        compute_left_label_area_px(
            lo,
            hi,
            VALUE_TICKS,
            self.font_px,
            tick_precision(lo, hi),
            &self.config.locale,
        )
    }

    /// Height of the bottom label gutter for category tick labels plus the x description.
    pub fn bottom_gutter_px(&self, labels: &[String], plot_h: u32) -> u32 {
        let ticks = match self.config.tick_rotation {
            TickRotation::Horizontal => self.font_px * 2,
            TickRotation::Vertical => {
                category_label_extent_px(labels, self.font_px, plot_h / 3) + self.font_px
            }
        };
        let desc = if self.config.x_label.is_some() {
            self.font_px * 2
        } else {
            0
        };
        ticks + desc
    }

    /// Style for category tick labels, rotated when configured.
    pub fn category_tick_style(&self) -> TextStyle<'static> {
        match self.config.tick_rotation {
            TickRotation::Horizontal => self.label_style(),
            TickRotation::Vertical => self
                .label_style()
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        }
    }
}

/// Tick label for an axis position, by exact tick match.
pub(crate) fn tick_label(ticks: &[layout::Tick], x: f64) -> String {
    ticks
        .iter()
        .find(|t| (t.position - x).abs() < 1e-9)
        .map(|t| t.label.clone())
        .unwrap_or_default()
}

/// A validated, laid-out chart. Drawing happens on [`save`](Self::save),
/// [`to_svg_string`](Self::to_svg_string), [`to_rgb_buffer`](Self::to_rgb_buffer) or `show`.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub config: ChartConfig,
    pub group_labels: Vec<String>,
    /// Series that are drawn, in caller order.
    pub series_labels: Vec<String>,
    /// Series dropped by the radar `max_series` cap, in caller order.
    pub omitted_series: Vec<String>,
    /// One color per drawn series (empty for heatmaps).
    pub colors: Vec<Rgba>,
    /// Per-series category tags when the color policy groups series.
    pub categories: Option<Vec<String>>,
    pub layout: Layout,
    /// Relation entries dropped under the lenient missing-label policy.
    pub ignored_relations: Vec<(String, String)>,
    /// Drawn values (radar charts keep only the drawn series).
    pub matrix: ScoreMatrix,
}

/// Validate, lay out and (when `config.output` is set) save a chart.
///
/// Rows of `matrix` are groups, columns are series. For heatmaps, rows are sources and
/// columns targets.
pub fn render(
    matrix: &ScoreMatrix,
    group_labels: &[String],
    series_labels: &[String],
    config: &ChartConfig,
) -> Result<RenderedChart> {
    let chart = build(matrix, group_labels, series_labels, config.clone())?;
    if let Some(out) = &chart.config.output {
        chart.save(out)?;
    }
    Ok(chart)
}

/// Render a heatmap from a sparse relation map over the declared `sources × targets`.
///
/// Unmapped pairs become blank zero-valued cells. Entries naming undeclared labels follow
/// `config.heatmap.missing_labels`.
pub fn render_relations(
    relations: &RelationMap,
    sources: &[String],
    targets: &[String],
    config: &ChartConfig,
) -> Result<RenderedChart> {
    let mut config = config.clone();
    if config.kind != ChartKind::Heatmap {
        log::debug!("relation map rendered as heatmap (config kind was {:?})", config.kind);
        config.kind = ChartKind::Heatmap;
    }
    let dense = relations.to_matrix(sources, targets, config.heatmap.missing_labels)?;
    let mut chart = build(&dense.matrix, sources, targets, config)?;
    chart.ignored_relations = dense.ignored;
    if let Some(out) = &chart.config.output {
        chart.save(out)?;
    }
    Ok(chart)
}

fn build(
    matrix: &ScoreMatrix,
    group_labels: &[String],
    series_labels: &[String],
    config: ChartConfig,
) -> Result<RenderedChart> {
    validate_shape(matrix, group_labels, series_labels)?;

    let (mut colors, categories) = if config.kind == ChartKind::Heatmap {
        (Vec::new(), None)
    } else {
        (
            config.colors.resolve(series_labels)?,
            config.colors.categories(series_labels)?,
        )
    };

    let bounds = config.value_bounds;
    let layout = match config.kind {
        ChartKind::Bar => Layout::Bar(layout::bar_layout(
            matrix,
            group_labels,
            series_labels,
            &config.bar,
            bounds,
        )?),
        ChartKind::Heatmap => Layout::Heatmap(layout::heatmap_layout(
            matrix,
            group_labels,
            series_labels,
            &config.heatmap,
            bounds,
            config.annotation_precision,
            &config.locale,
        )?),
        ChartKind::Radar => Layout::Radar(layout::radar_layout(
            matrix,
            group_labels,
            series_labels,
            &config.radar,
            bounds,
        )?),
        ChartKind::Line => Layout::Line(layout::line_layout(
            matrix,
            group_labels,
            series_labels,
            &config.line,
            bounds,
        )?),
    };

    let mut matrix = matrix.clone();
    let mut drawn = series_labels.to_vec();
    let mut omitted_series = Vec::new();
    let mut categories = categories;
    if let Layout::Radar(radar) = &layout
        && !radar.omitted.is_empty()
    {
        let keep = radar.traces.len();
        drawn.truncate(keep);
        colors.truncate(keep);
        matrix.truncate_columns(keep);
        if let Some(c) = categories.as_mut() {
            c.truncate(keep);
        }
        omitted_series = radar.omitted.clone();
    }

    Ok(RenderedChart {
        kind: config.kind,
        group_labels: group_labels.to_vec(),
        series_labels: drawn,
        omitted_series,
        colors,
        categories,
        layout,
        ignored_relations: Vec::new(),
        matrix,
        config,
    })
}

impl RenderedChart {
    /// Encoding used by [`save`](Self::save): the configured format, else the extension.
    pub fn output_format(&self, path: &Path) -> OutputFormat {
        self.config
            .figure
            .format
            .unwrap_or_else(|| OutputFormat::from_path(path))
    }

    /// Write the chart to `path` at the configured DPI, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let format = self.output_format(path);
        match format {
            OutputFormat::Svg => {
                let svg = self.to_svg_string()?;
                std::fs::write(path, svg)?;
            }
            OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Bmp => {
                let (buf, w, h) = self.to_rgb_buffer(self.config.figure.dpi)?;
                let img = image::RgbImage::from_raw(w, h, buf)
                    .ok_or_else(|| ChartError::Drawing("pixel buffer size mismatch".into()))?;
                let image_format = match format {
                    OutputFormat::Jpeg => image::ImageFormat::Jpeg,
                    OutputFormat::Bmp => image::ImageFormat::Bmp,
                    _ => image::ImageFormat::Png,
                };
                img.save_with_format(path, image_format)?;
            }
        }
        log::info!("wrote {:?} chart to {}", self.kind, path.display());
        Ok(path.to_path_buf())
    }

    /// Draw into an SVG document sized in points, cropped when `tight_bbox` is set.
    pub fn to_svg_string(&self) -> Result<String> {
        ensure_fonts_registered();
        let scale = Scale::new(SVG_DPI);
        let (w, h) = self.canvas_px(scale);
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (w, h)).into_drawing_area();
            draw_chart(&root, self, scale)?;
            root.present().map_err(draw_err)?;
        }
        if self.config.figure.tight_bbox {
            let (buf, _, _) = self.draw_rgb(scale)?;
            if let Some(bbox) = crop::content_bbox(&buf, w, h) {
                let bbox = crop::pad_bbox(bbox, scale.inches(self.config.figure.pad_in), w, h);
                match crop::tighten_svg(&svg, bbox) {
                    Ok(tight) => svg = tight,
                    Err(e) => log::warn!("keeping the full SVG canvas: {e}"),
                }
            }
        }
        Ok(svg)
    }

    /// Rasterize at `dpi` into a packed RGB buffer, returning `(pixels, width, height)`.
    pub fn to_rgb_buffer(&self, dpi: u32) -> Result<(Vec<u8>, u32, u32)> {
        let scale = Scale::new(dpi);
        let (buf, w, h) = self.draw_rgb(scale)?;
        if !self.config.figure.tight_bbox {
            return Ok((buf, w, h));
        }
        match crop::content_bbox(&buf, w, h) {
            Some(bbox) => {
                let bbox = crop::pad_bbox(bbox, scale.inches(self.config.figure.pad_in), w, h);
                Ok(crop::crop_rgb(&buf, w, bbox))
            }
            None => Ok((buf, w, h)),
        }
    }

    /// Open an interactive window showing the chart; blocks until it is closed.
    #[cfg(feature = "viewer")]
    pub fn show(&self) -> Result<()> {
        crate::viewer::show(self)
    }

    fn canvas_px(&self, scale: Scale) -> (u32, u32) {
        (
            scale.inches(self.config.figure.width_in),
            scale.inches(self.config.figure.height_in),
        )
    }

    fn draw_rgb(&self, scale: Scale) -> Result<(Vec<u8>, u32, u32)> {
        ensure_fonts_registered();
        let (w, h) = self.canvas_px(scale);
        let mut buf = vec![255u8; (w as usize) * (h as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            draw_chart(&root, self, scale)?;
            root.present().map_err(draw_err)?;
        }
        Ok((buf, w, h))
    }

    /// Legend entries in drawing order.
    pub fn legend_items(&self) -> Vec<LegendItem> {
        let item = |label: &String, color: Rgba, glyph: LegendGlyph| LegendItem {
            label: label.clone(),
            color,
            glyph,
        };
        match &self.layout {
            Layout::Bar(_) => self
                .series_labels
                .iter()
                .zip(&self.colors)
                .map(|(l, c)| item(l, *c, LegendGlyph::Swatch))
                .collect(),
            Layout::Heatmap(_) => Vec::new(),
            Layout::Radar(_) => {
                let marker = self.config.radar.markers.then_some(MarkerShape::Circle);
                self.series_labels
                    .iter()
                    .zip(&self.colors)
                    .map(|(l, c)| {
                        item(
                            l,
                            *c,
                            LegendGlyph::Line {
                                dash: Default::default(),
                                marker,
                            },
                        )
                    })
                    .collect()
            }
            Layout::Line(l) => l
                .traces
                .iter()
                .zip(&self.colors)
                .map(|(t, c)| {
                    item(
                        &t.label,
                        *c,
                        LegendGlyph::Line {
                            dash: t.style.dash,
                            marker: t.style.marker,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Draw the whole figure: title, plot, legend.
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &RenderedChart,
    scale: Scale,
) -> Result<()> {
    let ctx = DrawContext::new(&chart.config, scale);
    root.fill(&WHITE).map_err(draw_err)?;

    let body = match chart.config.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => root
            .titled(t, ctx.bold_style(ctx.title_px))
            .map_err(draw_err)?,
        _ => root.clone(),
    };

    let items = chart.legend_items();
    let mode = if items.is_empty() {
        LegendMode::Hidden
    } else {
        chart.config.legend.mode
    };
    let legend_title = chart
        .config
        .legend
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let m = LegendMetrics::new(ctx.font_px);
    let labels: Vec<String> = items.iter().map(|i| i.label.clone()).collect();

    let (body_w_u32, body_h_u32) = body.dim_in_pixel();
    let (body_w, body_h) = (body_w_u32 as i32, body_h_u32 as i32);
    let axis_x_start_px = ctx.margin_px as i32 + ctx.left_gutter_px(&chart.layout, body_w_u32) as i32;

    let (plot_area, legend_area) = match mode {
        LegendMode::Right => {
            let pw = estimate_panel_width_px(&labels, legend_title, &m, body_w * 2 / 5);
            let (plot, legend) = body.split_horizontally((body_w - pw).max(40));
            (plot, Some(legend))
        }
        LegendMode::Top => {
            let h = estimate_band_height_px(&labels, axis_x_start_px, body_w, legend_title.is_some(), &m);
            let (legend, plot) = body.split_vertically(h.min(body_h / 2));
            (plot, Some(legend))
        }
        LegendMode::Bottom => {
            let h = estimate_band_height_px(&labels, axis_x_start_px, body_w, legend_title.is_some(), &m);
            // keep at least half the figure for the plot
            let (plot, legend) = body.split_vertically((body_h - h).max(body_h / 2));
            (plot, Some(legend))
        }
        LegendMode::Inside | LegendMode::Hidden => (body, None),
    };

    let region = match &chart.layout {
        Layout::Bar(l) => bar::draw_bars(&plot_area, chart, l, &ctx)?,
        Layout::Heatmap(l) => heatmap::draw_heatmap(&plot_area, l, &ctx)?,
        Layout::Radar(l) => radar::draw_radar(&plot_area, chart, l, &ctx)?,
        Layout::Line(l) => line::draw_lines(&plot_area, chart, l, &ctx)?,
    };

    if let Some(area) = legend_area {
        draw_legend_panel(&area, &items, legend_title, mode, axis_x_start_px, &m)?;
    } else if mode == LegendMode::Inside {
        let (xr, yr) = region;
        let w = estimate_panel_width_px(&labels, legend_title, &m, (xr.end - xr.start) / 2);
        let h = estimate_panel_height_px(&labels, legend_title.is_some(), w, &m)
            .min(yr.end - yr.start);
        let x = xr.end - w - m.pad;
        let y = yr.start + m.pad;
        let inside = root.clone().shrink((x, y), (w, h));
        draw_legend_panel(&inside, &items, legend_title, mode, 0, &m)?;
    }

    Ok(())
}
