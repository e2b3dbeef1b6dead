//! Interactive display window for a [`RenderedChart`].
//!
//! The chart is rasterized once at screen resolution and shown as a texture in a
//! scrollable panel. Each call opens its own window; nothing is shared between calls.

use eframe::egui;

use crate::error::{ChartError, Result};
use crate::viz::{RenderedChart, SCREEN_DPI};

/// Largest initial window edge, in logical points.
const MAX_WINDOW: f32 = 1400.0;

/// Open a window showing `chart`; returns when the window is closed.
pub fn show(chart: &RenderedChart) -> Result<()> {
    let (buf, w, h) = chart.to_rgb_buffer(SCREEN_DPI)?;
    let image = egui::ColorImage::from_rgb([w as usize, h as usize], &buf);
    let title = chart
        .config
        .title
        .clone()
        .unwrap_or_else(|| format!("{:?} chart", chart.kind));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                (w as f32 + 24.0).min(MAX_WINDOW),
                (h as f32 + 24.0).min(MAX_WINDOW),
            ])
            .with_min_inner_size([320.0, 240.0])
            .with_title(title.clone()),
        ..Default::default()
    };

    log::debug!("showing {w}x{h} chart window");
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(ChartViewer::new(image)))),
    )
    .map_err(|e| ChartError::Display(e.to_string()))
}

struct ChartViewer {
    pending: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
}

impl ChartViewer {
    fn new(image: egui::ColorImage) -> Self {
        Self {
            pending: Some(image),
            texture: None,
        }
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(image) = self.pending.take() {
            self.texture = Some(ctx.load_texture("chart", image, egui::TextureOptions::LINEAR));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| match &self.texture {
                Some(texture) => {
                    ui.add(egui::Image::new(egui::load::SizedTexture::from_handle(texture)));
                }
                None => {
                    ui.spinner();
                }
            });
        });
    }
}
