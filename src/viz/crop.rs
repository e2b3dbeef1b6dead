//! Tight bounding-box cropping.
//!
//! Raster output is cropped directly. SVG output keeps every element and narrows the
//! document's `width`/`height`/`viewBox`, using a raster pass of the same chart to find
//! the drawn extent.

use regex::Regex;

use crate::error::{ChartError, Result};

/// Pixel rectangle `(x, y, width, height)`.
pub type BBox = (u32, u32, u32, u32);

/// Channel values at or above this count as background.
const BACKGROUND_MIN: u8 = 250;

/// Smallest rectangle containing every non-background pixel of a packed RGB buffer.
pub fn content_bbox(buf: &[u8], w: u32, h: u32) -> Option<BBox> {
    let (w_us, h_us) = (w as usize, h as usize);
    if buf.len() < w_us * h_us * 3 {
        return None;
    }
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
    for y in 0..h_us {
        let row = &buf[y * w_us * 3..(y + 1) * w_us * 3];
        for (x, px) in row.chunks_exact(3).enumerate() {
            if px.iter().any(|c| *c < BACKGROUND_MIN) {
                x0 = x0.min(x);
                x1 = x1.max(x);
                y0 = y0.min(y);
                y1 = y1.max(y);
            }
        }
    }
    if x0 == usize::MAX {
        return None;
    }
    Some((
        x0 as u32,
        y0 as u32,
        (x1 - x0 + 1) as u32,
        (y1 - y0 + 1) as u32,
    ))
}

/// Grow `bbox` by `pad` pixels on every side, clamped to the canvas.
pub fn pad_bbox((x, y, bw, bh): BBox, pad: u32, w: u32, h: u32) -> BBox {
    let x0 = x.saturating_sub(pad);
    let y0 = y.saturating_sub(pad);
    let x1 = (x + bw + pad).min(w);
    let y1 = (y + bh + pad).min(h);
    (x0, y0, x1 - x0, y1 - y0)
}

/// Copy the `bbox` region out of a packed RGB buffer of width `w`.
pub fn crop_rgb(buf: &[u8], w: u32, (x, y, bw, bh): BBox) -> (Vec<u8>, u32, u32) {
    let stride = w as usize * 3;
    let mut out = Vec::with_capacity(bw as usize * bh as usize * 3);
    for row in y as usize..(y + bh) as usize {
        let start = row * stride + x as usize * 3;
        out.extend_from_slice(&buf[start..start + bw as usize * 3]);
    }
    (out, bw, bh)
}

/// Rewrite the root `<svg>` size attributes so only `bbox` is visible.
pub fn tighten_svg(svg: &str, (x, y, bw, bh): BBox) -> Result<String> {
    let header = Regex::new(r#"<svg width="[^"]*" height="[^"]*" viewBox="[^"]*""#)
        .map_err(|e| ChartError::Drawing(e.to_string()))?;
    if !header.is_match(svg) {
        return Err(ChartError::Drawing("unrecognized SVG header".into()));
    }
    let replacement = format!(r#"<svg width="{bw}" height="{bh}" viewBox="{x} {y} {bw} {bh}""#);
    Ok(header.replace(svg, replacement.as_str()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> Vec<u8> {
        vec![255u8; (w * h * 3) as usize]
    }

    fn paint(buf: &mut [u8], w: u32, x: u32, y: u32) {
        let i = ((y * w + x) * 3) as usize;
        buf[i..i + 3].copy_from_slice(&[0, 0, 0]);
    }

    #[test]
    fn bbox_covers_painted_pixels() {
        let mut buf = canvas(10, 8);
        paint(&mut buf, 10, 2, 3);
        paint(&mut buf, 10, 6, 5);
        assert_eq!(content_bbox(&buf, 10, 8), Some((2, 3, 5, 3)));
        assert_eq!(content_bbox(&canvas(4, 4), 4, 4), None);
    }

    #[test]
    fn padding_is_clamped() {
        assert_eq!(pad_bbox((2, 3, 5, 3), 4, 10, 8), (0, 0, 10, 8));
        assert_eq!(pad_bbox((4, 4, 2, 2), 1, 10, 10), (3, 3, 4, 4));
    }

    #[test]
    fn crop_keeps_region() {
        let mut buf = canvas(4, 4);
        paint(&mut buf, 4, 1, 1);
        let (out, w, h) = crop_rgb(&buf, 4, (1, 1, 2, 2));
        assert_eq!((w, h), (2, 2));
        assert_eq!(&out[0..3], &[0, 0, 0]);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn svg_header_is_rewritten() {
        let svg = r#"<svg width="800" height="600" viewBox="0 0 800 600" xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#;
        let out = tighten_svg(svg, (10, 20, 300, 200)).unwrap();
        assert!(out.starts_with(r#"<svg width="300" height="200" viewBox="10 20 300 200""#));
        assert!(out.ends_with("<rect/></svg>"));
        assert!(tighten_svg("<html/>", (0, 0, 1, 1)).is_err());
    }
}
