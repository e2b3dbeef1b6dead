//! Utility functions for visualization: DPI scaling, locale-aware numbers, label gutters.

use num_format::{Locale, ToFormattedString};

use super::text::estimate_text_width_px;

/// Converts physical units (inches, points) into device pixels for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub dpi: u32,
}

impl Scale {
    pub fn new(dpi: u32) -> Self {
        Self { dpi: dpi.max(1) }
    }

    /// Points (1/72 inch) to pixels, at least 1.
    pub fn pt(&self, points: f64) -> u32 {
        ((points * self.dpi as f64 / 72.0).round() as u32).max(1)
    }

    pub fn pt_i(&self, points: f64) -> i32 {
        self.pt(points) as i32
    }

    pub fn inches(&self, inches: f64) -> u32 {
        ((inches * self.dpi as f64).round() as u32).max(1)
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Format `v` with `precision` decimals, locale thousands separators and decimal mark.
pub fn format_number(v: f64, precision: usize, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.*}", precision, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    let negative = v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}{dec_sep}{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Compute a tight left label area width for the value axis (in pixels),
/// based on the formatted tick labels that will appear.
///
/// Returns a width clamped to a sensible range (relative to the font size) to avoid extremes.
pub fn compute_left_label_area_px(
    ymin: f64,
    ymax: f64,
    ticks: usize,
    font_px: u32,
    precision: usize,
    locale_tag: &str,
) -> u32 {
    let mut max_px = 0u32;
    // Sample the same number of tick positions as requested from Plotters.
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin + (ymax - ymin) * t;
        let s = format_number(v, precision, locale_tag);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }

    // Tick marks & breathing room.
    let with_padding = max_px.saturating_add(font_px * 3 / 2);
    with_padding.clamp(font_px * 3, font_px * 10)
}

/// Width of the category label gutter: the longest label, clamped to `max_px`.
pub fn category_label_extent_px(labels: &[String], font_px: u32, max_px: u32) -> u32 {
    labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0)
        .min(max_px)
}

/// Precision for value-axis tick labels: whole numbers for wide ranges.
pub fn tick_precision(lo: f64, hi: f64) -> usize {
    let span = (hi - lo).abs();
    if span >= 20.0 {
        0
    } else if span >= 2.0 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_formatting() {
        assert_eq!(format_number(1234.5, 2, "en"), "1,234.50");
        assert_eq!(format_number(1234.5, 1, "de"), "1.234,5");
        assert_eq!(format_number(0.42, 2, "en"), "0.42");
        assert_eq!(format_number(-3.0, 0, "en"), "-3");
        assert_eq!(format_number(-0.001, 2, "en"), "0.00");
    }

    #[test]
    fn points_scale_with_dpi() {
        assert_eq!(Scale::new(72).pt(10.0), 10);
        assert_eq!(Scale::new(300).pt(12.0), 50);
        assert_eq!(Scale::new(300).inches(12.0), 3600);
    }

    #[test]
    fn left_gutter_is_clamped() {
        let w = compute_left_label_area_px(0.0, 100.0, 10, 12, 0, "en");
        assert!((36..=120).contains(&w));
    }
}
