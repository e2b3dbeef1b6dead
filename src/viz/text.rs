//! Text measurement, truncation, and wrapping utilities.
//!
//! Plotters has no text measuring for layout decisions made before drawing, so widths are
//! estimated from the character count (DejaVu Sans averages ~0.6 em per glyph).
//!
//! Widths are kept in integer fifths of a pixel so that `chars_fitting` and
//! `estimate_text_width_px` agree exactly.

/// Average glyph advance as a ratio `NUM / DEN` of the font size.
const GLYPH_NUM: u64 = 3;
const GLYPH_DEN: u64 = 5;

/// Heuristic: estimate pixel width of text.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    let fifths = text.chars().count() as u64 * font_px as u64 * GLYPH_NUM;
    u32::try_from(fifths.div_ceil(GLYPH_DEN)).unwrap_or(u32::MAX)
}

/// How many characters fit into `max_px`: the largest `n` with
/// `estimate_text_width_px(n chars) <= max_px`.
fn chars_fitting(font_px: u32, max_px: u32) -> usize {
    let per_char = (font_px as u64 * GLYPH_NUM).max(GLYPH_DEN);
    (max_px as u64 * GLYPH_DEN / per_char) as usize
}

/// Truncate to fit `max_px`, ending with a single ellipsis if anything was cut.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let keep = chars_fitting(font_px, max_px).saturating_sub(1);
    if keep == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

/// Wrap text to fit within a maximum pixel width, breaking on word boundaries where possible.
pub fn wrap_text_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let max_chars = chars_fitting(font_px, max_px);
    if max_chars < 2 {
        return vec![truncate_to_width(text, font_px, max_px)];
    }
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let cur_len = cur.chars().count();
        let word_len = word.chars().count();
        if cur.is_empty() && word_len <= max_chars {
            cur = word.to_string();
        } else if !cur.is_empty() && cur_len + 1 + word_len <= max_chars {
            cur.push(' ');
            cur.push_str(word);
        } else {
            if !cur.is_empty() {
                lines.push(std::mem::take(&mut cur));
            }
            // Single long word: hard-break by characters
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(piece);
                } else {
                    cur = piece;
                }
            }
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Widest line of a wrapped block, in pixels.
pub fn block_width_px(lines: &[String], font_px: u32) -> u32 {
    lines
        .iter()
        .map(|s| estimate_text_width_px(s, font_px))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("OLID", 10, 200), "OLID");
    }

    #[test]
    fn truncation_fits_and_ends_with_ellipsis() {
        let s = truncate_to_width("Label-Specific Target SFT with Attention", 10, 60);
        assert!(s.ends_with('…'));
        assert!(estimate_text_width_px(&s, 10) <= 60);
    }

    #[test]
    fn wrapping_respects_width_and_keeps_words() {
        let lines = wrap_text_to_width("Task-Specific Target SFT with Initialization", 10, 120);
        assert!(lines.len() > 1);
        for l in &lines {
            assert!(estimate_text_width_px(l, 10) <= 120, "{l}");
        }
        assert_eq!(lines.join(" "), "Task-Specific Target SFT with Initialization");
    }

    #[test]
    fn fitting_count_matches_measured_width() {
        for font_px in [7, 10, 11, 13, 16] {
            for max_px in [0, 1, 30, 59, 60, 61, 120, 333] {
                let n = chars_fitting(font_px, max_px);
                let fits = "x".repeat(n);
                let over = "x".repeat(n + 1);
                assert!(estimate_text_width_px(&fits, font_px) <= max_px, "{font_px}/{max_px}");
                assert!(estimate_text_width_px(&over, font_px) > max_px, "{font_px}/{max_px}");
            }
        }
        assert_eq!(estimate_text_width_px(&"x".repeat(10), 10), 60);
    }

    #[test]
    fn long_words_are_hard_broken() {
        let lines = wrap_text_to_width("abcdefghijklmnopqrstuvwxyz", 10, 60);
        assert_eq!(lines.concat(), "abcdefghijklmnopqrstuvwxyz");
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }
}
