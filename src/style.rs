//! Colors, palettes and series color assignment.
//!
//! Series colors are resolved by an explicitly selected [`ColorAssignment`] policy:
//!
//! - **Cyclic**: series `i` takes `palette[i % palette.len()]`.
//! - **Explicit**: one caller-supplied color per series.
//! - **Categorized**: every series carries a category tag (produced by a caller-supplied
//!   classification function, see [`ColorAssignment::categorized`]); each category draws
//!   from its own sub-palette, cycling by the series' position within that category.
//! - **Patterns**: a serializable front end for `Categorized` that classifies labels with
//!   regular expressions, for use from config files.
//!
//! # Example
//!
//! ```rust
//! use scorechart::style::{ColorAssignment, Palette};
//! use std::collections::BTreeMap;
//!
//! let series = vec!["Task SFT".to_string(), "Label SFT".to_string()];
//! let mut palettes = BTreeMap::new();
//! palettes.insert("task".to_string(), Palette::TaskLevel);
//! palettes.insert("label".to_string(), Palette::LabelLevel);
//!
//! let assignment = ColorAssignment::categorized(
//!     &series,
//!     |label| if label.starts_with("Label") { "label".into() } else { "task".into() },
//!     palettes,
//! );
//! let colors = assignment.resolve(&series).unwrap();
//! assert_ne!(colors[0], colors[1]);
//! ```

use crate::error::{ChartError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// RGBA color representation, serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Relative luminance in 0..1 (sRGB weights, no gamma correction).
    pub fn luminance(self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Linear interpolation between two colors, `t` in 0..1.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl FromStr for Rgba {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || ChartError::InvalidConfig(format!("invalid color `{s}`, expected #RRGGBB"));
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ChartError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

/// Marker shape for data points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
    X,
}

/// Line dash pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
}

/// MS Office color palette (RGB values).
const MS_OFFICE_PALETTE: [Rgba; 10] = [
    Rgba::rgb(68, 114, 196),  // blue
    Rgba::rgb(237, 125, 49),  // orange
    Rgba::rgb(165, 165, 165), // gray
    Rgba::rgb(255, 192, 0),   // gold
    Rgba::rgb(91, 155, 213),  // light blue
    Rgba::rgb(112, 173, 71),  // green
    Rgba::rgb(38, 68, 120),   // dark blue
    Rgba::rgb(158, 72, 14),   // dark orange
    Rgba::rgb(99, 99, 99),    // dark gray
    Rgba::rgb(153, 115, 0),   // brownish
];

const TAB10: [Rgba; 10] = [
    Rgba::rgb(31, 119, 180),
    Rgba::rgb(255, 127, 14),
    Rgba::rgb(44, 160, 44),
    Rgba::rgb(214, 39, 40),
    Rgba::rgb(148, 103, 189),
    Rgba::rgb(140, 86, 75),
    Rgba::rgb(227, 119, 194),
    Rgba::rgb(127, 127, 127),
    Rgba::rgb(188, 189, 34),
    Rgba::rgb(23, 190, 207),
];

/// Four hues (blue, orange, green, purple) plus gray, four shades each from dark to light.
const TAB20C: [Rgba; 20] = [
    Rgba::rgb(49, 130, 189),
    Rgba::rgb(107, 174, 214),
    Rgba::rgb(158, 202, 225),
    Rgba::rgb(198, 219, 239),
    Rgba::rgb(230, 85, 13),
    Rgba::rgb(253, 141, 60),
    Rgba::rgb(253, 174, 107),
    Rgba::rgb(253, 208, 162),
    Rgba::rgb(49, 163, 84),
    Rgba::rgb(116, 196, 118),
    Rgba::rgb(161, 217, 155),
    Rgba::rgb(199, 233, 192),
    Rgba::rgb(117, 107, 177),
    Rgba::rgb(158, 154, 200),
    Rgba::rgb(188, 189, 220),
    Rgba::rgb(218, 218, 235),
    Rgba::rgb(99, 99, 99),
    Rgba::rgb(150, 150, 150),
    Rgba::rgb(189, 189, 189),
    Rgba::rgb(217, 217, 217),
];

/// Named or custom qualitative palette.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Microsoft Office (2013+) chart series colors.
    #[default]
    Office,
    Tab10,
    Tab20c,
    /// Three blue shades for task-level variants.
    TaskLevel,
    /// Three orange shades for label-level variants.
    LabelLevel,
    Custom(Vec<Rgba>),
}

impl Palette {
    pub fn colors(&self) -> Vec<Rgba> {
        match self {
            Palette::Office => MS_OFFICE_PALETTE.to_vec(),
            Palette::Tab10 => TAB10.to_vec(),
            Palette::Tab20c => TAB20C.to_vec(),
            Palette::TaskLevel => vec![TAB20C[2], TAB20C[0], TAB20C[1]],
            Palette::LabelLevel => vec![TAB20C[5], TAB20C[6], TAB20C[4]],
            Palette::Custom(colors) => colors.clone(),
        }
    }

    /// Color at `idx`, cycling; `None` only for an empty custom palette.
    pub fn pick(&self, idx: usize) -> Option<Rgba> {
        let colors = self.colors();
        if colors.is_empty() {
            None
        } else {
            Some(colors[idx % colors.len()])
        }
    }
}

/// Sequential colormap for heatmap cells (ColorBrewer 9-class ramps).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    #[default]
    Blues,
    Greens,
    Oranges,
    Greys,
}

const BLUES: [Rgba; 9] = [
    Rgba::rgb(247, 251, 255),
    Rgba::rgb(222, 235, 247),
    Rgba::rgb(198, 219, 239),
    Rgba::rgb(158, 202, 225),
    Rgba::rgb(107, 174, 214),
    Rgba::rgb(66, 146, 198),
    Rgba::rgb(33, 113, 181),
    Rgba::rgb(8, 81, 156),
    Rgba::rgb(8, 48, 107),
];
const GREENS: [Rgba; 9] = [
    Rgba::rgb(247, 252, 245),
    Rgba::rgb(229, 245, 224),
    Rgba::rgb(199, 233, 192),
    Rgba::rgb(161, 217, 155),
    Rgba::rgb(116, 196, 118),
    Rgba::rgb(65, 171, 93),
    Rgba::rgb(35, 139, 69),
    Rgba::rgb(0, 109, 44),
    Rgba::rgb(0, 68, 27),
];
const ORANGES: [Rgba; 9] = [
    Rgba::rgb(255, 245, 235),
    Rgba::rgb(254, 230, 206),
    Rgba::rgb(253, 208, 162),
    Rgba::rgb(253, 174, 107),
    Rgba::rgb(253, 141, 60),
    Rgba::rgb(241, 105, 19),
    Rgba::rgb(217, 72, 1),
    Rgba::rgb(166, 54, 3),
    Rgba::rgb(127, 39, 4),
];
const GREYS: [Rgba; 9] = [
    Rgba::rgb(255, 255, 255),
    Rgba::rgb(240, 240, 240),
    Rgba::rgb(217, 217, 217),
    Rgba::rgb(189, 189, 189),
    Rgba::rgb(150, 150, 150),
    Rgba::rgb(115, 115, 115),
    Rgba::rgb(82, 82, 82),
    Rgba::rgb(37, 37, 37),
    Rgba::rgb(0, 0, 0),
];

impl Colormap {
    fn stops(self) -> &'static [Rgba; 9] {
        match self {
            Colormap::Blues => &BLUES,
            Colormap::Greens => &GREENS,
            Colormap::Oranges => &ORANGES,
            Colormap::Greys => &GREYS,
        }
    }

    /// Map `t` in 0..1 (clamped) onto the ramp.
    pub fn sample(self, t: f64) -> Rgba {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        stops[lo].lerp(stops[hi], pos - lo as f64)
    }
}

/// Maps labels matching `pattern` to `category`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub category: String,
}

/// Series color policy. Always selected explicitly; never inferred from the labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ColorAssignment {
    Cyclic {
        #[serde(default)]
        palette: Palette,
    },
    Explicit {
        colors: Vec<Rgba>,
    },
    Categorized {
        /// One category tag per series, in series order.
        categories: Vec<String>,
        palettes: BTreeMap<String, Palette>,
    },
    Patterns {
        /// First matching rule wins.
        rules: Vec<PatternRule>,
        default_category: String,
        palettes: BTreeMap<String, Palette>,
    },
}

impl Default for ColorAssignment {
    fn default() -> Self {
        ColorAssignment::Cyclic {
            palette: Palette::default(),
        }
    }
}

impl ColorAssignment {
    /// Tag every series with `classify(label)` and bind each tag to a sub-palette.
    pub fn categorized<F>(
        series_labels: &[String],
        classify: F,
        palettes: BTreeMap<String, Palette>,
    ) -> Self
    where
        F: Fn(&str) -> String,
    {
        ColorAssignment::Categorized {
            categories: series_labels.iter().map(|l| classify(l.as_str())).collect(),
            palettes,
        }
    }

    /// Per-series category tags, if this policy groups series.
    pub fn categories(&self, series_labels: &[String]) -> Result<Option<Vec<String>>> {
        match self {
            ColorAssignment::Cyclic { .. } | ColorAssignment::Explicit { .. } => Ok(None),
            ColorAssignment::Categorized { categories, .. } => Ok(Some(categories.clone())),
            ColorAssignment::Patterns {
                rules,
                default_category,
                ..
            } => {
                let compiled = rules
                    .iter()
                    .map(|r| {
                        Regex::new(&r.pattern)
                            .map(|re| (re, r.category.as_str()))
                            .map_err(|e| {
                                ChartError::InvalidConfig(format!(
                                    "bad color pattern `{}`: {e}",
                                    r.pattern
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let tags = series_labels
                    .iter()
                    .map(|label| {
                        compiled
                            .iter()
                            .find(|(re, _)| re.is_match(label))
                            .map(|(_, cat)| cat.to_string())
                            .unwrap_or_else(|| default_category.clone())
                    })
                    .collect();
                Ok(Some(tags))
            }
        }
    }

    /// One color per series label.
    pub fn resolve(&self, series_labels: &[String]) -> Result<Vec<Rgba>> {
        let n = series_labels.len();
        match self {
            ColorAssignment::Cyclic { palette } => (0..n)
                .map(|i| {
                    palette
                        .pick(i)
                        .ok_or_else(|| ChartError::InvalidConfig("empty palette".into()))
                })
                .collect(),
            ColorAssignment::Explicit { colors } => {
                if colors.len() < n {
                    return Err(ChartError::shape("explicit colors", n, colors.len()));
                }
                Ok(colors[..n].to_vec())
            }
            ColorAssignment::Categorized { palettes, .. }
            | ColorAssignment::Patterns { palettes, .. } => {
                let categories = self.categories(series_labels)?.unwrap_or_default();
                if categories.len() != n {
                    return Err(ChartError::shape("series categories", n, categories.len()));
                }
                let mut seen: HashMap<&str, usize> = HashMap::new();
                categories
                    .iter()
                    .map(|cat| {
                        let palette = palettes.get(cat).ok_or_else(|| {
                            ChartError::InvalidConfig(format!("no palette for category `{cat}`"))
                        })?;
                        let k = seen.entry(cat.as_str()).or_insert(0);
                        let color = palette.pick(*k).ok_or_else(|| {
                            ChartError::InvalidConfig(format!("empty palette for `{cat}`"))
                        })?;
                        *k += 1;
                        Ok(color)
                    })
                    .collect()
            }
        }
    }
}
