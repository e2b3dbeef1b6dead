//! scorechart
//!
//! A small Rust library for rendering comparison charts of evaluation scores: one
//! numeric matrix (rows = groups such as datasets, columns = series such as methods),
//! two label lists and a configuration, rendered as a grouped bar chart, annotated
//! heatmap, radar chart or line plot. Pairs with the `scorechart` CLI.
//!
//! ### Features
//! - Shape- and value-checked inputs with an explicit absent marker (`None`)
//! - Deterministic chart geometry, exposed on the returned [`RenderedChart`]
//! - PNG/JPEG/BMP/SVG output at a configurable DPI with tight cropping
//! - Cyclic, explicit or category-grouped series colors
//! - Sparse relation maps rendered as heatmaps over declared labels
//! - Optional interactive viewer (feature `viewer`)
//!
//! ### Example
//! ```no_run
//! use scorechart::{ChartConfig, ChartKind, ScoreMatrix, render};
//!
//! let datasets = vec!["OLID".to_string(), "HatEval".to_string()];
//! let methods = vec!["Zero-shot".to_string(), "Few-shot".to_string(), "SFT".to_string()];
//! let scores = ScoreMatrix::new(vec![
//!     vec![Some(61.2), Some(64.0), Some(80.1)],
//!     vec![Some(55.0), None, Some(71.3)],
//! ])?;
//!
//! let config = ChartConfig::for_kind(ChartKind::Bar)
//!     .with_title("Comparison of Settings Across Datasets")
//!     .with_output("figures/settings.png");
//! let chart = render(&scores, &datasets, &methods, &config)?;
//! chart.save("figures/settings.svg")?;
//! # Ok::<(), scorechart::ChartError>(())
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod stats;
pub mod storage;
pub mod style;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viz;
pub mod viz_plotters_adapter;

pub use config::{ChartConfig, ValueBounds};
pub use error::{ChartError, Result};
pub use layout::Layout;
pub use models::{LabeledMatrix, MissingLabelPolicy, RelationMap, ScoreMatrix};
pub use style::{ColorAssignment, Palette, Rgba};
pub use viz::{ChartKind, LegendMode, OutputFormat, RenderedChart, render, render_relations};
