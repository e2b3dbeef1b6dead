//! Error taxonomy for chart construction and rendering.

use thiserror::Error;

/// Which side of a [`RelationMap`](crate::models::RelationMap) a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAxis {
    Source,
    Target,
}

impl std::fmt::Display for LabelAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelAxis::Source => f.write_str("source"),
            LabelAxis::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    /// A label list, option list or row does not match the matrix dimension it describes.
    #[error("shape mismatch: {what} has {found} entries, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A cell holds NaN or an infinity instead of a score or the absent marker.
    #[error("invalid value {value} at row {row}, column {column}")]
    InvalidValue { row: usize, column: usize, value: f64 },

    /// A relation references a label that was not declared (strict policy only).
    #[error("{axis} label `{label}` is not among the declared {axis} labels")]
    MissingLabel { axis: LabelAxis, label: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("display failed: {0}")]
    Display(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl ChartError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, found: usize) -> Self {
        ChartError::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}

/// Map any plotters backend error into [`ChartError::Drawing`].
pub(crate) fn draw_err<E: std::fmt::Debug>(e: E) -> ChartError {
    ChartError::Drawing(format!("{e:?}"))
}

pub type Result<T> = std::result::Result<T, ChartError>;
