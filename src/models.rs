use crate::error::{ChartError, LabelAxis, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dense score table: rows are groups (datasets, languages), columns are series
/// (methods, models). `None` is the absent marker ("not measured"), distinct from `Some(0.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<f64>>>", into = "Vec<Vec<Option<f64>>>")]
pub struct ScoreMatrix {
    rows: Vec<Vec<Option<f64>>>,
    columns: usize,
}

impl ScoreMatrix {
    /// Build a matrix from rows of optional scores.
    ///
    /// Fails with `ShapeMismatch` on ragged rows and `InvalidValue` on NaN/infinite cells.
    pub fn new(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let columns = rows.first().map(|r| r.len()).unwrap_or(0);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(ChartError::shape(format!("row {r}"), columns, row.len()));
            }
            for (c, cell) in row.iter().enumerate() {
                if let Some(v) = cell
                    && !v.is_finite()
                {
                    return Err(ChartError::InvalidValue {
                        row: r,
                        column: c,
                        value: *v,
                    });
                }
            }
        }
        Ok(Self { rows, columns })
    }

    /// Build a fully-measured matrix.
    pub fn from_values(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(Some).collect())
                .collect(),
        )
    }

    /// A matrix of the given shape with every cell absent.
    pub fn absent(n_rows: usize, n_columns: usize) -> Self {
        Self {
            rows: vec![vec![None; n_columns]; n_rows],
            columns: n_columns,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns == 0
    }

    /// Cell value; `None` for absent cells and out-of-range indices.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    pub fn row(&self, row: usize) -> &[Option<f64>] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn column(&self, column: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|r| r.get(column).copied().flatten())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// All measured values in row-major order.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flatten().filter_map(|v| *v)
    }

    /// Keep only the first `n` columns.
    pub(crate) fn truncate_columns(&mut self, n: usize) {
        if n < self.columns {
            for row in &mut self.rows {
                row.truncate(n);
            }
            self.columns = n;
        }
    }

    fn set(&mut self, row: usize, column: usize, value: Option<f64>) {
        self.rows[row][column] = value;
    }
}

impl TryFrom<Vec<Vec<Option<f64>>>> for ScoreMatrix {
    type Error = ChartError;

    fn try_from(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<ScoreMatrix> for Vec<Vec<Option<f64>>> {
    fn from(m: ScoreMatrix) -> Self {
        m.rows
    }
}

/// A score matrix bundled with its group (row) and series (column) labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMatrix {
    pub groups: Vec<String>,
    pub series: Vec<String>,
    pub matrix: ScoreMatrix,
}

impl LabeledMatrix {
    /// Label counts must equal matrix dimensions, and neither may be empty.
    pub fn validate(&self) -> Result<()> {
        validate_shape(&self.matrix, &self.groups, &self.series)
    }
}

pub(crate) fn validate_shape(
    matrix: &ScoreMatrix,
    groups: &[String],
    series: &[String],
) -> Result<()> {
    if groups.is_empty() {
        return Err(ChartError::shape("group labels", matrix.n_rows().max(1), 0));
    }
    if series.is_empty() {
        return Err(ChartError::shape("series labels", matrix.n_columns().max(1), 0));
    }
    if matrix.n_rows() != groups.len() {
        return Err(ChartError::shape("matrix rows", groups.len(), matrix.n_rows()));
    }
    if matrix.n_columns() != series.len() {
        return Err(ChartError::shape(
            "matrix columns",
            series.len(),
            matrix.n_columns(),
        ));
    }
    Ok(())
}

/// What to do with relation entries whose source or target is not declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLabelPolicy {
    /// Drop the entry; it is reported in [`DenseRelations::ignored`] and logged.
    #[default]
    Lenient,
    /// Fail with [`ChartError::MissingLabel`].
    Strict,
}

/// Sparse source → target → score mapping (heatmap input).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationMap {
    entries: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Result of densifying a [`RelationMap`] over declared labels.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRelations {
    /// Rows follow the declared sources, columns the declared targets; unmapped pairs are absent.
    pub matrix: ScoreMatrix,
    /// `(source, target)` entries dropped under [`MissingLabelPolicy::Lenient`].
    pub ignored: Vec<(String, String)>,
}

impl RelationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>, score: f64) {
        self.entries
            .entry(source.into())
            .or_default()
            .insert(target.into(), score);
    }

    pub fn get(&self, source: &str, target: &str) -> Option<f64> {
        self.entries.get(source)?.get(target).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.entries.iter().flat_map(|(s, targets)| {
            targets
                .iter()
                .map(move |(t, v)| (s.as_str(), t.as_str(), *v))
        })
    }

    /// Collect the present cells of a dense matrix; absent cells stay unmapped.
    pub fn from_matrix(matrix: &ScoreMatrix, sources: &[String], targets: &[String]) -> Result<Self> {
        validate_shape(matrix, sources, targets)?;
        let mut map = Self::new();
        for (r, source) in sources.iter().enumerate() {
            for (c, target) in targets.iter().enumerate() {
                if let Some(v) = matrix.get(r, c) {
                    map.insert(source.clone(), target.clone(), v);
                }
            }
        }
        Ok(map)
    }

    /// Total function over the declared `sources × targets` cross product.
    ///
    /// Every declared pair maps to its score or to the absent marker. Entries naming an
    /// undeclared label are handled according to `policy`.
    pub fn to_matrix(
        &self,
        sources: &[String],
        targets: &[String],
        policy: MissingLabelPolicy,
    ) -> Result<DenseRelations> {
        let source_index = index_labels(sources, LabelAxis::Source)?;
        let target_index = index_labels(targets, LabelAxis::Target)?;

        let mut matrix = ScoreMatrix::absent(sources.len(), targets.len());
        let mut ignored = Vec::new();

        for (source, target, score) in self.iter() {
            let row = source_index.get(source);
            let column = target_index.get(target);
            match (row, column) {
                (Some(&r), Some(&c)) => {
                    if !score.is_finite() {
                        return Err(ChartError::InvalidValue {
                            row: r,
                            column: c,
                            value: score,
                        });
                    }
                    matrix.set(r, c, Some(score));
                }
                _ => {
                    if policy == MissingLabelPolicy::Strict {
                        let (axis, label) = if row.is_none() {
                            (LabelAxis::Source, source)
                        } else {
                            (LabelAxis::Target, target)
                        };
                        return Err(ChartError::MissingLabel {
                            axis,
                            label: label.to_string(),
                        });
                    }
                    log::warn!("ignoring relation {source} -> {target}: label not declared");
                    ignored.push((source.to_string(), target.to_string()));
                }
            }
        }

        Ok(DenseRelations { matrix, ignored })
    }
}

fn index_labels(labels: &[String], axis: LabelAxis) -> Result<HashMap<&str, usize>> {
    let mut index = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        if index.insert(label.as_str(), i).is_some() {
            return Err(ChartError::InvalidConfig(format!(
                "duplicate {axis} label `{label}`"
            )));
        }
    }
    Ok(index)
}
