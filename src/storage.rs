//! File input/output: score tables (CSV), relation tables and configs (JSON), layout export.

use crate::config::ChartConfig;
use crate::layout::Layout;
use crate::models::{LabeledMatrix, RelationMap, ScoreMatrix};
use crate::style::Rgba;
use crate::viz::{ChartKind, RenderedChart};
use anyhow::{Context, Result, anyhow, bail};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Cell spellings read as the absent marker.
const ABSENT_TOKENS: [&str; 4] = ["", "NA", "N/A", "-"];

fn parse_cell(raw: &str, row: usize, column: &str) -> Result<Option<f64>> {
    let cell = raw.trim();
    if ABSENT_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t)) {
        return Ok(None);
    }
    let v: f64 = cell
        .parse()
        .with_context(|| format!("row {row}, column `{column}`: `{cell}` is not a number"))?;
    Ok(Some(v))
}

/// Load a score table. The header's first cell names the group column; the remaining
/// header cells are series labels. Empty, `NA`, `N/A` and `-` cells are absent.
///
/// ```text
/// Dataset,Zero-shot,Few-shot,SFT
/// OLID,61.2,64.0,80.1
/// HatEval,55.0,NA,71.3
/// ```
pub fn load_matrix_csv<P: AsRef<Path>>(path: P) -> Result<LabeledMatrix> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let header = rdr.headers()?.clone();
    if header.len() < 2 {
        bail!("{}: expected a group column and at least one series column", path.display());
    }
    let series: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

    let mut groups = Vec::new();
    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let group = record.get(0).unwrap_or_default().to_string();
        let row = record
            .iter()
            .skip(1)
            .zip(&series)
            .map(|(cell, column)| parse_cell(cell, i + 1, column))
            .collect::<Result<Vec<_>>>()?;
        if row.len() != series.len() {
            bail!(
                "{}: row {} has {} values, expected {}",
                path.display(),
                i + 1,
                row.len(),
                series.len()
            );
        }
        groups.push(group);
        rows.push(row);
    }

    let matrix = ScoreMatrix::new(rows)?;
    let table = LabeledMatrix {
        groups,
        series,
        matrix,
    };
    table.validate()?;
    log::debug!(
        "loaded {} groups x {} series from {}",
        table.groups.len(),
        table.series.len(),
        path.display()
    );
    Ok(table)
}

/// Prefix cells that spreadsheet programs would evaluate as formulas.
fn sanitize_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) && s.parse::<f64>().is_err() {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save a score table as CSV in the layout [`load_matrix_csv`] reads; absent cells are empty.
pub fn save_matrix_csv<P: AsRef<Path>>(table: &LabeledMatrix, group_header: &str, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec![sanitize_cell(group_header)];
    header.extend(table.series.iter().map(|s| sanitize_cell(s)));
    wtr.write_record(&header)?;
    for (group, row) in table.groups.iter().zip(table.matrix.rows()) {
        let mut record = vec![sanitize_cell(group)];
        record.extend(row.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Declared heatmap labels plus the sparse relations between them.
///
/// ```json
/// {
///   "sources": ["OLID", "HatEval"],
///   "targets": ["OLID", "HatEval"],
///   "relations": { "OLID": { "HatEval": 0.42 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationTable {
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub relations: RelationMap,
}

pub fn load_relations_json<P: AsRef<Path>>(path: P) -> Result<RelationTable> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let table: RelationTable = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing relation table {}", path.display()))?;
    if table.sources.is_empty() || table.targets.is_empty() {
        return Err(anyhow!("{}: sources and targets must not be empty", path.display()));
    }
    Ok(table)
}

/// Load a [`ChartConfig`]; omitted fields keep their defaults.
pub fn load_config_json<P: AsRef<Path>>(path: P) -> Result<ChartConfig> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let cfg = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[derive(Serialize)]
struct LayoutExport<'a> {
    kind: ChartKind,
    group_labels: &'a [String],
    series_labels: &'a [String],
    omitted_series: &'a [String],
    colors: &'a [Rgba],
    categories: Option<&'a [String]>,
    ignored_relations: &'a [(String, String)],
    layout: &'a Layout,
}

/// Save the computed chart geometry as pretty JSON.
pub fn save_layout_json<P: AsRef<Path>>(chart: &RenderedChart, path: P) -> Result<()> {
    let export = LayoutExport {
        kind: chart.kind,
        group_labels: &chart.group_labels,
        series_labels: &chart.series_labels,
        omitted_series: &chart.omitted_series,
        colors: &chart.colors,
        categories: chart.categories.as_deref(),
        ignored_relations: &chart.ignored_relations,
        layout: &chart.layout,
    };
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&export)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
