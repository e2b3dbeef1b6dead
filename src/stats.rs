use crate::models::ScoreMatrix;
use serde::{Deserialize, Serialize};

/// Summary statistics for one series (matrix column).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub series: String,
    pub count: usize,
    pub absent: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics per series, in series order.
pub fn series_summary(matrix: &ScoreMatrix, series_labels: &[String]) -> Vec<Summary> {
    let mut out = Vec::with_capacity(series_labels.len());
    for (c, label) in series_labels.iter().enumerate() {
        let column = matrix.column(c);
        let mut vals: Vec<f64> = column.iter().filter_map(|v| *v).collect();
        let absent = column.len() - vals.len();
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else { None };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary { series: label.clone(), count, absent, min, max, mean, median });
    }
    out
}

/// Smallest and largest measured value, or `None` when every cell is absent.
pub fn observed_range(matrix: &ScoreMatrix) -> Option<(f64, f64)> {
    matrix.present_values().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_skips_absent_cells() {
        let m = ScoreMatrix::new(vec![
            vec![Some(1.0), None],
            vec![Some(3.0), Some(4.0)],
            vec![Some(2.0), None],
        ])
        .unwrap();
        let s = series_summary(&m, &["a".into(), "b".into()]);
        assert_eq!(s[0].count, 3);
        assert_eq!(s[0].median, Some(2.0));
        assert_eq!(s[0].mean, Some(2.0));
        assert_eq!(s[1].count, 1);
        assert_eq!(s[1].absent, 2);
        assert_eq!(s[1].min, Some(4.0));
    }

    #[test]
    fn range_of_all_absent_is_none() {
        assert_eq!(observed_range(&ScoreMatrix::absent(2, 2)), None);
        let m = ScoreMatrix::from_values(vec![vec![5.0, -1.0]]).unwrap();
        assert_eq!(observed_range(&m), Some((-1.0, 5.0)));
    }
}
