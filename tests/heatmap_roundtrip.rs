use scorechart::style::Colormap;
use scorechart::{ChartConfig, ChartKind, RelationMap, ScoreMatrix, render, render_relations};

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn dense() -> ScoreMatrix {
    ScoreMatrix::new(vec![
        vec![Some(1.0), Some(0.42), None],
        vec![None, Some(1.0), Some(0.0)],
        vec![Some(0.1234), None, Some(1.0)],
    ])
    .unwrap()
}

#[test]
fn relation_map_round_trips_through_heatmap() {
    let labels = names(&["OLID", "HatEval", "Davidson"]);
    let m = dense();
    let rel = RelationMap::from_matrix(&m, &labels, &labels).unwrap();
    assert_eq!(rel.len(), 6);

    let chart = render_relations(&rel, &labels, &labels, &ChartConfig::for_kind(ChartKind::Heatmap))
        .unwrap();
    let layout = chart.layout.as_heatmap().unwrap();
    assert_eq!(layout.cells.len(), 9);

    for r in 0..3 {
        for c in 0..3 {
            let cell = layout.cell(r, c).unwrap();
            match m.get(r, c) {
                Some(v) => {
                    assert!(cell.present);
                    assert_eq!(cell.value, v);
                    assert_eq!(cell.annotation, format!("{v:.2}"));
                }
                None => {
                    assert!(!cell.present);
                    assert_eq!(cell.value, 0.0);
                    assert_eq!(cell.annotation, "", "absent cell ({r},{c}) must be blank");
                }
            }
        }
    }
    // measured zero stays distinguishable from absent
    assert_eq!(layout.cell(1, 2).unwrap().annotation, "0.00");
}

#[test]
fn unmapped_pairs_are_absent_over_declared_cross_product() {
    let mut rel = RelationMap::new();
    rel.insert("A", "X", 0.5);
    let sources = names(&["A", "B"]);
    let targets = names(&["X", "Y"]);
    let dense = rel
        .to_matrix(&sources, &targets, Default::default())
        .unwrap();
    assert_eq!(dense.matrix.n_rows(), 2);
    assert_eq!(dense.matrix.n_columns(), 2);
    assert_eq!(dense.matrix.get(0, 0), Some(0.5));
    assert_eq!(dense.matrix.get(0, 1), None);
    assert_eq!(dense.matrix.get(1, 0), None);
    assert!(dense.ignored.is_empty());
}

#[test]
fn row_zero_is_the_top_row() {
    let chart = render(
        &dense(),
        &names(&["r0", "r1", "r2"]),
        &names(&["c0", "c1", "c2"]),
        &ChartConfig::for_kind(ChartKind::Heatmap),
    )
    .unwrap();
    let layout = chart.layout.as_heatmap().unwrap();
    assert_eq!(layout.cell_rect(0, 0), (0.0, 2.0, 1.0, 3.0));
    assert_eq!(layout.cell_rect(2, 1), (1.0, 0.0, 2.0, 1.0));
    assert!(layout.rows[0].position > layout.rows[2].position);
}

#[test]
fn shades_follow_value_range_and_locale() {
    let mut cfg = ChartConfig::for_kind(ChartKind::Heatmap);
    cfg.locale = "de".into();
    cfg.heatmap.colormap = Colormap::Greens;
    let chart = render(
        &dense(),
        &names(&["r0", "r1", "r2"]),
        &names(&["c0", "c1", "c2"]),
        &cfg,
    )
    .unwrap();
    let layout = chart.layout.as_heatmap().unwrap();
    assert_eq!(layout.value_range, (0.0, 1.0));
    assert_eq!(layout.cell(0, 0).unwrap().shade, 1.0);
    assert_eq!(layout.cell(0, 1).unwrap().annotation, "0,42");
    assert!(chart.colors.is_empty());
}
