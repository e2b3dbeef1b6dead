use scorechart::error::LabelAxis;
use scorechart::{ChartConfig, ChartError, ChartKind, MissingLabelPolicy, RelationMap, ScoreMatrix};
use scorechart::{render, render_relations};

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

#[test]
fn empty_groups_fail_with_shape_mismatch() {
    let m = ScoreMatrix::new(vec![]).unwrap();
    for kind in [ChartKind::Bar, ChartKind::Heatmap, ChartKind::Radar, ChartKind::Line] {
        let err = render(&m, &[], &names(&["A"]), &ChartConfig::for_kind(kind)).unwrap_err();
        assert!(matches!(err, ChartError::ShapeMismatch { .. }), "{kind:?}: {err}");
    }
}

#[test]
fn empty_series_fail_with_shape_mismatch() {
    let m = ScoreMatrix::new(vec![vec![], vec![]]).unwrap();
    for kind in [ChartKind::Bar, ChartKind::Heatmap, ChartKind::Radar, ChartKind::Line] {
        let err = render(&m, &names(&["D0", "D1"]), &[], &ChartConfig::for_kind(kind)).unwrap_err();
        assert!(matches!(err, ChartError::ShapeMismatch { .. }), "{kind:?}: {err}");
    }
}

#[test]
fn label_counts_must_match_matrix() {
    let m = ScoreMatrix::from_values(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let err = render(&m, &names(&["D0"]), &names(&["A", "B"]), &ChartConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ChartError::ShapeMismatch {
            expected: 1,
            found: 2,
            ..
        }
    ));
    let err = render(&m, &names(&["D0", "D1"]), &names(&["A", "B", "C"]), &ChartConfig::default())
        .unwrap_err();
    assert!(matches!(err, ChartError::ShapeMismatch { .. }));
}

#[test]
fn ragged_rows_are_rejected() {
    let err = ScoreMatrix::new(vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0)]]).unwrap_err();
    assert!(matches!(err, ChartError::ShapeMismatch { .. }));
}

#[test]
fn nan_is_not_an_absent_marker() {
    let err = ScoreMatrix::new(vec![vec![Some(1.0), Some(f64::NAN)]]).unwrap_err();
    assert!(matches!(err, ChartError::InvalidValue { row: 0, column: 1, .. }));
    let err = ScoreMatrix::from_values(vec![vec![f64::INFINITY]]).unwrap_err();
    assert!(matches!(err, ChartError::InvalidValue { .. }));
}

#[test]
fn matrix_json_uses_null_for_absent() {
    let m: ScoreMatrix = serde_json::from_str("[[1.5, null], [2.0, 3.0]]").unwrap();
    assert_eq!(m.get(0, 1), None);
    assert_eq!(m.get(1, 1), Some(3.0));
    assert!(serde_json::from_str::<ScoreMatrix>("[[1.0], [2.0, 3.0]]").is_err());
}

#[test]
fn undeclared_relation_labels_follow_policy() {
    let mut rel = RelationMap::new();
    rel.insert("OLID", "HatEval", 0.4);
    rel.insert("OLID", "Unknown", 0.9);
    let sources = names(&["OLID"]);
    let targets = names(&["HatEval"]);

    let lenient = ChartConfig::for_kind(ChartKind::Heatmap);
    let chart = render_relations(&rel, &sources, &targets, &lenient).unwrap();
    assert_eq!(
        chart.ignored_relations,
        vec![("OLID".to_string(), "Unknown".to_string())]
    );

    let mut strict = ChartConfig::for_kind(ChartKind::Heatmap);
    strict.heatmap.missing_labels = MissingLabelPolicy::Strict;
    let err = render_relations(&rel, &sources, &targets, &strict).unwrap_err();
    assert!(matches!(
        err,
        ChartError::MissingLabel {
            axis: LabelAxis::Target,
            ..
        }
    ));
}

#[test]
fn invalid_bounds_and_options_are_config_errors() {
    let m = ScoreMatrix::from_values(vec![vec![50.0, 60.0]]).unwrap();
    let g = names(&["D0"]);
    let s = names(&["A", "B"]);

    let cfg = ChartConfig::default().with_value_bounds(Some(90.0), Some(10.0));
    assert!(matches!(render(&m, &g, &s, &cfg), Err(ChartError::InvalidConfig(_))));

    let mut cfg = ChartConfig::for_kind(ChartKind::Radar);
    cfg.radar.max_series = Some(0);
    assert!(matches!(render(&m, &g, &s, &cfg), Err(ChartError::InvalidConfig(_))));

    let mut cfg = ChartConfig::default();
    cfg.bar.group_width = 1.5;
    assert!(matches!(render(&m, &g, &s, &cfg), Err(ChartError::InvalidConfig(_))));
}
