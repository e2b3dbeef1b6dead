use std::collections::BTreeMap;

use scorechart::style::PatternRule;
use scorechart::{ChartConfig, ChartError, ColorAssignment, Palette, Rgba, ScoreMatrix, render};

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn ablation_series() -> Vec<String> {
    names(&[
        "Task-level (P)",
        "Task-level (D)",
        "Label-level (P)",
        "Task-level (S)",
        "Label-level (D)",
    ])
}

fn level_palettes() -> BTreeMap<String, Palette> {
    BTreeMap::from([
        ("task".to_string(), Palette::TaskLevel),
        ("label".to_string(), Palette::LabelLevel),
    ])
}

#[test]
fn categorized_colors_cycle_within_each_category() {
    let series = ablation_series();
    let colors = ColorAssignment::categorized(
        &series,
        |l| {
            if l.starts_with("Task") {
                "task".to_string()
            } else {
                "label".to_string()
            }
        },
        level_palettes(),
    );
    let m = ScoreMatrix::from_values(vec![vec![50.0; 5]; 2]).unwrap();
    let chart = render(
        &m,
        &names(&["OLID", "HatEval"]),
        &series,
        &ChartConfig::default().with_colors(colors),
    )
    .unwrap();

    let task = Palette::TaskLevel.colors();
    let label = Palette::LabelLevel.colors();
    assert_eq!(chart.colors, vec![task[0], task[1], label[0], task[2], label[1]]);
    assert_eq!(
        chart.categories,
        Some(names(&["task", "task", "label", "task", "label"]))
    );
}

#[test]
fn pattern_rules_match_in_order() {
    let series = ablation_series();
    let colors = ColorAssignment::Patterns {
        rules: vec![
            PatternRule {
                pattern: "^Task".into(),
                category: "task".into(),
            },
            PatternRule {
                pattern: r"\(D\)$".into(),
                category: "label".into(),
            },
        ],
        default_category: "label".into(),
        palettes: level_palettes(),
    };
    assert_eq!(
        colors.categories(&series).unwrap(),
        Some(names(&["task", "task", "label", "task", "label"]))
    );
    let resolved = colors.resolve(&series).unwrap();
    assert_eq!(resolved[3], Palette::TaskLevel.colors()[2]);
}

#[test]
fn bad_pattern_is_a_config_error() {
    let colors = ColorAssignment::Patterns {
        rules: vec![PatternRule {
            pattern: "(".into(),
            category: "x".into(),
        }],
        default_category: "x".into(),
        palettes: BTreeMap::new(),
    };
    let err = colors.resolve(&names(&["a"])).unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn too_few_explicit_colors_is_a_shape_mismatch() {
    let m = ScoreMatrix::from_values(vec![vec![1.0, 2.0, 3.0]]).unwrap();
    let cfg = ChartConfig::default().with_colors(ColorAssignment::Explicit {
        colors: vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 255, 0)],
    });
    let err = render(&m, &names(&["D"]), &names(&["a", "b", "c"]), &cfg).unwrap_err();
    assert!(matches!(
        err,
        ChartError::ShapeMismatch {
            expected: 3,
            found: 2,
            ..
        }
    ));
}

#[test]
fn cyclic_palette_wraps_and_is_order_stable() {
    let series: Vec<String> = (0..12).map(|i| format!("M{i}")).collect();
    let colors = ColorAssignment::Cyclic {
        palette: Palette::Tab10,
    }
    .resolve(&series)
    .unwrap();
    assert_eq!(colors.len(), 12);
    assert_eq!(colors[10], colors[0]);
    assert_eq!(colors[11], colors[1]);
    assert_ne!(colors[0], colors[1]);
}

#[test]
fn color_policy_reads_from_json() {
    let cfg: ChartConfig = serde_json::from_str(
        r##"{"colors":{"policy":"explicit","colors":["#005293","#E37222"]}}"##,
    )
    .unwrap();
    assert_eq!(
        cfg.colors,
        ColorAssignment::Explicit {
            colors: vec![Rgba::rgb(0x00, 0x52, 0x93), Rgba::rgb(0xE3, 0x72, 0x22)],
        }
    );
}
