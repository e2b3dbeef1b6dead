use std::fs;
use std::path::Path;

use scorechart::config::TraceStyle;
use scorechart::style::{LineDash, MarkerShape};
use scorechart::viz::TickRotation;
use scorechart::{ChartConfig, ChartKind, LegendMode, OutputFormat, ScoreMatrix, render};

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn sample() -> (ScoreMatrix, Vec<String>, Vec<String>) {
    let m = ScoreMatrix::new(vec![
        vec![Some(61.2), Some(64.0), Some(80.1)],
        vec![Some(55.0), None, Some(71.3)],
        vec![Some(47.9), Some(52.4), Some(66.6)],
    ])
    .unwrap();
    (
        m,
        names(&["OLID", "HatEval", "Davidson"]),
        names(&["Zero-shot", "Few-shot", "SFT"]),
    )
}

/// Small figures keep the raster tests quick.
fn small(kind: ChartKind) -> ChartConfig {
    let mut cfg = ChartConfig::for_kind(kind).with_title("Comparison of Settings");
    cfg.figure.width_in = 6.0;
    cfg.figure.height_in = 4.0;
    cfg.figure.dpi = 50;
    cfg
}

const KINDS: [ChartKind; 4] = [
    ChartKind::Bar,
    ChartKind::Heatmap,
    ChartKind::Radar,
    ChartKind::Line,
];

#[test]
fn png_and_svg_files_are_written() {
    let (m, g, s) = sample();
    let dir = tempfile::tempdir().unwrap();
    for kind in KINDS {
        let chart = render(&m, &g, &s, &small(kind)).unwrap();

        let png = dir.path().join(format!("{kind:?}.png"));
        chart.save(&png).unwrap();
        let img = image::open(&png).expect("decodable png");
        assert!(img.width() > 0 && img.height() > 0, "{kind:?}");

        let svg = dir.path().join(format!("{kind:?}.svg"));
        chart.save(&svg).unwrap();
        let txt = fs::read_to_string(&svg).unwrap();
        assert!(txt.contains("<svg"), "{kind:?}");
        assert!(txt.contains("Comparison of Settings"), "{kind:?}");
    }
}

#[test]
fn configured_output_is_saved_by_render() {
    let (m, g, s) = sample();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("figures").join("settings.png");
    let cfg = small(ChartKind::Bar).with_output(&out);
    render(&m, &g, &s, &cfg).unwrap();
    assert!(out.exists(), "parent directory created and file written");
}

#[test]
fn explicit_format_overrides_extension() {
    let (m, g, s) = sample();
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = small(ChartKind::Line);
    cfg.figure.format = Some(OutputFormat::Svg);
    let chart = render(&m, &g, &s, &cfg).unwrap();
    let path = dir.path().join("plot.out");
    assert_eq!(chart.output_format(&path), OutputFormat::Svg);
    chart.save(&path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("<svg"));
    assert_eq!(OutputFormat::from_path(Path::new("a.JPG")), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_path(Path::new("a")), OutputFormat::Png);
}

#[test]
fn raster_size_follows_dpi_and_tight_crop() {
    let (m, g, s) = sample();
    let mut cfg = small(ChartKind::Bar);
    cfg.figure.tight_bbox = false;
    let chart = render(&m, &g, &s, &cfg).unwrap();
    let (buf, w, h) = chart.to_rgb_buffer(50).unwrap();
    assert_eq!((w, h), (300, 200));
    assert_eq!(buf.len(), (w * h * 3) as usize);
    let (_, w2, h2) = chart.to_rgb_buffer(100).unwrap();
    assert_eq!((w2, h2), (600, 400));

    cfg.figure.tight_bbox = true;
    let chart = render(&m, &g, &s, &cfg).unwrap();
    let (buf, w, h) = chart.to_rgb_buffer(50).unwrap();
    assert!(w <= 300 && h <= 200);
    assert_eq!(buf.len(), (w * h * 3) as usize);
}

#[test]
fn every_legend_mode_renders_for_every_kind() {
    let (m, g, s) = sample();
    let modes = [
        LegendMode::Inside,
        LegendMode::Right,
        LegendMode::Top,
        LegendMode::Bottom,
        LegendMode::Hidden,
    ];
    for kind in KINDS {
        for mode in modes {
            let mut cfg = small(kind);
            cfg.legend.mode = mode;
            cfg.legend.title = Some("Setting".into());
            let chart = render(&m, &g, &s, &cfg).unwrap();
            chart
                .to_rgb_buffer(40)
                .unwrap_or_else(|e| panic!("{kind:?}/{mode:?}: {e}"));
        }
    }
}

#[test]
fn decorated_bar_chart_renders() {
    let (m, g, s) = sample();
    let mut cfg = small(ChartKind::Bar);
    cfg.x_label = Some("Dataset".into());
    cfg.y_label = Some("Macro F1".into());
    cfg.tick_rotation = TickRotation::Vertical;
    cfg.bar.grid = true;
    cfg.bar.inset_title = Some("(a)".into());
    cfg.bar.annotations = Some(vec![
        names(&["", "+2.8", "+18.9"]),
        names(&["", "", "+16.3"]),
        names(&["", "+4.5", "+18.7"]),
    ]);
    let chart = render(&m, &g, &s, &cfg).unwrap();
    let bars = &chart.layout.as_bar().unwrap().bars;
    assert!(bars.iter().any(|b| b.annotation.as_deref() == Some("+18.9")));
    assert!(chart.to_svg_string().unwrap().contains("+18.9"));
}

#[test]
fn all_absent_matrix_still_renders() {
    let m = ScoreMatrix::absent(2, 2);
    let g = names(&["a", "b"]);
    let s = names(&["x", "y"]);
    for kind in KINDS {
        let chart = render(&m, &g, &s, &small(kind)).unwrap();
        chart.to_rgb_buffer(30).unwrap();
    }
}

#[test]
fn index_line_chart_with_markers_fills_the_axis() {
    let (m, g, s) = sample();
    let mut cfg = small(ChartKind::Line);
    cfg.line.styles = vec![
        TraceStyle { dash: LineDash::Solid, marker: Some(MarkerShape::Circle) },
        TraceStyle { dash: LineDash::Dash, marker: Some(MarkerShape::X) },
        TraceStyle { dash: LineDash::Dot, marker: Some(MarkerShape::Diamond) },
    ];
    let chart = render(&m, &g, &s, &cfg).unwrap();
    let layout = chart.layout.as_line().unwrap();
    assert_eq!(layout.x_range, (-0.5, 2.5));
    chart.to_rgb_buffer(40).unwrap();
    assert!(chart.to_svg_string().unwrap().contains("<svg"));
}

#[test]
fn radar_floor_must_suit_the_score_scale() {
    let m = ScoreMatrix::from_values(vec![vec![0.5, 0.9, 0.7]; 5]).unwrap();
    let g = names(&["a", "b", "c", "d", "e"]);
    let s = names(&["x", "y", "z"]);
    let mut cfg = small(ChartKind::Radar);
    assert!(matches!(
        render(&m, &g, &s, &cfg),
        Err(scorechart::ChartError::InvalidConfig(_))
    ));

    cfg.radar.radial_min = 0.0;
    cfg.radar.line_width_pt = 1.0;
    let chart = render(&m, &g, &s, &cfg).unwrap();
    assert_eq!(chart.layout.as_radar().unwrap().radial_range, (0.0, 0.9));
    chart.to_rgb_buffer(40).unwrap();
}
