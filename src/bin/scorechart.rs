use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scorechart::style::Palette;
use scorechart::viz::{ChartKind, LegendMode, RenderedChart};
use scorechart::{ChartConfig, ColorAssignment, stats, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "scorechart",
    version,
    about = "Render bar, heatmap, radar & line comparison charts from score tables"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart (and optionally save it, export its layout, and print stats).
    Render(RenderArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Bar,
    Heatmap,
    Radar,
    Line,
}

impl From<KindArg> for ChartKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Bar => ChartKind::Bar,
            KindArg::Heatmap => ChartKind::Heatmap,
            KindArg::Radar => ChartKind::Radar,
            KindArg::Line => ChartKind::Line,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Inside,
    Right,
    Top,
    Bottom,
    Hidden,
}

impl From<LegendArg> for LegendMode {
    fn from(l: LegendArg) -> Self {
        match l {
            LegendArg::Inside => LegendMode::Inside,
            LegendArg::Right => LegendMode::Right,
            LegendArg::Top => LegendMode::Top,
            LegendArg::Bottom => LegendMode::Bottom,
            LegendArg::Hidden => LegendMode::Hidden,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaletteArg {
    Office,
    Tab10,
    Tab20c,
}

impl From<PaletteArg> for Palette {
    fn from(p: PaletteArg) -> Self {
        match p {
            PaletteArg::Office => Palette::Office,
            PaletteArg::Tab10 => Palette::Tab10,
            PaletteArg::Tab20c => Palette::Tab20c,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart kind. Defaults to the config's kind, else `bar`.
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,
    /// Score table (.csv: first column = groups, header = series) or relation table (.json, heatmap only).
    #[arg(short, long)]
    input: PathBuf,
    /// JSON chart config; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the chart here (.png, .jpg, .bmp or .svg).
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Chart title.
    #[arg(long)]
    title: Option<String>,
    /// X axis description.
    #[arg(long)]
    x_label: Option<String>,
    /// Y axis description.
    #[arg(long)]
    y_label: Option<String>,
    /// Figure width in inches.
    #[arg(long)]
    width_in: Option<f64>,
    /// Figure height in inches.
    #[arg(long)]
    height_in: Option<f64>,
    /// Output resolution (default 300).
    #[arg(long)]
    dpi: Option<u32>,
    /// Legend placement.
    #[arg(long, value_enum)]
    legend: Option<LegendArg>,
    /// Number format locale (en, de, fr, es, it, pt, nl).
    #[arg(long)]
    locale: Option<String>,
    /// Lower bound of the value axis.
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,
    /// Upper bound of the value axis.
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,
    /// Cyclic series palette.
    #[arg(long, value_enum)]
    palette: Option<PaletteArg>,
    /// Radar: draw at most this many series.
    #[arg(long)]
    max_series: Option<usize>,
    /// Open a window with the chart (default when no --out or --layout-json is given).
    #[arg(long, default_value_t = false)]
    show: bool,
    /// Export the computed chart geometry as JSON.
    #[arg(long)]
    layout_json: Option<PathBuf>,
    /// Print per-series statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn build_config(args: &RenderArgs) -> Result<ChartConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let mut cfg = storage::load_config_json(path)?;
            if let Some(kind) = args.kind {
                cfg.kind = kind.into();
            }
            cfg
        }
        None => ChartConfig::for_kind(args.kind.map(Into::into).unwrap_or_default()),
    };

    if let Some(t) = &args.title {
        cfg.title = Some(t.clone());
    }
    if let Some(x) = &args.x_label {
        cfg.x_label = Some(x.clone());
    }
    if let Some(y) = &args.y_label {
        cfg.y_label = Some(y.clone());
    }
    if let Some(w) = args.width_in {
        cfg.figure.width_in = w;
    }
    if let Some(h) = args.height_in {
        cfg.figure.height_in = h;
    }
    if let Some(dpi) = args.dpi {
        cfg.figure.dpi = dpi;
    }
    if let Some(legend) = args.legend {
        cfg.legend.mode = legend.into();
    }
    if let Some(locale) = &args.locale {
        cfg.locale = locale.clone();
    }
    if args.y_min.is_some() {
        cfg.value_bounds.min = args.y_min;
    }
    if args.y_max.is_some() {
        cfg.value_bounds.max = args.y_max;
    }
    if let Some(palette) = args.palette {
        cfg.colors = ColorAssignment::Cyclic {
            palette: palette.into(),
        };
    }
    if args.max_series.is_some() {
        cfg.radar.max_series = args.max_series;
    }
    cfg.output = args.out.clone();
    Ok(cfg)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut cfg = build_config(&args)?;

    let chart = if is_json(&args.input) {
        if cfg.kind != ChartKind::Heatmap {
            bail!("relation tables (.json) render as heatmaps; use --kind heatmap");
        }
        let table = storage::load_relations_json(&args.input)?;
        scorechart::render_relations(&table.relations, &table.sources, &table.targets, &cfg)?
    } else {
        let table = storage::load_matrix_csv(&args.input)?;
        // Numeric group labels double as line x positions.
        if cfg.kind == ChartKind::Line && cfg.line.x_values.is_none() {
            let xs: Option<Vec<f64>> = table.groups.iter().map(|g| g.parse().ok()).collect();
            cfg.line.x_values = xs;
        }
        scorechart::render(&table.matrix, &table.groups, &table.series, &cfg)?
    };

    if let Some(path) = &args.out {
        eprintln!("Wrote chart to {}", path.display());
    }
    if !chart.omitted_series.is_empty() {
        eprintln!(
            "Drew {} series; omitted: {}",
            chart.series_labels.len(),
            chart.omitted_series.join(", ")
        );
    }
    for (source, target) in &chart.ignored_relations {
        eprintln!("Ignored relation {source} -> {target} (label not declared)");
    }

    if let Some(path) = &args.layout_json {
        storage::save_layout_json(&chart, path)?;
        eprintln!("Wrote layout to {}", path.display());
    }

    if args.stats {
        print_stats(&chart);
    }

    if args.show || (args.out.is_none() && args.layout_json.is_none()) {
        show(&chart)?;
    }

    Ok(())
}

fn print_stats(chart: &RenderedChart) {
    for s in stats::series_summary(&chart.matrix, &chart.series_labels) {
        println!(
            "{}  count={} absent={}  min={} max={} mean={} median={}",
            s.series,
            s.count,
            s.absent,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
}

#[cfg(feature = "viewer")]
fn show(chart: &RenderedChart) -> Result<()> {
    chart.show()?;
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn show(_chart: &RenderedChart) -> Result<()> {
    bail!("built without the `viewer` feature; pass --out to save the chart")
}
