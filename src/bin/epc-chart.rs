use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use epc_chart::{Chart, ChartConfig, Source, export};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "epc-chart",
    version,
    about = "Render animated per-country line charts from a Country,<year>,... CSV table"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one SVG snapshot of the chart at a point in time.
    Render(RenderArgs),
    /// Write the entrance animation as numbered SVG frames.
    Frames(FramesArgs),
    /// Write a self-animating SVG replaying the entrance.
    Animate(AnimateArgs),
    /// Print the loaded series.
    Series(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// CSV file path or http(s) URL.
    #[arg(short, long)]
    input: String,
    /// JSON file overriding any chart config fields.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output SVG path.
    #[arg(short, long)]
    out: PathBuf,
    /// Snapshot time in ms after load (default: once everything has settled).
    #[arg(long)]
    at_ms: Option<u64>,
    /// Check a country's box (repeatable).
    #[arg(long)]
    show: Vec<String>,
    /// Uncheck a country's box (repeatable).
    #[arg(long)]
    hide: Vec<String>,
    /// When the --show/--hide toggles happen, in ms after load.
    #[arg(long, default_value_t = 0)]
    toggle_at_ms: u64,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Directory receiving frame_0000.svg, frame_0001.svg, ...
    #[arg(long)]
    out_dir: PathBuf,
    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

#[derive(Args, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output SVG path.
    #[arg(short, long)]
    out: PathBuf,
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

fn load(args: &InputArgs) -> Result<Chart> {
    let config = match &args.config {
        Some(p) => ChartConfig::from_json_file(p)
            .with_context(|| format!("reading config {}", p.display()))?,
        None => ChartConfig::default(),
    };
    let source = Source::parse(&args.input);
    Chart::load(&source, config).with_context(|| format!("loading {source}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Series(args) => cmd_series(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    if let Some(at) = args.at_ms
        && at < args.toggle_at_ms
    {
        bail!(
            "--at-ms ({at}) must not be earlier than --toggle-at-ms ({})",
            args.toggle_at_ms
        );
    }
    let mut chart = load(&args.input)?;
    chart.start(Duration::ZERO);

    let toggle_at = Duration::from_millis(args.toggle_at_ms);
    chart.tick(toggle_at);
    for (names, checked) in [(&args.hide, false), (&args.show, true)] {
        for name in names {
            if !chart.set_country_checked(name, checked, toggle_at) {
                eprintln!("Unknown country {name:?}, ignored");
            }
        }
    }

    let at = match args.at_ms {
        Some(ms) => Duration::from_millis(ms),
        None => chart.settle_time().unwrap_or(toggle_at),
    };
    chart.tick(at);
    export::save_svg(&chart, &args.out)?;
    eprintln!("Wrote chart at {} ms to {}", at.as_millis(), args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> Result<()> {
    let mut chart = load(&args.input)?;
    chart.start(Duration::ZERO);
    let frames = export::save_frames(&mut chart, &args.out_dir, Duration::ZERO, args.fps)?;
    eprintln!("Wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> Result<()> {
    let chart = load(&args.input)?;
    export::save_animated_svg(&chart, &args.out)?;
    eprintln!("Wrote animated chart to {}", args.out.display());
    Ok(())
}

fn cmd_series(args: InputArgs) -> Result<()> {
    let chart = load(&args)?;
    for (i, s) in chart.series().iter().enumerate() {
        let (min, max) = s.extent().unzip();
        println!(
            "{}  key={}  visible={}  points={} missing={}  min={} max={}",
            s.country_name,
            chart.key(i).unwrap_or("-"),
            s.default_visible,
            s.values.len(),
            s.missing_count(),
            fmt_opt(min),
            fmt_opt(max)
        );
    }
    Ok(())
}
