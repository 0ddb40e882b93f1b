#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that turns a contribution calendar into shooter frames.

mod contributions;
mod frames;

use std::{
    fs,
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use space_shooter_core::{ContributionData, Strategy};
use space_shooter_rendering::{FrameLayout, Theme};
use space_shooter_rendering_raster::{FrameWriter, RasterBackend};
use space_shooter_system_column_sweep::ColumnSweep;
use space_shooter_system_replay::{BulletPolicy, Replay, ReplayConfig};
use space_shooter_world::{query, World};

use self::frames::FrameRecorder;

/// Strategies available for clearing the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    /// Sweep week by week, top to bottom, until each column is clear.
    Column,
}

#[derive(Debug, Parser)]
#[command(name = "space-shooter", version)]
#[command(about = "Shoots down every square of a contribution calendar, frame by frame")]
struct Args {
    /// Contribution calendar JSON file
    input: PathBuf,

    /// Directory the frames are written into
    #[arg(short, long, default_value = "frames")]
    output: PathBuf,

    /// Capture a frame after this many actions
    #[arg(long, default_value = "1")]
    frame_every: NonZeroUsize,

    /// Keep every bullet on screen instead of clearing them after each frame
    #[arg(long)]
    keep_bullets: bool,

    /// TOML file overriding colors and cell metrics
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Strategy used to plan the ship's actions
    #[arg(long, value_enum, default_value_t = StrategyKind::Column)]
    strategy: StrategyKind,

    /// Print the planned actions instead of rendering frames
    #[arg(long)]
    plan: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the space shooter command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let data = contributions::load(&args.input)?;
    info!(
        "loaded {} weeks of contributions from {}",
        data.week_count(),
        args.input.display()
    );

    match args.strategy {
        StrategyKind::Column => execute(&ColumnSweep::new(), &data, &args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn execute<S>(strategy: &S, data: &ContributionData, args: &Args) -> Result<()>
where
    S: Strategy,
{
    if args.plan {
        return print_plan(strategy, data);
    }

    let theme = load_theme(args.theme.as_ref())?;
    let layout = FrameLayout::new(data.dimensions(), theme.metrics())?;
    let backend = RasterBackend::new(layout, theme.palette());
    let writer = FrameWriter::create(&args.output)?;
    let mut recorder = FrameRecorder::new(backend, writer);

    let bullets = if args.keep_bullets {
        BulletPolicy::Accumulate
    } else {
        BulletPolicy::ClearAfterFrame
    };
    let config = ReplayConfig::new()
        .with_frame_interval(args.frame_every)
        .with_bullet_policy(bullets);

    let mut world = World::new(data.clone());
    info!("replaying the {} strategy", strategy.name());
    let summary = Replay::new(config).run(&mut world, strategy.actions(data), &mut recorder)?;

    let remaining = query::alive_enemies(&world).len();
    println!(
        "destroyed {} enemies with {} shots over {} actions ({} remaining)",
        summary.destroyed, summary.shots, summary.actions, remaining
    );
    println!(
        "wrote {} frames to {}",
        recorder.writer().written(),
        recorder.writer().directory().display()
    );

    Ok(())
}

fn print_plan<S>(strategy: &S, data: &ContributionData) -> Result<()>
where
    S: Strategy,
{
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0;
    for (index, action) in strategy.actions(data).enumerate() {
        writeln!(out, "{index:>6} {action}")?;
        count += 1;
    }
    writeln!(out, "{count} actions planned by the {} strategy", strategy.name())?;
    out.flush()?;
    Ok(())
}

fn load_theme(path: Option<&PathBuf>) -> Result<Theme> {
    let Some(path) = path else {
        return Ok(Theme::default());
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read theme {}", path.display()))?;
    Theme::from_toml_str(&source).with_context(|| format!("invalid theme {}", path.display()))
}
