//! strata - layered image adjustment from the command line
//!
//! Applies adjustment sets to PNG files, prints curve lookup tables, and
//! flattens layered project descriptions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod image_io;
mod project;

#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about = "Non-destructive layered image adjustments")]
#[command(long_about = "
Applies per-layer color adjustments, filters and blend modes to PNG images.

Examples:
  strata adjust in.png -o out.png --brightness 10 --contrast 20
  strata adjust in.png -o out.png --settings look.json --filter vintage
  strata curve 0,0 64,40 192,220 255,255
  strata render project.json -o flat.png
  strata list
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an adjustment set to an image
    #[command(visible_alias = "a")]
    Adjust(AdjustArgs),

    /// Print the 256-entry lookup table of a tone curve
    Curve(CurveArgs),

    /// Flatten a layered project file to an image
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// List preset filters and blend modes
    List,
}

#[derive(Args)]
struct AdjustArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Adjustment set as JSON; flags below override its values
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Brightness (-100..100)
    #[arg(long, allow_hyphen_values = true)]
    brightness: Option<f64>,

    /// Contrast (-100..100)
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<f64>,

    /// Saturation (-100..100)
    #[arg(long, allow_hyphen_values = true)]
    saturation: Option<f64>,

    /// Exposure (-100..100)
    #[arg(long, allow_hyphen_values = true)]
    exposure: Option<f64>,

    /// Vibrance (-100..100)
    #[arg(long, allow_hyphen_values = true)]
    vibrance: Option<f64>,

    /// Sharpen amount (0..100)
    #[arg(long)]
    sharpen: Option<f64>,

    /// Blur amount (0..20, radius is 3x)
    #[arg(long)]
    blur: Option<f64>,

    /// Preset filter name
    #[arg(short, long)]
    filter: Option<String>,

    /// Preset blend weight (0..100)
    #[arg(long)]
    filter_intensity: Option<f64>,

    /// Composite RGB curve points as x,y pairs
    #[arg(long, num_args = 2.., value_name = "X,Y")]
    curve: Option<Vec<String>>,

    /// Process on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct CurveArgs {
    /// Control points as x,y pairs
    #[arg(required = true, value_name = "X,Y")]
    points: Vec<String>,

    /// Print as a JSON array
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RenderArgs {
    /// Project JSON file
    project: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Process on a single thread
    #[arg(long)]
    sequential: bool,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Adjust(args) => commands::adjust::run(args, cli.verbose),
        Commands::Curve(args) => commands::curve::run(args),
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::List => commands::list::run(),
    }
}
