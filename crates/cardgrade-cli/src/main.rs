mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardgrade", about = "Trading card centering measurement tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions and the default crop
    Info(commands::info::InfoArgs),
    /// De-skew the card region of a photo into an upright image
    Rectify(commands::rectify::RectifyArgs),
    /// Compute centering ratios from guide line positions
    Measure(commands::measure::MeasureArgs),
    /// Draw guide lines and a ratio footer onto a rectified card
    Export(commands::export::ExportArgs),
    /// Render the magnifier lens at a point
    Magnify(commands::magnify::MagnifyArgs),
    /// Print or save the default configuration as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Rectify(args) => commands::rectify::run(args),
        Commands::Measure(args) => commands::measure::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Magnify(args) => commands::magnify::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
