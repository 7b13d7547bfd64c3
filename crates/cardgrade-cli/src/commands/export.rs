use std::path::PathBuf;

use anyhow::{Context, Result};
use cardgrade_core::export::annotate;
use cardgrade_core::io::{load_rgba, save_image};
use cardgrade_core::measure::{BorderRatios, MeasureLines};
use clap::Args;

use super::{apply_line_overrides, parse_lines, read_project};

#[derive(Args)]
pub struct ExportArgs {
    /// Rectified card image (output of `cardgrade rectify`)
    pub file: PathBuf,

    /// Read line positions from a project file
    #[arg(long, conflicts_with = "lines")]
    pub project: Option<PathBuf>,

    /// Eight comma-separated line percentages (see `cardgrade measure`)
    #[arg(long)]
    pub lines: Option<String>,

    /// Override single lines, e.g. --set innerTop=11.5
    #[arg(long = "set")]
    pub overrides: Vec<String>,

    /// Output file path
    #[arg(short, long, default_value = "graded.png")]
    pub output: PathBuf,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let mut lines = if let Some(ref path) = args.project {
        read_project(path)?.measure_lines
    } else if let Some(ref s) = args.lines {
        parse_lines(s)?
    } else {
        MeasureLines::default()
    };
    apply_line_overrides(&mut lines, &args.overrides)?;

    let rectified = load_rgba(&args.file)?;
    let annotated = annotate(&rectified, &lines);
    save_image(&annotated, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Centering: {}", BorderRatios::from_lines(&lines));
    println!("Export saved to {}", args.output.display());
    Ok(())
}
