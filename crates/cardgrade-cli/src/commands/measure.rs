use std::path::PathBuf;

use anyhow::{Context, Result};
use cardgrade_core::measure::{BorderRatios, MeasureLines};
use cardgrade_core::project::{save_project, ProjectRecord};
use clap::Args;

use super::{apply_line_overrides, parse_lines, read_project};
use crate::summary::print_measure_summary;

#[derive(Args)]
pub struct MeasureArgs {
    /// Read line positions from a project file
    #[arg(long, conflicts_with = "lines")]
    pub project: Option<PathBuf>,

    /// Eight percentages: outerTop,innerTop,outerBottom,innerBottom,outerLeft,innerLeft,outerRight,innerRight
    #[arg(long)]
    pub lines: Option<String>,

    /// Override single lines, e.g. --set outerLeft=3.5
    #[arg(long = "set")]
    pub overrides: Vec<String>,

    /// Write the updated lines back to the project file
    #[arg(long, requires = "project")]
    pub update: bool,

    /// Print the ratios as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &MeasureArgs) -> Result<()> {
    let record = args.project.as_deref().map(read_project).transpose()?;

    let mut lines = match (&record, &args.lines) {
        (Some(r), _) => r.measure_lines,
        (None, Some(s)) => parse_lines(s)?,
        (None, None) => MeasureLines::default(),
    };
    apply_line_overrides(&mut lines, &args.overrides)?;
    let ratios = BorderRatios::from_lines(&lines);

    if args.update {
        if let (Some(path), Some(record)) = (&args.project, &record) {
            let updated = ProjectRecord::new(&record.image_name, record.crop_points, lines);
            save_project(&updated, path)
                .with_context(|| format!("Failed to write project {}", path.display()))?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ratios)?);
    } else {
        print_measure_summary(&lines, &ratios);
    }
    Ok(())
}
