use std::path::PathBuf;

use anyhow::{Context, Result};
use cardgrade_core::io::{load_rgba, save_image};
use cardgrade_core::measure::MeasureLines;
use cardgrade_core::project::{save_project, ProjectRecord};
use cardgrade_core::quad::CropQuad;
use cardgrade_core::rectify::{rectify_reported, ProgressReporter};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::{load_config, parse_corners, read_project};
use crate::summary::print_rectify_summary;

#[derive(Args)]
pub struct RectifyArgs {
    /// Input card photo
    pub file: PathBuf,

    /// Corners as normalized "x,y;x,y;x,y;x,y" in TL, TR, BR, BL order
    #[arg(long, conflicts_with = "project")]
    pub corners: Option<String>,

    /// Take corners from a saved project file
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Sort corners into TL, TR, BR, BL order before rectifying
    #[arg(long)]
    pub reorder: bool,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write a project file with the corners used
    #[arg(long)]
    pub save_project: Option<PathBuf>,

    /// Output file path (.png or .jpg)
    #[arg(short, long, default_value = "rectified.png")]
    pub output: PathBuf,
}

/// Row progress shown on an indicatif bar.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin(&self, total_rows: usize) {
        self.pb.set_length(total_rows as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, rows_done: usize) {
        self.pb.set_position(rows_done as u64);
    }

    fn finish(&self) {
        self.pb.finish_with_message("Done");
    }
}

pub fn run(args: &RectifyArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let (mut quad, lines) = if let Some(ref path) = args.project {
        let record = read_project(path)?;
        (record.crop_points, record.measure_lines)
    } else if let Some(ref corners) = args.corners {
        (parse_corners(corners)?, MeasureLines::default())
    } else {
        (CropQuad::default(), MeasureLines::default())
    };
    if args.reorder {
        quad = quad.normalized_order();
    }
    debug!(?quad, "using crop corners");

    let source = load_rgba(&args.file)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}/{len} rows")?
            .progress_chars("=> "),
    );
    pb.set_message("Rectifying");

    let reporter = BarReporter { pb };
    let rectification = rectify_reported(&source, &quad, &config.rectify, &reporter)
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;

    save_image(&rectification.image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if let Some(ref path) = args.save_project {
        let name = args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        save_project(&ProjectRecord::new(&name, quad, lines), path)
            .with_context(|| format!("Failed to write project {}", path.display()))?;
    }

    print_rectify_summary(&args.file, &args.output, source.dimensions(), &quad, rectification.size);
    Ok(())
}
