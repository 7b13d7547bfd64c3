use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cardgrade_core::geometry::{NormPoint, Point2};
use cardgrade_core::io::{load_rgba, save_png};
use cardgrade_core::magnifier::{
    render_magnifier, MagnifierMode, MagnifierState, Overlay, RasterRenderer,
};
use cardgrade_core::measure::MeasureLines;
use cardgrade_core::quad::CropQuad;
use cardgrade_core::viewport::{normalized_to_screen, ViewportRect};
use clap::{Args, ValueEnum};

use super::{load_config, read_project};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Crop polygon over a source photo
    Crop,
    /// Guide lines over a rectified card
    Measure,
}

#[derive(Args)]
pub struct MagnifyArgs {
    /// Image to inspect
    pub file: PathBuf,

    /// Focus point as normalized "x,y"
    #[arg(long, default_value = "0.5,0.5")]
    pub at: String,

    /// Magnification factor
    #[arg(long, default_value = "2.0")]
    pub zoom: f64,

    /// Overlay to draw
    #[arg(long, value_enum, default_value = "crop")]
    pub mode: ModeArg,

    /// Take corners and lines from a project file
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "magnifier.png")]
    pub output: PathBuf,
}

pub fn run(args: &MagnifyArgs) -> Result<()> {
    if !(args.zoom > 0.0 && args.zoom.is_finite()) {
        bail!("Zoom must be a positive number");
    }
    let config = load_config(args.config.as_deref())?;
    let (quad, lines) = match args.project {
        Some(ref path) => {
            let record = read_project(path)?;
            (record.crop_points, record.measure_lines)
        }
        None => (CropQuad::default(), MeasureLines::default()),
    };

    let (x, y) = args
        .at
        .split_once(',')
        .context("--at must be 'x,y'")?;
    let focus = NormPoint::new(
        x.trim().parse().context("Bad x in --at")?,
        y.trim().parse().context("Bad y in --at")?,
    );

    let image = load_rgba(&args.file)?;
    // Display the image 1:1 at the origin.
    let rect = ViewportRect::new(0.0, 0.0, image.width() as f64, image.height() as f64);

    let (mode, overlay) = match args.mode {
        ModeArg::Crop => (MagnifierMode::Crop, Overlay::Crop(&quad)),
        ModeArg::Measure => (MagnifierMode::Measure, Overlay::Measure(&lines)),
    };
    let state = MagnifierState {
        visible: true,
        focus: normalized_to_screen(focus, &rect),
        zoom: args.zoom,
        mode,
        tracking: false,
    };

    let size = config.magnifier.canvas_size(args.zoom).round() as u32;
    let mut renderer = RasterRenderer::new(size, size);
    let window = render_magnifier(&mut renderer, &state, &image, &rect, overlay, &config.magnifier)
        .context("Nothing to render at this focus")?;

    save_png(renderer.canvas(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let Point2 { x: cx, y: cy } = window.center;
    println!(
        "Magnifier {}x{} at ({:.1}, {:.1}) px, zoom {}x saved to {}",
        size,
        size,
        cx,
        cy,
        args.zoom,
        args.output.display()
    );
    Ok(())
}
