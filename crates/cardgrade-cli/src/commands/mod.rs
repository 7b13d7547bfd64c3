pub mod config;
pub mod export;
pub mod info;
pub mod magnify;
pub mod measure;
pub mod rectify;

use std::path::Path;

use anyhow::{bail, Context, Result};
use cardgrade_core::config::GraderConfig;
use cardgrade_core::geometry::NormPoint;
use cardgrade_core::measure::{MeasureLine, MeasureLines};
use cardgrade_core::project::{load_project, ProjectRecord};
use cardgrade_core::quad::CropQuad;

/// Read a TOML config, or fall back to the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GraderConfig> {
    let Some(path) = path else {
        return Ok(GraderConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid cardgrade config")
}

pub fn read_project(path: &Path) -> Result<ProjectRecord> {
    load_project(path).with_context(|| format!("Failed to load project {}", path.display()))
}

/// Parse `"x,y;x,y;x,y;x,y"` (normalized, TL TR BR BL).
pub fn parse_corners(s: &str) -> Result<CropQuad> {
    let points: Vec<NormPoint> = s
        .split(';')
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .with_context(|| format!("Corner '{pair}' must be 'x,y'"))?;
            let x: f64 = x.trim().parse().with_context(|| format!("Bad x in '{pair}'"))?;
            let y: f64 = y.trim().parse().with_context(|| format!("Bad y in '{pair}'"))?;
            Ok(NormPoint::new(x, y))
        })
        .collect::<Result<_>>()?;

    let points: [NormPoint; 4] = points
        .try_into()
        .map_err(|v: Vec<NormPoint>| anyhow::anyhow!("Expected 4 corners, got {}", v.len()))?;
    Ok(CropQuad::new(points))
}

/// Parse eight comma-separated percentages in the order
/// outerTop, innerTop, outerBottom, innerBottom, outerLeft, innerLeft,
/// outerRight, innerRight.
pub fn parse_lines(s: &str) -> Result<MeasureLines> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("Bad line position '{v}'"))
        })
        .collect::<Result<_>>()?;
    if values.len() != MeasureLine::ALL.len() {
        bail!("Expected {} line positions, got {}", MeasureLine::ALL.len(), values.len());
    }

    let mut lines = MeasureLines::default();
    for (line, value) in MeasureLine::ALL.into_iter().zip(values) {
        lines.set(line, value);
    }
    Ok(lines)
}

/// Apply `name=value` overrides such as `outerLeft=3.5`.
pub fn apply_line_overrides(lines: &mut MeasureLines, overrides: &[String]) -> Result<()> {
    for item in overrides {
        let (name, value) = item
            .split_once('=')
            .with_context(|| format!("Override '{item}' must be 'name=value'"))?;
        let line = MeasureLine::from_name(name.trim())
            .with_context(|| format!("Unknown line '{name}'"))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("Bad value in '{item}'"))?;
        lines.set(line, value);
    }
    Ok(())
}
