//! Saved grading projects: corners, lines and the derived ratios as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::PROJECT_VERSION;
use crate::error::Result;
use crate::measure::{BorderRatios, MeasureLines};
use crate::quad::CropQuad;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub version: String,
    /// Save time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub image_name: String,
    pub crop_points: CropQuad,
    pub measure_lines: MeasureLines,
    /// Informational; recomputed from `measure_lines` on load.
    pub results: BorderRatios,
}

impl ProjectRecord {
    /// Snapshot the current geometry, stamped with the current time.
    pub fn new(image_name: &str, crop_points: CropQuad, measure_lines: MeasureLines) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            version: PROJECT_VERSION.to_string(),
            timestamp,
            image_name: image_name.to_string(),
            crop_points,
            measure_lines,
            results: BorderRatios::from_lines(&measure_lines),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        Ok(record.normalized())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp lines and bring `results` back in line with them.
    fn normalized(mut self) -> Self {
        if self.version != PROJECT_VERSION {
            warn!(version = %self.version, "project file has unexpected version");
        }
        self.measure_lines = self.measure_lines.clamped();
        self.results = BorderRatios::from_lines(&self.measure_lines);
        self
    }
}

/// Read a project file.
pub fn load_project(path: &Path) -> Result<ProjectRecord> {
    let reader = BufReader::new(File::open(path)?);
    let record: ProjectRecord = serde_json::from_reader(reader)?;
    info!("Loaded project for {} from {}", record.image_name, path.display());
    Ok(record.normalized())
}

/// Write a project file as pretty-printed JSON.
pub fn save_project(record: &ProjectRecord, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, record)?;
    info!("Saved project to {}", path.display());
    Ok(())
}
