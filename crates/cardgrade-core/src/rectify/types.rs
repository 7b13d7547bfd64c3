use image::RgbaImage;

use crate::homography::Homography;

/// Rectified output dimensions chosen from the measured quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

/// A finished rectification pass.
#[derive(Clone, Debug)]
pub struct Rectification {
    pub image: RgbaImage,
    pub size: OutputSize,
    /// Maps rectified pixels back into the source photo.
    pub dst_to_src: Homography,
}

/// Thread-safe progress reporting for the resampling pass.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// Resampling is about to start over `total_rows` output rows.
    fn begin(&self, _total_rows: usize) {}

    /// `rows_done` output rows have been written so far.
    fn advance(&self, _rows_done: usize) {}

    /// The pass is complete.
    fn finish(&self) {}
}

/// Progress reporter that ignores everything.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
