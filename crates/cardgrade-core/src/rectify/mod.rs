mod sample;
mod types;
pub mod worker;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use image::RgbaImage;
use rayon::prelude::*;
use tracing::info;

use crate::config::RectifyConfig;
use crate::consts::{
    MAX_QUAD_ASPECT, MIN_EDGE_PX, OUTSIDE_SOURCE_RGBA, PARALLEL_PIXEL_THRESHOLD,
};
use crate::error::{GradeError, Result};
use crate::geometry::Point2;
use crate::homography::Homography;
use crate::quad::CropQuad;

pub use sample::bilinear_sample;
pub use types::{NoOpReporter, OutputSize, ProgressReporter, Rectification};

/// Choose the rectified image size from the quad's measured edges.
///
/// Width is the mean top/bottom edge length clamped to the configured range;
/// height follows from the measured aspect ratio.
pub fn output_size(
    quad: &CropQuad,
    src_width: u32,
    src_height: u32,
    config: &RectifyConfig,
) -> Result<OutputSize> {
    let extent = quad.extent(src_width, src_height);
    if !(extent.width >= MIN_EDGE_PX && extent.height >= MIN_EDGE_PX) {
        return Err(GradeError::InvalidRegion(format!(
            "measured size {:.2}x{:.2} px is too small",
            extent.width, extent.height
        )));
    }
    let long = extent.width.max(extent.height);
    let short = extent.width.min(extent.height);
    if long > MAX_QUAD_ASPECT * short {
        return Err(GradeError::InvalidRegion(format!(
            "measured size {:.2}x{:.2} px is too elongated",
            extent.width, extent.height
        )));
    }

    let min_w = config.min_width.max(1);
    let max_w = config.max_width.max(min_w);
    let width = (extent.width.round() as u32).clamp(min_w, max_w);
    let aspect = extent.width / extent.height;
    let height = ((width as f64 / aspect).round() as u32).max(1);

    Ok(OutputSize { width, height })
}

/// De-skew the quad region of `source` into an upright rectangle.
pub fn rectify(source: &RgbaImage, quad: &CropQuad, config: &RectifyConfig) -> Result<Rectification> {
    rectify_reported(source, quad, config, &NoOpReporter)
}

/// Like [`rectify`], with progress reported per output row.
///
/// All validation happens before any pixel is written, so an error never
/// leaves a partial image behind.
pub fn rectify_reported(
    source: &RgbaImage,
    quad: &CropQuad,
    config: &RectifyConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Rectification> {
    let (src_w, src_h) = source.dimensions();
    let size = output_size(quad, src_w, src_h, config)?;

    let src_pts = quad.to_pixels(src_w, src_h);
    let (w, h) = (size.width as f64, size.height as f64);
    let dst_pts = [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ];
    let forward = Homography::from_correspondences(&src_pts, &dst_pts)?;
    let dst_to_src = forward.inverse()?;

    info!(
        "Rectifying {}x{} source to {}x{}",
        src_w, src_h, size.width, size.height
    );
    let start = Instant::now();

    let image = warp(source, &dst_to_src, size, reporter);

    info!("Rectification finished in {:.2?}", start.elapsed());
    Ok(Rectification {
        image,
        size,
        dst_to_src,
    })
}

/// Backward warp: every destination pixel pulls from the source.
fn warp(
    source: &RgbaImage,
    dst_to_src: &Homography,
    size: OutputSize,
    reporter: &dyn ProgressReporter,
) -> RgbaImage {
    let (out_w, out_h) = (size.width as usize, size.height as usize);
    let row_bytes = out_w * 4;
    let mut buf = vec![0u8; row_bytes * out_h];
    let rows_done = AtomicUsize::new(0);

    reporter.begin(out_h);

    let fill_row = |(y, row): (usize, &mut [u8])| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&sample_source(source, dst_to_src, x, y));
        }
        let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(done);
    };

    if out_w * out_h >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_mut(row_bytes).enumerate().for_each(fill_row);
    } else {
        buf.chunks_mut(row_bytes).enumerate().for_each(fill_row);
    }

    reporter.finish();

    // Buffer length is exactly out_w * out_h * 4.
    RgbaImage::from_raw(size.width, size.height, buf)
        .unwrap_or_else(|| RgbaImage::new(size.width, size.height))
}

fn sample_source(source: &RgbaImage, dst_to_src: &Homography, x: usize, y: usize) -> [u8; 4] {
    let (src_w, src_h) = source.dimensions();
    let Some(p) = dst_to_src.project(Point2::new(x as f64, y as f64)) else {
        return OUTSIDE_SOURCE_RGBA;
    };
    // The -1 margin guarantees all four interpolation neighbours exist.
    if p.x >= 0.0 && p.x < (src_w as f64 - 1.0) && p.y >= 0.0 && p.y < (src_h as f64 - 1.0) {
        bilinear_sample(source, p.x, p.y).0
    } else {
        OUTSIDE_SOURCE_RGBA
    }
}
