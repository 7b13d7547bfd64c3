use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::error::{GradeError, Result};

/// Containers the `image` crate cannot decode. Callers must convert first.
const UNSUPPORTED_EXTENSIONS: [&str; 2] = ["heic", "heif"];

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Decode a photo into 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    if let Some(ext) = extension(path) {
        if UNSUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            warn!(path = %path.display(), "rejected HEIC/HEIF input");
            return Err(GradeError::SourceLoadFailure(format!(
                "{}: HEIC/HEIF must be converted to JPEG or PNG first",
                path.display()
            )));
        }
    }

    let img = image::open(path)
        .map_err(|e| GradeError::SourceLoadFailure(format!("{}: {e}", path.display())))?;
    let rgba = img.into_rgba8();
    debug!(
        path = %path.display(),
        width = rgba.width(),
        height = rgba.height(),
        "decoded source image"
    );
    Ok(rgba)
}

/// Read only the pixel dimensions of an image file.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path)
        .map_err(|e| GradeError::SourceLoadFailure(format!("{}: {e}", path.display())))
}

/// Save an RGBA image as 8-bit PNG.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save an RGBA image, choosing the format from the file extension.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    match extension(path).as_deref() {
        Some("jpg" | "jpeg") => {
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).into_rgb8();
            rgb.save_with_format(path, ImageFormat::Jpeg)?;
            Ok(())
        }
        _ => save_png(img, path),
    }
}
