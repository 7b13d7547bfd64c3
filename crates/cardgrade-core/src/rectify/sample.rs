use image::{Rgba, RgbaImage};

use crate::consts::OUTSIDE_SOURCE_RGBA;

/// Bilinearly interpolate `img` at a sub-pixel position.
///
/// Each channel, alpha included, is weighted independently by the fractional
/// distances to the four neighbours and rounded to the nearest integer. At
/// integer coordinates all weight falls on one pixel, which is returned
/// unchanged. Positions whose neighbourhood leaves the image return opaque
/// black.
pub fn bilinear_sample(img: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = img.dimensions();
    let x1 = x.floor();
    let y1 = y.floor();
    let x2 = x.ceil();
    let y2 = y.ceil();

    if !(x1 >= 0.0 && y1 >= 0.0 && x2 < w as f64 && y2 < h as f64) {
        return Rgba(OUTSIDE_SOURCE_RGBA);
    }

    let fx = x - x1;
    let fy = y - y1;
    let (x1, y1, x2, y2) = (x1 as u32, y1 as u32, x2 as u32, y2 as u32);

    let taps = [
        (img.get_pixel(x1, y1), (1.0 - fx) * (1.0 - fy)),
        (img.get_pixel(x2, y1), fx * (1.0 - fy)),
        (img.get_pixel(x1, y2), (1.0 - fx) * fy),
        (img.get_pixel(x2, y2), fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (px, weight) in taps {
        for (sum, &channel) in acc.iter_mut().zip(px.0.iter()) {
            *sum += channel as f64 * weight;
        }
    }

    Rgba(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
}
