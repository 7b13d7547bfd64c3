//! Annotated copy of a rectified card for sharing.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::consts::{EXPORT_DASH, EXPORT_FOOTER_HEIGHT, EXPORT_LINE_WIDTH};
use crate::geometry::Point2;
use crate::magnifier::{RasterRenderer, Renderer, Stroke, INNER_LINE_COLOR, OUTER_LINE_COLOR};
use crate::measure::{BorderRatios, MeasureLine, MeasureLines, Orientation, Side};

/// Footer band colour (#111827).
pub const FOOTER_COLOR: Rgba<u8> = Rgba([17, 24, 39, 255]);

/// Ratio readout colour.
pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pixel scale of the 8x8 glyphs, giving 32 px text.
const TEXT_SCALE: u32 = 4;
const GLYPH_SIZE: u32 = 8;

/// Composite the guide lines and a footer band onto a copy of `rectified`.
///
/// The footer carries the centering readout: `H: left : right` centred in
/// the left half and `V: top : bottom` centred in the right half.
pub fn annotate(rectified: &RgbaImage, lines: &MeasureLines) -> RgbaImage {
    let (w, h) = rectified.dimensions();
    let mut canvas = RgbaImage::from_pixel(w, h + EXPORT_FOOTER_HEIGHT, FOOTER_COLOR);
    image::imageops::replace(&mut canvas, rectified, 0, 0);

    let mut renderer = RasterRenderer::from_image(canvas);
    for side in [Side::Outer, Side::Inner] {
        let stroke = Stroke {
            color: match side {
                Side::Outer => OUTER_LINE_COLOR,
                Side::Inner => INNER_LINE_COLOR,
            },
            width: EXPORT_LINE_WIDTH,
            dash: Some(EXPORT_DASH),
        };
        for line in MeasureLine::ALL.into_iter().filter(|l| l.side == side) {
            let frac = lines.get(line) / 100.0;
            let (from, to) = match line.orientation() {
                Orientation::Horizontal => {
                    let y = frac * h as f64;
                    (Point2::new(0.0, y), Point2::new(w as f64, y))
                }
                Orientation::Vertical => {
                    let x = frac * w as f64;
                    (Point2::new(x, 0.0), Point2::new(x, h as f64))
                }
            };
            renderer.stroke_line(from, to, stroke);
        }
    }

    let mut out = renderer.into_image();
    draw_readout(&mut out, h, &BorderRatios::from_lines(lines));
    debug!(width = w, height = h, "annotated export");
    out
}

/// Footer strings, e.g. `H: 50.0 : 50.0` and `V: 50.0 : 50.0`.
pub fn readout_text(ratios: &BorderRatios) -> [String; 2] {
    [
        format!("H: {:.1} : {:.1}", ratios.horizontal.left, ratios.horizontal.right),
        format!("V: {:.1} : {:.1}", ratios.vertical.top, ratios.vertical.bottom),
    ]
}

fn draw_readout(img: &mut RgbaImage, footer_top: u32, ratios: &BorderRatios) {
    let column = img.width() / 2;
    for (i, text) in readout_text(ratios).iter().enumerate() {
        let chars = text.chars().count() as u32;
        // Shrink to fit the half-width column on narrow cards.
        let scale = (column / (chars * GLYPH_SIZE).max(1)).clamp(1, TEXT_SCALE);
        let text_w = chars * GLYPH_SIZE * scale;
        let center = column / 2 + i as u32 * column;
        let x = center as i32 - (text_w / 2) as i32;
        let y = footer_top + EXPORT_FOOTER_HEIGHT.saturating_sub(GLYPH_SIZE * scale) / 2;
        draw_bitmap_text(img, x, y as i32, text, scale);
    }
}

fn draw_bitmap_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, scale: u32) {
    let step = (GLYPH_SIZE * scale) as i32;
    for (n, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let left = x + n as i32 * step;
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = left + (col * scale) as i32;
                let py = y + (row as u32 * scale) as i32;
                draw_filled_rect_mut(img, Rect::at(px, py).of_size(scale, scale), TEXT_COLOR);
            }
        }
    }
}
