use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::geometry::Point2;
use crate::rectify::bilinear_sample;
use crate::viewport::Region;

use super::{Renderer, Stroke};

/// [`Renderer`] that paints into an in-memory RGBA image.
pub struct RasterRenderer {
    canvas: RgbaImage,
}

impl RasterRenderer {
    /// Blank (transparent) canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    /// Draw on top of an existing image.
    pub fn from_image(canvas: RgbaImage) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Stamp a solid segment `width` pixels wide as parallel 1px lines.
    fn thick_segment(&mut self, from: Point2, to: Point2, width: f64, color: Rgba<u8>) {
        let len = from.distance(&to);
        if len == 0.0 {
            return;
        }
        let (nx, ny) = (-(to.y - from.y) / len, (to.x - from.x) / len);
        let passes = width.round().max(1.0) as i32;
        let first = -(passes - 1) as f64 / 2.0;
        for i in 0..passes {
            let off = first + i as f64;
            draw_line_segment_mut(
                &mut self.canvas,
                ((from.x + nx * off) as f32, (from.y + ny * off) as f32),
                ((to.x + nx * off) as f32, (to.y + ny * off) as f32),
                color,
            );
        }
    }
}

impl Renderer for RasterRenderer {
    fn fill_rect(&mut self, region: Region, color: Rgba<u8>) {
        let w = region.width.round();
        let h = region.height.round();
        if w < 1.0 || h < 1.0 {
            return;
        }
        let rect = Rect::at(region.x.round() as i32, region.y.round() as i32).of_size(w as u32, h as u32);
        draw_filled_rect_mut(&mut self.canvas, rect, color);
    }

    fn draw_image_region(&mut self, image: &RgbaImage, source: Region, dest: Region) {
        if dest.is_empty() || source.is_empty() {
            return;
        }
        let (img_w, img_h) = image.dimensions();
        let (canvas_w, canvas_h) = self.canvas.dimensions();
        let max_x = img_w.saturating_sub(1) as f64;
        let max_y = img_h.saturating_sub(1) as f64;
        let scale_x = source.width / dest.width;
        let scale_y = source.height / dest.height;

        let x0 = dest.x.floor().max(0.0) as u32;
        let y0 = dest.y.floor().max(0.0) as u32;
        let x1 = ((dest.x + dest.width).ceil() as u32).min(canvas_w);
        let y1 = ((dest.y + dest.height).ceil() as u32).min(canvas_h);

        for cy in y0..y1 {
            // Sample at pixel centers.
            let sy = (source.y + (cy as f64 + 0.5 - dest.y) * scale_y - 0.5).clamp(0.0, max_y);
            for cx in x0..x1 {
                let sx = (source.x + (cx as f64 + 0.5 - dest.x) * scale_x - 0.5).clamp(0.0, max_x);
                self.canvas.put_pixel(cx, cy, bilinear_sample(image, sx, sy));
            }
        }
    }

    fn stroke_line(&mut self, from: Point2, to: Point2, stroke: Stroke) {
        let Some((on, off)) = stroke.dash else {
            self.thick_segment(from, to, stroke.width, stroke.color);
            return;
        };

        let len = from.distance(&to);
        if len == 0.0 || on <= 0.0 {
            return;
        }
        let (ux, uy) = ((to.x - from.x) / len, (to.y - from.y) / len);
        let period = on + off.max(0.0);
        let mut t = 0.0;
        while t < len {
            let end = (t + on).min(len);
            self.thick_segment(
                Point2::new(from.x + ux * t, from.y + uy * t),
                Point2::new(from.x + ux * end, from.y + uy * end),
                stroke.width,
                stroke.color,
            );
            t += period;
        }
    }

    fn fill_circle(&mut self, center: Point2, radius: f64, color: Rgba<u8>) {
        draw_filled_circle_mut(
            &mut self.canvas,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round() as i32,
            color,
        );
    }
}
