use image::{Rgba, RgbaImage};

use cardgrade_core::geometry::{NormPoint, Point2};
use cardgrade_core::magnifier::{Renderer, Stroke};
use cardgrade_core::quad::CropQuad;
use cardgrade_core::viewport::{Region, ViewportProvider, ViewportRect};

/// Image whose pixel values encode their own coordinates.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Dark photo with a light card occupying the given pixel rectangle.
pub fn card_photo(width: u32, height: u32, card: (u32, u32, u32, u32)) -> RgbaImage {
    let (cx, cy, cw, ch) = card;
    RgbaImage::from_fn(width, height, |x, y| {
        if x >= cx && x < cx + cw && y >= cy && y < cy + ch {
            Rgba([230, 230, 230, 255])
        } else {
            Rgba([20, 20, 20, 255])
        }
    })
}

/// Axis-aligned quad from normalized bounds.
pub fn rect_quad(x0: f64, y0: f64, x1: f64, y1: f64) -> CropQuad {
    CropQuad::new([
        NormPoint::new(x0, y0),
        NormPoint::new(x1, y0),
        NormPoint::new(x1, y1),
        NormPoint::new(x0, y1),
    ])
}

/// Viewport that is not laid out yet.
pub struct NoViewport;

impl ViewportProvider for NoViewport {
    fn viewport_rect(&self) -> Option<ViewportRect> {
        None
    }
}

/// One call recorded by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    FillRect(Region, Rgba<u8>),
    Image { source: Region, dest: Region },
    Line { from: Point2, to: Point2, stroke: Stroke },
    Circle { center: Point2, radius: f64, color: Rgba<u8> },
}

/// Renderer that only records what it was asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn lines(&self) -> Vec<(Point2, Point2, Stroke)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Line { from, to, stroke } => Some((*from, *to, *stroke)),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Point2, f64, Rgba<u8>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Circle {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn fill_rect(&mut self, region: Region, color: Rgba<u8>) {
        self.calls.push(DrawCall::FillRect(region, color));
    }

    fn draw_image_region(&mut self, _image: &RgbaImage, source: Region, dest: Region) {
        self.calls.push(DrawCall::Image { source, dest });
    }

    fn stroke_line(&mut self, from: Point2, to: Point2, stroke: Stroke) {
        self.calls.push(DrawCall::Line { from, to, stroke });
    }

    fn fill_circle(&mut self, center: Point2, radius: f64, color: Rgba<u8>) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }
}
