mod raster;

use image::{Rgba, RgbaImage};

use crate::config::MagnifierConfig;
use crate::consts::{
    CENTER_MARKER_RADIUS, CORNER_MARKER_RADIUS, OVERLAY_DASH, OVERLAY_LINE_WIDTH,
};
use crate::geometry::Point2;
use crate::measure::{MeasureLines, Orientation, Side};
use crate::quad::CropQuad;
use crate::viewport::{magnifier_window, MagnifierWindow, Region, ViewportRect};

pub use raster::RasterRenderer;

/// Canvas background behind the magnified image.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Crop polygon and corner markers.
pub const CROP_COLOR: Rgba<u8> = Rgba([34, 197, 94, 255]);
/// Outer (card edge) measurement lines.
pub const OUTER_LINE_COLOR: Rgba<u8> = Rgba([59, 130, 246, 255]);
/// Inner (graphic edge) measurement lines.
pub const INNER_LINE_COLOR: Rgba<u8> = Rgba([239, 68, 68, 255]);
/// Focus marker at the canvas center.
pub const CENTER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Line style for [`Renderer::stroke_line`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    pub width: f64,
    /// `(on, off)` dash lengths, or `None` for a solid line.
    pub dash: Option<(f64, f64)>,
}

/// Drawing surface for the magnifier and export overlays.
///
/// Coordinates are canvas pixels.
pub trait Renderer {
    fn fill_rect(&mut self, region: Region, color: Rgba<u8>);

    /// Copy `source` (image pixels) scaled into `dest` (canvas pixels).
    fn draw_image_region(&mut self, image: &RgbaImage, source: Region, dest: Region);

    fn stroke_line(&mut self, from: Point2, to: Point2, stroke: Stroke);

    fn fill_circle(&mut self, center: Point2, radius: f64, color: Rgba<u8>);
}

/// Which overlay the magnifier draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MagnifierMode {
    #[default]
    Crop,
    Measure,
}

/// Visibility and focus of the magnifier lens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagnifierState {
    pub visible: bool,
    /// Focus point in screen coordinates.
    pub focus: Point2,
    pub zoom: f64,
    pub mode: MagnifierMode,
    /// True while the lens follows a live drag rather than a fixed probe.
    pub tracking: bool,
}

impl Default for MagnifierState {
    fn default() -> Self {
        Self {
            visible: false,
            focus: Point2::default(),
            zoom: crate::consts::DEFAULT_ZOOM,
            mode: MagnifierMode::Crop,
            tracking: false,
        }
    }
}

/// Overlay geometry drawn on top of the magnified image.
#[derive(Clone, Copy, Debug)]
pub enum Overlay<'a> {
    Crop(&'a CropQuad),
    Measure(&'a MeasureLines),
}

/// Draw the magnifier for `state` onto `renderer`.
///
/// Returns the window used, or `None` when nothing was drawn (hidden lens
/// or a viewport without area). Stroke widths and marker radii are in
/// canvas pixels and do not scale with zoom.
pub fn render_magnifier(
    renderer: &mut dyn Renderer,
    state: &MagnifierState,
    image: &RgbaImage,
    rect: &ViewportRect,
    overlay: Overlay<'_>,
    config: &MagnifierConfig,
) -> Option<MagnifierWindow> {
    if !state.visible {
        return None;
    }
    let size = config.canvas_size(state.zoom);
    let (img_w, img_h) = image.dimensions();
    let window = magnifier_window(state.focus, rect, img_w, img_h, size, state.zoom)?;

    renderer.fill_rect(
        Region {
            x: 0.0,
            y: 0.0,
            width: size,
            height: size,
        },
        BACKGROUND,
    );

    if !window.dest.is_empty() {
        renderer.draw_image_region(image, window.source, window.dest);
    }

    match overlay {
        Overlay::Crop(quad) => draw_crop_overlay(renderer, &window, quad, img_w, img_h),
        Overlay::Measure(lines) => draw_measure_overlay(renderer, &window, lines, img_w, img_h),
    }

    renderer.fill_circle(
        Point2::new(size / 2.0, size / 2.0),
        CENTER_MARKER_RADIUS,
        CENTER_COLOR,
    );

    Some(window)
}

fn draw_crop_overlay(
    renderer: &mut dyn Renderer,
    window: &MagnifierWindow,
    quad: &CropQuad,
    img_w: u32,
    img_h: u32,
) {
    let pts = quad.to_pixels(img_w, img_h).map(|p| window.to_canvas(p));
    let stroke = Stroke {
        color: CROP_COLOR,
        width: OVERLAY_LINE_WIDTH,
        dash: Some(OVERLAY_DASH),
    };
    for i in 0..pts.len() {
        renderer.stroke_line(pts[i], pts[(i + 1) % pts.len()], stroke);
    }
    for p in pts {
        renderer.fill_circle(p, CORNER_MARKER_RADIUS, CROP_COLOR);
    }
}

fn draw_measure_overlay(
    renderer: &mut dyn Renderer,
    window: &MagnifierWindow,
    lines: &MeasureLines,
    img_w: u32,
    img_h: u32,
) {
    let size = window.canvas_size;
    // Outer set first so inner lines sit on top where they overlap.
    for side in [Side::Outer, Side::Inner] {
        let color = match side {
            Side::Outer => OUTER_LINE_COLOR,
            Side::Inner => INNER_LINE_COLOR,
        };
        let stroke = Stroke {
            color,
            width: OVERLAY_LINE_WIDTH,
            dash: Some(OVERLAY_DASH),
        };

        for line in crate::measure::MeasureLine::ALL.into_iter().filter(|l| l.side == side) {
            let frac = lines.get(line) / 100.0;
            match line.orientation() {
                Orientation::Horizontal => {
                    let y = window.to_canvas(Point2::new(0.0, frac * img_h as f64)).y;
                    if (0.0..=size).contains(&y) {
                        renderer.stroke_line(Point2::new(0.0, y), Point2::new(size, y), stroke);
                    }
                }
                Orientation::Vertical => {
                    let x = window.to_canvas(Point2::new(frac * img_w as f64, 0.0)).x;
                    if (0.0..=size).contains(&x) {
                        renderer.stroke_line(Point2::new(x, 0.0), Point2::new(x, size), stroke);
                    }
                }
            }
        }
    }
}
