//! Conversions between normalized image space, on-screen pixels, and the
//! magnifier canvas.
//!
//! The on-screen rectangle moves with scrolling, zoom and layout, so nothing
//! here caches it: every call takes a freshly sampled [`ViewportRect`].

use crate::geometry::{NormPoint, Point2};

/// Live on-screen bounding box of the displayed image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// False while the image has not been laid out yet.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Clamp a screen point into the rectangle.
    pub fn clamp(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x.clamp(self.left, self.right().max(self.left)),
            p.y.clamp(self.top, self.bottom().max(self.top)),
        )
    }
}

/// Source of the current viewport geometry, sampled on demand.
pub trait ViewportProvider {
    /// The current on-screen rect of the displayed image, or `None` when
    /// it is not available (e.g. not laid out yet).
    fn viewport_rect(&self) -> Option<ViewportRect>;
}

impl ViewportProvider for ViewportRect {
    fn viewport_rect(&self) -> Option<ViewportRect> {
        Some(*self)
    }
}

/// Sample a provider, treating a zero-size rect as unavailable.
pub fn sample(provider: &dyn ViewportProvider) -> Option<ViewportRect> {
    provider.viewport_rect().filter(ViewportRect::has_area)
}

pub fn normalized_to_screen(p: NormPoint, rect: &ViewportRect) -> Point2 {
    Point2::new(
        rect.left + p.x() * rect.width,
        rect.top + p.y() * rect.height,
    )
}

/// Screen point to normalized image coordinates, clamped into [0, 1].
/// `None` when the rect has no area.
pub fn screen_to_normalized(p: Point2, rect: &ViewportRect) -> Option<NormPoint> {
    if !rect.has_area() {
        return None;
    }
    Some(NormPoint::new(
        (p.x - rect.left) / rect.width,
        (p.y - rect.top) / rect.height,
    ))
}

/// Axis-aligned rectangle in either source pixels or canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Where the magnifier reads from the image and where it draws on its canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagnifierWindow {
    /// Focus position in image pixels; maps to the canvas center.
    pub center: Point2,
    /// Source pixels to copy, clipped to the image bounds.
    pub source: Region,
    /// Canvas area receiving `source`. Empty when the focus is far off the image.
    pub dest: Region,
    pub zoom: f64,
    pub canvas_size: f64,
}

impl MagnifierWindow {
    /// Map an image pixel position onto the canvas.
    pub fn to_canvas(&self, p: Point2) -> Point2 {
        let half = self.canvas_size / 2.0;
        Point2::new(
            (p.x - self.center.x) * self.zoom + half,
            (p.y - self.center.y) * self.zoom + half,
        )
    }
}

/// Compute the clipped magnifier window for a screen-space focus point.
///
/// The focus is mapped screen -> normalized -> image pixels without
/// clamping, so a focus near the edge keeps the lens centred on the pointer.
/// Parts of the window outside the image are excluded from both regions;
/// the canvas background shows through there.
pub fn magnifier_window(
    focus: Point2,
    rect: &ViewportRect,
    image_width: u32,
    image_height: u32,
    canvas_size: f64,
    zoom: f64,
) -> Option<MagnifierWindow> {
    if !rect.has_area() || zoom <= 0.0 || canvas_size <= 0.0 {
        return None;
    }
    let img_w = image_width as f64;
    let img_h = image_height as f64;

    let center = Point2::new(
        (focus.x - rect.left) / rect.width * img_w,
        (focus.y - rect.top) / rect.height * img_h,
    );

    let clip = canvas_size / zoom;
    let mut src_x = center.x - clip / 2.0;
    let mut src_y = center.y - clip / 2.0;
    let mut dst_x = 0.0;
    let mut dst_y = 0.0;
    let mut dst_w = canvas_size;
    let mut dst_h = canvas_size;

    if src_x < 0.0 {
        dst_x = -src_x * zoom;
        dst_w -= dst_x;
        src_x = 0.0;
    }
    if src_y < 0.0 {
        dst_y = -src_y * zoom;
        dst_h -= dst_y;
        src_y = 0.0;
    }
    if src_x + dst_w / zoom > img_w {
        dst_w = (img_w - src_x) * zoom;
    }
    if src_y + dst_h / zoom > img_h {
        dst_h = (img_h - src_y) * zoom;
    }

    let dest = Region {
        x: dst_x,
        y: dst_y,
        width: dst_w.max(0.0),
        height: dst_h.max(0.0),
    };
    let source = Region {
        x: src_x,
        y: src_y,
        width: dest.width / zoom,
        height: dest.height / zoom,
    };

    Some(MagnifierWindow {
        center,
        source,
        dest,
        zoom,
        canvas_size,
    })
}
