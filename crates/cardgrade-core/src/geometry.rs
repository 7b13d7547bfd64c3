use serde::{Deserialize, Serialize};

/// An absolute position in pixel or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A position relative to an image, each axis in [0, 1].
///
/// Every constructor and mutator clamps, so a `NormPoint` is always inside
/// the image. Conversion to pixels goes through [`NormPoint::to_pixels`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNormPoint")]
pub struct NormPoint {
    x: f64,
    y: f64,
}

/// Unvalidated form used for deserialization so loaded values get clamped too.
#[derive(Deserialize)]
struct RawNormPoint {
    x: f64,
    y: f64,
}

impl From<RawNormPoint> for NormPoint {
    fn from(raw: RawNormPoint) -> Self {
        NormPoint::new(raw.x, raw.y)
    }
}

impl NormPoint {
    /// Build a normalized point, clamping both axes into [0, 1].
    /// NaN collapses to 0.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Shift by a normalized delta, re-clamping.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Position in the pixel space of an image of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> Point2 {
        Point2::new(self.x * width as f64, self.y * height as f64)
    }

    /// Inverse of [`NormPoint::to_pixels`].
    pub fn from_pixels(p: Point2, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        Self::new(p.x / width as f64, p.y / height as f64)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Twice the signed area of triangle `abc`.
pub fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_point_clamps_on_construction() {
        let p = NormPoint::new(-0.5, 1.7);
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 1.0);
    }

    #[test]
    fn norm_point_nan_collapses_to_zero() {
        let p = NormPoint::new(f64::NAN, 0.5);
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 0.5);
    }

    #[test]
    fn norm_point_offset_reclamps() {
        let p = NormPoint::new(0.95, 0.05).offset(0.1, -0.1);
        assert_eq!(p, NormPoint::new(1.0, 0.0));
    }

    #[test]
    fn norm_point_pixels_roundtrip() {
        let p = NormPoint::new(0.25, 0.75);
        let px = p.to_pixels(400, 200);
        assert_eq!(px, Point2::new(100.0, 150.0));
        assert_eq!(NormPoint::from_pixels(px, 400, 200), p);
    }

    #[test]
    fn deserialized_points_are_clamped() {
        let p: NormPoint = serde_json::from_str(r#"{"x": 1.5, "y": -2.0}"#).unwrap();
        assert_eq!(p, NormPoint::new(1.0, 0.0));
    }
}
