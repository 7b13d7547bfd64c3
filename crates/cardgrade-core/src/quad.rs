use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{NormPoint, Point2};

/// One of the four card corners, in correspondence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLeft => write!(f, "Top left"),
            Self::TopRight => write!(f, "Top right"),
            Self::BottomRight => write!(f, "Bottom right"),
            Self::BottomLeft => write!(f, "Bottom left"),
        }
    }
}

/// The four user-placed card corners in normalized source-image space,
/// ordered TL, TR, BR, BL.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropQuad {
    points: [NormPoint; 4],
}

impl Default for CropQuad {
    fn default() -> Self {
        Self::new([
            NormPoint::new(0.15, 0.15),
            NormPoint::new(0.85, 0.15),
            NormPoint::new(0.85, 0.85),
            NormPoint::new(0.15, 0.85),
        ])
    }
}

/// Measured quad size in source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadExtent {
    /// Mean of the top and bottom edge lengths.
    pub width: f64,
    /// Mean of the left and right edge lengths.
    pub height: f64,
}

impl CropQuad {
    pub fn new(points: [NormPoint; 4]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[NormPoint; 4] {
        &self.points
    }

    pub fn get(&self, corner: Corner) -> NormPoint {
        self.points[corner.index()]
    }

    pub fn set(&mut self, corner: Corner, point: NormPoint) {
        self.points[corner.index()] = point;
    }

    /// Move one corner by a normalized delta, clamped to the image.
    pub fn nudge(&mut self, corner: Corner, dx: f64, dy: f64) -> NormPoint {
        let moved = self.get(corner).offset(dx, dy);
        self.set(corner, moved);
        moved
    }

    /// Corners in the pixel space of a `width` x `height` image.
    pub fn to_pixels(&self, width: u32, height: u32) -> [Point2; 4] {
        self.points.map(|p| p.to_pixels(width, height))
    }

    /// Average edge lengths, measured in source pixels.
    pub fn extent(&self, width: u32, height: u32) -> QuadExtent {
        let [tl, tr, br, bl] = self.to_pixels(width, height);
        QuadExtent {
            width: (tl.distance(&tr) + bl.distance(&br)) / 2.0,
            height: (tl.distance(&bl) + tr.distance(&br)) / 2.0,
        }
    }

    /// Reorder the corners into TL, TR, BR, BL by angle around the centroid.
    ///
    /// The default contract trusts the order the user placed the corners in;
    /// this is an explicit opt-in for quads whose corners were placed rotated
    /// or mirrored.
    pub fn normalized_order(&self) -> CropQuad {
        let cx = self.points.iter().map(|p| p.x()).sum::<f64>() / 4.0;
        let cy = self.points.iter().map(|p| p.y()).sum::<f64>() / 4.0;

        let mut sorted = self.points;
        // Screen space has y down, so increasing atan2 runs clockwise on screen.
        sorted.sort_by(|a, b| {
            let ta = (a.y() - cy).atan2(a.x() - cx);
            let tb = (b.y() - cy).atan2(b.x() - cx);
            ta.total_cmp(&tb)
        });

        // Rotate so the corner closest to the image origin comes first.
        let start = sorted
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (a.x() + a.y()).total_cmp(&(b.x() + b.y())))
            .map(|(i, _)| i)
            .unwrap_or(0);
        sorted.rotate_left(start);
        CropQuad::new(sorted)
    }
}
