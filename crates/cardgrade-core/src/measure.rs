use std::fmt;

use serde::{Deserialize, Serialize};

/// Which border boundary a line marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The physical card edge.
    Outer,
    /// The edge of the printed graphic.
    Inner,
}

/// Which side of the card a line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Direction a guide line is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Spans the image width; its value is a vertical position.
    Horizontal,
    /// Spans the image height; its value is a horizontal position.
    Vertical,
}

impl Edge {
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Top | Self::Bottom => Orientation::Horizontal,
            Self::Left | Self::Right => Orientation::Vertical,
        }
    }
}

/// One of the eight measurement guide lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeasureLine {
    pub side: Side,
    pub edge: Edge,
}

impl MeasureLine {
    pub const OUTER_TOP: Self = Self::new(Side::Outer, Edge::Top);
    pub const INNER_TOP: Self = Self::new(Side::Inner, Edge::Top);
    pub const OUTER_BOTTOM: Self = Self::new(Side::Outer, Edge::Bottom);
    pub const INNER_BOTTOM: Self = Self::new(Side::Inner, Edge::Bottom);
    pub const OUTER_LEFT: Self = Self::new(Side::Outer, Edge::Left);
    pub const INNER_LEFT: Self = Self::new(Side::Inner, Edge::Left);
    pub const OUTER_RIGHT: Self = Self::new(Side::Outer, Edge::Right);
    pub const INNER_RIGHT: Self = Self::new(Side::Inner, Edge::Right);

    pub const ALL: [Self; 8] = [
        Self::OUTER_TOP,
        Self::INNER_TOP,
        Self::OUTER_BOTTOM,
        Self::INNER_BOTTOM,
        Self::OUTER_LEFT,
        Self::INNER_LEFT,
        Self::OUTER_RIGHT,
        Self::INNER_RIGHT,
    ];

    pub const fn new(side: Side, edge: Edge) -> Self {
        Self { side, edge }
    }

    pub fn orientation(self) -> Orientation {
        self.edge.orientation()
    }

    /// Stable camelCase identifier, as used in project files.
    pub fn name(self) -> &'static str {
        match (self.side, self.edge) {
            (Side::Outer, Edge::Top) => "outerTop",
            (Side::Inner, Edge::Top) => "innerTop",
            (Side::Outer, Edge::Bottom) => "outerBottom",
            (Side::Inner, Edge::Bottom) => "innerBottom",
            (Side::Outer, Edge::Left) => "outerLeft",
            (Side::Inner, Edge::Left) => "innerLeft",
            (Side::Outer, Edge::Right) => "outerRight",
            (Side::Inner, Edge::Right) => "innerRight",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }
}

impl fmt::Display for MeasureLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Positions of the eight guide lines, as percentages (0-100) of the
/// rectified image height (horizontal lines) or width (vertical lines).
///
/// Outer and inner lines may cross; no ordering is enforced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureLines {
    outer_top: f64,
    inner_top: f64,
    outer_bottom: f64,
    inner_bottom: f64,
    outer_left: f64,
    inner_left: f64,
    outer_right: f64,
    inner_right: f64,
}

impl Default for MeasureLines {
    fn default() -> Self {
        Self {
            outer_top: 2.0,
            inner_top: 12.0,
            outer_bottom: 98.0,
            inner_bottom: 88.0,
            outer_left: 3.0,
            inner_left: 13.0,
            outer_right: 97.0,
            inner_right: 87.0,
        }
    }
}

impl MeasureLines {
    pub fn get(&self, line: MeasureLine) -> f64 {
        *self.slot(line)
    }

    /// Set a line position, clamped into [0, 100]. Returns the stored value.
    pub fn set(&mut self, line: MeasureLine, percent: f64) -> f64 {
        let v = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        *self.slot_mut(line) = v;
        v
    }

    /// Shift a line by a percentage delta, clamped.
    pub fn nudge(&mut self, line: MeasureLine, delta_percent: f64) -> f64 {
        let current = self.get(line);
        self.set(line, current + delta_percent)
    }

    /// Clamp every value into [0, 100]. Used after loading external data.
    pub fn clamped(mut self) -> Self {
        for line in MeasureLine::ALL {
            let v = self.get(line);
            self.set(line, v);
        }
        self
    }

    /// Border thickness on one edge: distance between its outer and inner line.
    pub fn border(&self, edge: Edge) -> f64 {
        (self.get(MeasureLine::new(Side::Inner, edge)) - self.get(MeasureLine::new(Side::Outer, edge)))
            .abs()
    }

    fn slot(&self, line: MeasureLine) -> &f64 {
        match (line.side, line.edge) {
            (Side::Outer, Edge::Top) => &self.outer_top,
            (Side::Inner, Edge::Top) => &self.inner_top,
            (Side::Outer, Edge::Bottom) => &self.outer_bottom,
            (Side::Inner, Edge::Bottom) => &self.inner_bottom,
            (Side::Outer, Edge::Left) => &self.outer_left,
            (Side::Inner, Edge::Left) => &self.inner_left,
            (Side::Outer, Edge::Right) => &self.outer_right,
            (Side::Inner, Edge::Right) => &self.inner_right,
        }
    }

    fn slot_mut(&mut self, line: MeasureLine) -> &mut f64 {
        match (line.side, line.edge) {
            (Side::Outer, Edge::Top) => &mut self.outer_top,
            (Side::Inner, Edge::Top) => &mut self.inner_top,
            (Side::Outer, Edge::Bottom) => &mut self.outer_bottom,
            (Side::Inner, Edge::Bottom) => &mut self.inner_bottom,
            (Side::Outer, Edge::Left) => &mut self.outer_left,
            (Side::Inner, Edge::Left) => &mut self.inner_left,
            (Side::Outer, Edge::Right) => &mut self.outer_right,
            (Side::Inner, Edge::Right) => &mut self.inner_right,
        }
    }
}

/// Top/bottom share of the vertical borders, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerticalRatio {
    pub top: f64,
    pub bottom: f64,
}

/// Left/right share of the horizontal borders, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizontalRatio {
    pub left: f64,
    pub right: f64,
}

/// Centering ratios derived from the guide lines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderRatios {
    #[serde(rename = "h")]
    pub horizontal: HorizontalRatio,
    #[serde(rename = "v")]
    pub vertical: VerticalRatio,
}

impl BorderRatios {
    pub fn from_lines(lines: &MeasureLines) -> Self {
        let (left, right) = split(lines.border(Edge::Left), lines.border(Edge::Right));
        let (top, bottom) = split(lines.border(Edge::Top), lines.border(Edge::Bottom));
        Self {
            horizontal: HorizontalRatio { left, right },
            vertical: VerticalRatio { top, bottom },
        }
    }
}

impl fmt::Display for BorderRatios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "H {:.1} : {:.1}, V {:.1} : {:.1}",
            self.horizontal.left, self.horizontal.right, self.vertical.top, self.vertical.bottom
        )
    }
}

/// Express two border widths as percentages of their sum.
/// A zero sum divides by 1 so both shares come out as 0.
fn split(a: f64, b: f64) -> (f64, f64) {
    let total = a + b;
    let total = if total == 0.0 { 1.0 } else { total };
    (a / total * 100.0, b / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_follows_edge() {
        assert_eq!(MeasureLine::OUTER_TOP.orientation(), Orientation::Horizontal);
        assert_eq!(MeasureLine::INNER_BOTTOM.orientation(), Orientation::Horizontal);
        assert_eq!(MeasureLine::OUTER_LEFT.orientation(), Orientation::Vertical);
        assert_eq!(MeasureLine::INNER_RIGHT.orientation(), Orientation::Vertical);
    }

    #[test]
    fn names_roundtrip() {
        for line in MeasureLine::ALL {
            assert_eq!(MeasureLine::from_name(line.name()), Some(line));
        }
        assert_eq!(MeasureLine::from_name("middleTop"), None);
    }

    #[test]
    fn set_clamps_to_percent_range() {
        let mut lines = MeasureLines::default();
        assert_eq!(lines.set(MeasureLine::OUTER_LEFT, -4.0), 0.0);
        assert_eq!(lines.set(MeasureLine::OUTER_RIGHT, 140.0), 100.0);
    }

    #[test]
    fn crossed_lines_are_allowed() {
        let mut lines = MeasureLines::default();
        lines.set(MeasureLine::INNER_TOP, 1.0);
        assert_eq!(lines.get(MeasureLine::INNER_TOP), 1.0);
        assert!((lines.border(Edge::Top) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_borders_do_not_divide_by_zero() {
        let mut lines = MeasureLines::default();
        lines.set(MeasureLine::INNER_LEFT, 3.0);
        lines.set(MeasureLine::INNER_RIGHT, 97.0);
        let r = BorderRatios::from_lines(&lines);
        assert_eq!(r.horizontal.left, 0.0);
        assert_eq!(r.horizontal.right, 0.0);
    }
}
