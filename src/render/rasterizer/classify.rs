//! Vertex ordering and triangle classification shared by the rasterizers.
//!
//! Screen space is y-down. "Counter-clockwise" below means a positive signed
//! area in that frame, `(p1 - p0) x (p2 - p0) > 0`.
//!
//! ```text
//!   FlatTop        FlatBottom      MajorLeft       MajorRight
//!   v0____v1          v0              v0              v0
//!     \  /            /\              |\              /|
//!      \/            /__\             | v1          v1 |
//!      v2          v1    v2           |/              \|
//!                                     v2              v2
//! ```
//!
//! "Major" names the side the long edge `v0 -> v2` is on.

use super::SimpleTriangle;
use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleShape {
    FlatTop,
    FlatBottom,
    MajorLeft,
    MajorRight,
    /// All three x equal.
    VerticalLine,
    /// All three y equal.
    HorizontalLine,
    /// Zero area but neither axis-aligned.
    Collinear,
}

impl TriangleShape {
    pub fn is_degenerate(self) -> bool {
        matches!(
            self,
            TriangleShape::VerticalLine | TriangleShape::HorizontalLine | TriangleShape::Collinear
        )
    }

    /// Whether the long edge `v0 -> v2` bounds the left side of each span.
    pub fn long_edge_on_left(self) -> bool {
        matches!(self, TriangleShape::FlatTop | TriangleShape::MajorLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    Degenerate,
}

impl SimpleTriangle {
    /// Twice the signed area in the xy plane.
    pub fn signed_area2(&self) -> f64 {
        let [p0, p1, p2] = self.points;
        (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x)
    }

    pub fn winding(&self) -> Winding {
        let area = self.signed_area2();
        if area > 0.0 {
            Winding::CounterClockwise
        } else if area < 0.0 {
            Winding::Clockwise
        } else {
            Winding::Degenerate
        }
    }

    /// Brings the triangle to counter-clockwise order by swapping points 1
    /// and 2. Returns whether a swap happened. Applying it twice is the same
    /// as applying it once.
    pub fn check_and_fix_winding(&mut self) -> bool {
        if self.winding() == Winding::Clockwise {
            self.points.swap(1, 2);
            true
        } else {
            false
        }
    }

    /// Points sorted by y ascending, ties broken by x ascending.
    pub fn sorted_by_y(&self) -> SimpleTriangle {
        let mut points = self.points;
        points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        SimpleTriangle::new(points)
    }

    /// Classifies a triangle already sorted with [`Self::sorted_by_y`].
    pub fn classify(&self) -> TriangleShape {
        let [v0, v1, v2] = self.points;
        if v0.y == v1.y && v1.y == v2.y {
            TriangleShape::HorizontalLine
        } else if v0.x == v1.x && v1.x == v2.x {
            TriangleShape::VerticalLine
        } else if self.signed_area2() == 0.0 {
            TriangleShape::Collinear
        } else if v0.y == v1.y {
            TriangleShape::FlatTop
        } else if v1.y == v2.y {
            TriangleShape::FlatBottom
        } else if self.split_x() < v1.x {
            TriangleShape::MajorLeft
        } else {
            TriangleShape::MajorRight
        }
    }

    /// Where the long edge crosses the middle vertex's scanline (intercept
    /// theorem). Expects a y-sorted triangle with `v0.y != v2.y`.
    pub fn split_x(&self) -> f64 {
        let [v0, v1, v2] = self.points;
        v0.x + (v1.y - v0.y) / (v2.y - v0.y) * (v2.x - v0.x)
    }

    /// Splits a y-sorted general triangle into a flat-bottom upper half and a
    /// flat-top lower half. The split point is rounded onto the lattice.
    pub fn split(&self) -> (SimpleTriangle, SimpleTriangle) {
        let [v0, v1, v2] = self.points;
        let z = v0.z + (v1.y - v0.y) / (v2.y - v0.y) * (v2.z - v0.z);
        let s = Vec3::new(self.split_x().round(), v1.y, z);
        (
            SimpleTriangle::new([v0, v1, s]),
            SimpleTriangle::new([v1, s, v2]),
        )
    }
}
