//! Scanline-based triangle rasterization.
//!
//! This module implements triangle rasterization by walking the triangle's
//! edges with the Bresenham generator and filling one horizontal span per
//! scanline, the way early software renderers did it.
//!
//! # Algorithm Overview
//!
//! 1. **Snap** vertices to the pixel lattice.
//! 2. **Sort** vertices by Y (top to bottom in screen space), ties by X.
//! 3. **Classify** the triangle (flat-top, flat-bottom, major-left,
//!    major-right, or one of the degenerate lines).
//! 4. **Walk** the edges: a Bresenham table of edge pixels per row for the
//!    inclusive fill, an exact center crossing per row for top-left.
//! 5. **Fill** one span per row between the left and right edge.
//!
//! # Triangle Decomposition
//!
//! Any triangle is a flat-bottom half over a flat-top half, split at the
//! middle vertex's row:
//!
//! ```text
//!        v0                   v0
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>      /----\<- split at v1.y
//!     v1     \             v1   split
//!       \     \              \    \
//!         \    \               \   \
//!           \   \                \  \
//!             \  \                 \ \
//!               \ \                  \\
//!                 v2                  v2
//! ```
//!
//! # Fill conventions
//!
//! - [`FillConvention::Inclusive`] splits at the rounded intercept point and
//!   fills each flat half from the leftmost to the rightmost edge pixel on
//!   every row, both end rows included. Two triangles sharing an edge both
//!   fill it.
//! - [`FillConvention::TopLeft`] samples pixel centers `(x + 0.5, y + 0.5)`.
//!   Rows run over `[ceil(v0.y - 0.5), ceil(v2.y - 0.5))` and a row spans
//!   `[ceil(xl - 0.5), ceil(xr - 0.5))`, where `xl` and `xr` are the exact
//!   edge crossings at the row's center. The long edge `v0 -> v2` is walked
//!   once and the short edge switches at `v1.y` instead of splitting.
//!   Crossings are kept as an integer quotient and error term, so an edge
//!   shared by two triangles yields the same bound on both sides and one
//!   triangle starts exactly where the other stops.
//!
//! # References
//!
//! - Foley, van Dam et al., "Computer Graphics: Principles and Practice"
//! - Abrash, Michael, "Graphics Programming Black Book"

use super::classify::TriangleShape;
use super::{FillConvention, Rasterizer, SimpleTriangle};
use crate::render::line::BresenhamLine;
use crate::render::target::RenderTarget;

/// Leftmost and rightmost Bresenham x for every row an edge touches.
struct EdgeSpans {
    y_start: i32,
    rows: Vec<(i32, i32)>,
}

impl EdgeSpans {
    fn new(a: (i32, i32), b: (i32, i32)) -> Self {
        let y_start = a.1.min(b.1);
        let mut rows = vec![(i32::MAX, i32::MIN); (a.1 - b.1).unsigned_abs() as usize + 1];
        // Bresenham never skips a row, so every entry gets at least one point.
        for (x, y) in BresenhamLine::new(a.0, a.1, b.0, b.1) {
            let row = &mut rows[(y - y_start) as usize];
            row.0 = row.0.min(x);
            row.1 = row.1.max(x);
        }
        Self { y_start, rows }
    }

    #[inline]
    fn min_x(&self, y: i32) -> i32 {
        self.rows[(y - self.y_start) as usize].0
    }

    #[inline]
    fn max_x(&self, y: i32) -> i32 {
        self.rows[(y - self.y_start) as usize].1
    }

    fn y_end(&self) -> i32 {
        self.y_start + self.rows.len() as i32 - 1
    }
}

/// Exact per-row crossing of an edge, stepped with integer arithmetic.
///
/// `x` is the first pixel whose center lies on or right of the edge at the
/// current row's center: `ceil(x_edge(y + 0.5) - 0.5)`. The remainder is
/// carried as a Bresenham-style error term.
struct CenterEdge {
    x: i64,
    /// `x * den - numerator`, kept in `[0, den)`.
    error: i64,
    den: i64,
    x_step: i64,
    error_step: i64,
}

impl CenterEdge {
    /// Edge from `a` down to `b` (`a.y < b.y`), positioned on row `y`.
    fn new(a: (i32, i32), b: (i32, i32), y: i32) -> Self {
        let (ax, ay) = (a.0 as i64, a.1 as i64);
        let dx = b.0 as i64 - ax;
        let dy = b.1 as i64 - ay;
        let den = 2 * dy;
        let numerator = 2 * ax * dy + (2 * (y as i64 - ay) + 1) * dx - dy;
        let x = -(-numerator).div_euclid(den);
        Self {
            x,
            error: x * den - numerator,
            den,
            x_step: (2 * dx).div_euclid(den),
            error_step: (2 * dx).rem_euclid(den),
        }
    }

    #[inline]
    fn step(&mut self) {
        self.x += self.x_step;
        self.error -= self.error_step;
        if self.error < 0 {
            self.x += 1;
            self.error += self.den;
        }
    }
}

/// Scanline triangle rasterizer.
///
/// The rasterizer handles vertex sorting internally, so input triangles can
/// have vertices in any order and either winding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer {
    convention: FillConvention,
}

impl ScanlineRasterizer {
    pub fn new(convention: FillConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> FillConvention {
        self.convention
    }

    #[inline]
    fn span(target: &mut dyn RenderTarget, y: i32, x_start: i32, x_end: i32, color: u32) {
        let x_start = x_start.max(0);
        let x_end = x_end.min(target.width() as i32 - 1);
        if x_start <= x_end {
            target.fill_span(y, x_start, x_end, color);
        }
    }

    /// Fills a flat half bounded by two edges covering the same rows.
    fn fill_flat(
        e1: ((i32, i32), (i32, i32)),
        e2: ((i32, i32), (i32, i32)),
        target: &mut dyn RenderTarget,
        color: u32,
    ) {
        let a = EdgeSpans::new(e1.0, e1.1);
        let b = EdgeSpans::new(e2.0, e2.1);
        let y_start = a.y_start.max(0);
        let y_end = a.y_end().min(target.height() as i32 - 1);

        for y in y_start..=y_end {
            let x_start = a.min_x(y).min(b.min_x(y));
            let x_end = a.max_x(y).max(b.max_x(y));
            Self::span(target, y, x_start, x_end, color);
        }
    }

    fn fill_inclusive(
        sorted: &SimpleTriangle,
        shape: TriangleShape,
        target: &mut dyn RenderTarget,
        color: u32,
    ) {
        let [v0, v1, v2] = sorted.pixels();
        match shape {
            TriangleShape::FlatTop => Self::fill_flat((v0, v2), (v1, v2), target, color),
            TriangleShape::FlatBottom => Self::fill_flat((v0, v1), (v0, v2), target, color),
            TriangleShape::MajorLeft | TriangleShape::MajorRight => {
                let (upper, lower) = sorted.split();
                let [top, mid, split] = upper.pixels();
                Self::fill_flat((top, mid), (top, split), target, color);
                let [mid, split, bottom] = lower.pixels();
                Self::fill_flat((mid, bottom), (split, bottom), target, color);
            }
            // A zero-area triangle is its own boundary.
            TriangleShape::VerticalLine
            | TriangleShape::HorizontalLine
            | TriangleShape::Collinear => {
                target.draw_line(v0, v1, color);
                target.draw_line(v1, v2, color);
                target.draw_line(v2, v0, color);
            }
        }
    }

    fn fill_top_left(
        sorted: &SimpleTriangle,
        shape: TriangleShape,
        target: &mut dyn RenderTarget,
        color: u32,
    ) {
        if shape.is_degenerate() {
            return;
        }
        let [v0, v1, v2] = sorted.pixels();
        let y_start = v0.1.max(0);
        let y_end = v2.1.min(target.height() as i32);
        if y_start >= y_end {
            return;
        }

        // Row centers never sit on a vertex row, so one short edge covers each row.
        let mut long = CenterEdge::new(v0, v2, y_start);
        let mut short = if y_start < v1.1 {
            CenterEdge::new(v0, v1, y_start)
        } else {
            CenterEdge::new(v1, v2, y_start)
        };
        let long_on_left = shape.long_edge_on_left();

        for y in y_start..y_end {
            if y == v1.1 {
                short = CenterEdge::new(v1, v2, y);
            }
            let (left, right) = if long_on_left {
                (&long, &short)
            } else {
                (&short, &long)
            };
            Self::span(target, y, left.x as i32, right.x as i32 - 1, color);
            long.step();
            short.step();
        }
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn fill_triangle(&self, triangle: &SimpleTriangle, target: &mut dyn RenderTarget, color: u32) {
        let Some(mut snapped) = triangle.snapped() else {
            log::trace!("scanline: triangle outside guard band dropped");
            return;
        };
        snapped.check_and_fix_winding();
        let sorted = snapped.sorted_by_y();
        let shape = sorted.classify();

        match self.convention {
            FillConvention::Inclusive => Self::fill_inclusive(&sorted, shape, target, color),
            FillConvention::TopLeft => Self::fill_top_left(&sorted, shape, target, color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::render::PixelRecorder;

    fn rasterize(
        convention: FillConvention,
        triangles: &[SimpleTriangle],
        size: u32,
    ) -> PixelRecorder {
        let rasterizer = ScanlineRasterizer::new(convention);
        let mut rec = PixelRecorder::new(size, size);
        for t in triangles {
            rasterizer.fill_triangle(t, &mut rec, 0xFF00FF00);
        }
        rec
    }

    fn flat_top() -> SimpleTriangle {
        SimpleTriangle::from_xy((50, 100), (150, 100), (100, 150))
    }

    fn square_halves() -> [SimpleTriangle; 2] {
        [
            SimpleTriangle::from_xy((0, 0), (10, 0), (10, 10)),
            SimpleTriangle::from_xy((0, 0), (10, 10), (0, 10)),
        ]
    }

    fn fan() -> [SimpleTriangle; 4] {
        [
            SimpleTriangle::from_xy((0, 0), (20, 0), (10, 10)),
            SimpleTriangle::from_xy((20, 0), (20, 20), (10, 10)),
            SimpleTriangle::from_xy((20, 20), (0, 20), (10, 10)),
            SimpleTriangle::from_xy((0, 20), (0, 0), (10, 10)),
        ]
    }

    #[test]
    fn flat_top_spans_narrow_towards_the_apex() {
        let rec = rasterize(FillConvention::TopLeft, &[flat_top()], 256);

        assert_eq!(rec.row(99), Vec::<i32>::new());
        assert_eq!(rec.row(150), Vec::<i32>::new());
        let first = rec.row(100);
        assert_eq!(first.first(), Some(&50));
        assert_eq!(first.last(), Some(&148));

        let mut previous = usize::MAX;
        for y in 100..150 {
            let row = rec.row(y);
            assert_eq!(row.len(), (299 - 2 * y) as usize, "row {}", y);
            assert_eq!(row.first(), Some(&(y - 50)));
            assert!(row.len() < previous);
            previous = row.len();
        }
        // The apex scanline keeps a single pixel.
        assert_eq!(rec.row(149), vec![99]);
        assert_eq!(rec.distinct(), 2500);
        assert_eq!(rec.overdrawn(), 0);
    }

    #[test]
    fn inclusive_flat_top_fills_one_apex_pixel() {
        let rec = rasterize(FillConvention::Inclusive, &[flat_top()], 256);
        assert_eq!(rec.row(150), vec![100]);
        assert_eq!(rec.row(100).len(), 101);
        assert_eq!(rec.distinct(), 2601);
    }

    #[test]
    fn top_left_partitions_a_split_square() {
        let rec = rasterize(FillConvention::TopLeft, &square_halves(), 32);
        assert_eq!(rec.distinct(), 100);
        assert_eq!(rec.total(), 100);
        assert_eq!(rec.overdrawn(), 0);
    }

    #[test]
    fn top_left_partitions_a_fan() {
        let rec = rasterize(FillConvention::TopLeft, &fan(), 32);
        assert_eq!(rec.distinct(), 400);
        assert_eq!(rec.total(), 400);
        for y in 0..20 {
            assert_eq!(rec.row(y), (0..20).collect::<Vec<_>>());
        }
    }

    #[test]
    fn inclusive_overdraws_shared_edges() {
        let rec = rasterize(FillConvention::Inclusive, &square_halves(), 32);
        assert_eq!(rec.distinct(), 121);
        assert_eq!(rec.overdrawn(), 11);

        let rec = rasterize(FillConvention::Inclusive, &fan(), 32);
        assert_eq!(rec.distinct(), 441);
        assert!(rec.overdrawn() > 0);
    }

    #[test]
    fn shared_edges_are_filled_once() {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % 64) as i32
        };

        let rasterizer = ScanlineRasterizer::new(FillConvention::TopLeft);
        let mut pairs = 0;
        for _ in 0..300 {
            let a = (next(), next());
            let b = (next(), next());
            let c = (next(), next());
            let d = (next(), next());
            let t1 = SimpleTriangle::from_xy(a, b, c);
            let t2 = SimpleTriangle::from_xy(a, b, d);
            let (s1, s2) = (t1.signed_area2(), t2.signed_area2());
            if s1 == 0.0 || s2 == 0.0 || (s1 > 0.0) == (s2 > 0.0) {
                continue;
            }
            pairs += 1;

            let mut rec = PixelRecorder::new(64, 64);
            rasterizer.fill_triangle(&t1, &mut rec, 0);
            rasterizer.fill_triangle(&t2, &mut rec, 0);
            assert_eq!(rec.overdrawn(), 0, "{:?} {:?}", t1, t2);
        }
        assert!(pairs > 100);
    }

    #[test]
    fn thin_fan_triangles_do_not_cross() {
        // Thin slivers around (32, 32) where per-row Bresenham bounds would
        // let the left edge pass the right one.
        let c = (32, 32);
        let fan = [
            SimpleTriangle::from_xy(c, (40, 22), (56, 36)),
            SimpleTriangle::from_xy(c, (56, 36), (42, 34)),
            SimpleTriangle::from_xy(c, (42, 34), (57, 47)),
        ];
        let rec = rasterize(FillConvention::TopLeft, &fan, 64);
        assert_eq!(rec.count(41, 34), 1);
        assert_eq!(rec.overdrawn(), 0);
        assert_eq!(rec.total(), 193);
    }

    #[test]
    fn winding_does_not_change_coverage() {
        let ccw = SimpleTriangle::from_xy((3, 2), (40, 11), (17, 35));
        let cw = SimpleTriangle::from_xy((3, 2), (17, 35), (40, 11));
        let a = rasterize(FillConvention::TopLeft, &[ccw], 64);
        let b = rasterize(FillConvention::TopLeft, &[cw], 64);
        let mut pa: Vec<_> = a.pixels().collect();
        let mut pb: Vec<_> = b.pixels().collect();
        pa.sort_unstable();
        pb.sort_unstable();
        assert_eq!(pa, pb);
        assert_eq!(pa.len(), 547);
    }

    #[test]
    fn degenerate_triangles() {
        let line = SimpleTriangle::from_xy((3, 0), (3, 9), (3, 4));
        assert_eq!(rasterize(FillConvention::TopLeft, &[line], 16).total(), 0);
        assert_eq!(rasterize(FillConvention::Inclusive, &[line], 16).distinct(), 10);

        let point = SimpleTriangle::from_xy((5, 5), (5, 5), (5, 5));
        assert_eq!(rasterize(FillConvention::TopLeft, &[point], 16).total(), 0);
    }

    #[test]
    fn clips_to_the_target() {
        let t = SimpleTriangle::from_xy((-20, -20), (30, -20), (-20, 30));
        assert_eq!(rasterize(FillConvention::TopLeft, &[t], 16).distinct(), 45);
        assert_eq!(rasterize(FillConvention::Inclusive, &[t], 16).distinct(), 66);

        let huge = SimpleTriangle::new([
            Vec3::new(-1.0e12, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ]);
        assert_eq!(rasterize(FillConvention::TopLeft, &[huge], 16).total(), 0);
    }
}
