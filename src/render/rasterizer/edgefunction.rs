//! Edge function-based triangle rasterization.
//!
//! This module implements point-in-triangle rasterization using the edge
//! function algorithm, the foundation of modern GPU rasterization. Each
//! pixel in the bounding box is tested against three edge equations.
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! This is the 2D cross product (B - A) x (P - A). For a counter-clockwise
//! triangle (positive signed area) every interior point is positive on all
//! three edges.
//!
//! Vertices are snapped to the lattice first, so all arithmetic is exact
//! `i64` and the functions are stepped incrementally: one add per pixel.
//! The inclusive fill samples lattice points `(x, y)`; the top-left fill
//! samples pixel centers `(x + 0.5, y + 0.5)`, evaluated in a doubled
//! frame so the half stays integral.
//!
//! # Fill conventions
//!
//! - [`FillConvention::Inclusive`] accepts a pixel when the three values
//!   share a sign, zero included (`all >= 0 || all <= 0`). Either winding
//!   works, and pixels on a shared edge are filled by both triangles.
//! - [`FillConvention::TopLeft`] normalizes the winding, then accepts
//!   `w > 0`, or `w == 0` only on a top or left edge. With y pointing down a
//!   top edge is horizontal and runs towards +x, a left edge runs towards -y.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::{FillConvention, Rasterizer, SimpleTriangle};
use crate::render::target::RenderTarget;

type Point = (i64, i64);

/// Incrementally evaluated edge function.
#[derive(Clone, Copy)]
struct Edge {
    /// Value at the current row's first pixel.
    row: i64,
    step_x: i64,
    step_y: i64,
    /// 0 for top-left edges, -1 otherwise; folded into the `>= 0` test.
    bias: i64,
}

impl Edge {
    /// `a`, `b` and `origin` are in the sampling frame, where one pixel is
    /// `scale` units wide.
    fn new(a: Point, b: Point, origin: Point, scale: i64, convention: FillConvention) -> Self {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let top_left = (dy == 0 && dx > 0) || dy < 0;
        let bias = match convention {
            FillConvention::TopLeft if !top_left => -1,
            _ => 0,
        };
        Self {
            row: edge_function(a, b, origin),
            step_x: -dy * scale,
            step_y: dx * scale,
            bias,
        }
    }
}

#[inline]
fn edge_function(a: Point, b: Point, p: Point) -> i64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Triangle rasterizer using the edge function algorithm.
///
/// The bounding box approach tests many pixels outside the triangle,
/// especially for thin or elongated triangles. Every pixel is decided
/// independently, which is what makes the approach attractive for parallel
/// hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFunctionRasterizer {
    convention: FillConvention,
}

impl EdgeFunctionRasterizer {
    pub fn new(convention: FillConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> FillConvention {
        self.convention
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle(&self, triangle: &SimpleTriangle, target: &mut dyn RenderTarget, color: u32) {
        let Some(mut snapped) = triangle.snapped() else {
            log::trace!("edge function: triangle outside guard band dropped");
            return;
        };
        if self.convention == FillConvention::TopLeft {
            snapped.check_and_fix_winding();
            if snapped.signed_area2() == 0.0 {
                return;
            }
        }

        // Top-left samples pixel centers in a doubled frame, inclusive samples
        // the lattice points themselves.
        let (scale, offset) = match self.convention {
            FillConvention::TopLeft => (2, 1),
            FillConvention::Inclusive => (1, 0),
        };
        let [v0, v1, v2] = snapped.pixels().map(|(x, y)| (x as i64, y as i64));

        // ─────────────────────────────────────────────────────────────────────
        // Step 1: Compute bounding box, clipped to the target
        // ─────────────────────────────────────────────────────────────────────
        let min_x = v0.0.min(v1.0).min(v2.0).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0) - offset).min(target.width() as i64 - 1);
        let min_y = v0.1.min(v1.1).min(v2.1).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1) - offset).min(target.height() as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        // ─────────────────────────────────────────────────────────────────────
        // Step 2: Set up the three edges at the box's top-left corner
        // ─────────────────────────────────────────────────────────────────────
        let frame = |(x, y): Point| (x * scale, y * scale);
        let [v0, v1, v2] = [v0, v1, v2].map(frame);
        let origin = (min_x * scale + offset, min_y * scale + offset);
        let mut edges = [
            Edge::new(v1, v2, origin, scale, self.convention),
            Edge::new(v2, v0, origin, scale, self.convention),
            Edge::new(v0, v1, origin, scale, self.convention),
        ];

        // ─────────────────────────────────────────────────────────────────────
        // Step 3: Iterate over all pixels in bounding box
        // ─────────────────────────────────────────────────────────────────────
        for y in min_y..=max_y {
            let mut w = edges.map(|e| e.row);
            for x in min_x..=max_x {
                let inside = match self.convention {
                    FillConvention::Inclusive => {
                        w.iter().all(|&v| v >= 0) || w.iter().all(|&v| v <= 0)
                    }
                    FillConvention::TopLeft => {
                        w.iter().zip(&edges).all(|(&v, e)| v + e.bias >= 0)
                    }
                };
                if inside {
                    target.fill_pixel(x as i32, y as i32, color);
                }
                for (v, e) in w.iter_mut().zip(&edges) {
                    *v += e.step_x;
                }
            }
            for e in &mut edges {
                e.row += e.step_y;
            }
        }
    }
}
