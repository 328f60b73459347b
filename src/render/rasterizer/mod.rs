//! Triangle rasterization algorithms.
//!
//! One [`Rasterizer`] abstraction, parameterized two ways:
//!
//! - the coverage strategy: [`ScanlineRasterizer`] (edges walked row by row,
//!   one span per row) or [`EdgeFunctionRasterizer`] (bounding box plus three
//!   edge functions per pixel);
//! - the [`FillConvention`] deciding who owns pixels on a shared edge.
//!
//! Both strategies snap vertices to the integer pixel lattice first. Under
//! [`FillConvention::TopLeft`] pixel `(x, y)` is sampled at its center
//! `(x + 0.5, y + 0.5)`, and the two strategies fill identical pixels. The
//! inclusive fill samples the lattice point `(x, y)` itself.

mod classify;
mod edgefunction;
mod scanline;

pub use classify::{TriangleShape, Winding};
pub use edgefunction::EdgeFunctionRasterizer;
pub use scanline::ScanlineRasterizer;

use std::fmt;
use std::str::FromStr;

use super::target::RenderTarget;
use crate::error::EngineError;
use crate::math::Vec3;

/// Snapped coordinates beyond this magnitude are rejected. Keeps bounding
/// boxes, span tables and `i64` edge products bounded.
pub const GUARD_BAND: f64 = (1 << 16) as f64;

/// A triangle ready for rasterization in device space.
///
/// Equality is exact and order-sensitive: `[a, b, c] != [b, c, a]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleTriangle {
    pub points: [Vec3; 3],
}

impl SimpleTriangle {
    pub fn new(points: [Vec3; 3]) -> Self {
        Self { points }
    }

    /// Convenience constructor from 2D integer points (z = 0).
    pub fn from_xy(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> Self {
        let p = |(x, y): (i32, i32)| Vec3::new(x as f64, y as f64, 0.0);
        Self::new([p(a), p(b), p(c)])
    }

    /// Rounds x and y to the pixel lattice.
    ///
    /// Returns `None` when any coordinate is non-finite or outside the guard
    /// band; such triangles come from a degraded projection and are dropped.
    pub fn snapped(&self) -> Option<SimpleTriangle> {
        let mut points = self.points;
        for p in &mut points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return None;
            }
            p.x = p.x.round();
            p.y = p.y.round();
            if p.x.abs() > GUARD_BAND || p.y.abs() > GUARD_BAND {
                return None;
            }
        }
        Some(SimpleTriangle::new(points))
    }

    /// Integer x/y of each point. Only meaningful after [`Self::snapped`].
    pub(crate) fn pixels(&self) -> [(i32, i32); 3] {
        self.points.map(|p| (p.x as i32, p.y as i32))
    }
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors define how triangles are filled into a render target. The
/// target is borrowed for the call only.
pub trait Rasterizer {
    /// Fill a triangle into the target with a single color.
    fn fill_triangle(&self, triangle: &SimpleTriangle, target: &mut dyn RenderTarget, color: u32);
}

/// Ownership rule for pixels on triangle edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillConvention {
    /// Every pixel inside or on the boundary. Two triangles sharing an edge
    /// both fill it, so shared edges are drawn twice.
    Inclusive,
    /// Pixels on top or left edges belong to the triangle, pixels on bottom
    /// or right edges do not. Shared edges are filled exactly once.
    #[default]
    TopLeft,
}

impl fmt::Display for FillConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillConvention::Inclusive => write!(f, "Inclusive"),
            FillConvention::TopLeft => write!(f, "TopLeft"),
        }
    }
}

impl FromStr for FillConvention {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inclusive" | "plain" => Ok(FillConvention::Inclusive),
            "topleft" | "top-left" => Ok(FillConvention::TopLeft),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

/// Available rasterization algorithms.
///
/// Use this enum to select which rasterizer the engine should use.
/// Can be changed at runtime via `Engine::set_rasterizer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerType {
    /// Edges walked row by row, one horizontal span per scanline.
    #[default]
    Scanline,
    /// Edge function test for each pixel in the bounding box.
    EdgeFunction,
}

impl fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterizerType::Scanline => write!(f, "Scanline"),
            RasterizerType::EdgeFunction => write!(f, "EdgeFunction"),
        }
    }
}

impl FromStr for RasterizerType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scanline" => Ok(RasterizerType::Scanline),
            "edgefunction" | "edge-function" | "pit" => Ok(RasterizerType::EdgeFunction),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

/// Holds both rasterizer implementations and forwards to the active one.
pub struct RasterizerDispatcher {
    scanline: ScanlineRasterizer,
    edge_function: EdgeFunctionRasterizer,
    active: RasterizerType,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType, convention: FillConvention) -> Self {
        Self {
            scanline: ScanlineRasterizer::new(convention),
            edge_function: EdgeFunctionRasterizer::new(convention),
            active: rasterizer_type,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }

    pub fn set_convention(&mut self, convention: FillConvention) {
        self.scanline = ScanlineRasterizer::new(convention);
        self.edge_function = EdgeFunctionRasterizer::new(convention);
    }

    pub fn convention(&self) -> FillConvention {
        self.scanline.convention()
    }
}

impl Default for RasterizerDispatcher {
    fn default() -> Self {
        Self::new(RasterizerType::default(), FillConvention::default())
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_triangle(&self, triangle: &SimpleTriangle, target: &mut dyn RenderTarget, color: u32) {
        match self.active {
            RasterizerType::Scanline => self.scanline.fill_triangle(triangle, target, color),
            RasterizerType::EdgeFunction => {
                self.edge_function.fill_triangle(triangle, target, color)
            }
        }
    }
}
