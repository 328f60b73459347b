//! Vertices and pipeline triangles.
//!
//! A [`Triangle`] is built once per mesh face in model space. Each
//! `Engine::enqueue` call clones it, carries the clone through view space,
//! shading and projection, and parks it in the draw queue until the frame is
//! drawn.

use std::fmt;
use std::str::FromStr;

use crate::colors::Color;
use crate::error::EngineError;
use crate::math::{Vec2, Vec3};
use crate::render::SimpleTriangle;

/// How a queued triangle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Filled only.
    #[default]
    Solid,
    /// The three edges only.
    Wireframe,
    /// Filled, then outlined in black.
    Mixed,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Solid => write!(f, "Solid"),
            RenderMode::Wireframe => write!(f, "Wireframe"),
            RenderMode::Mixed => write!(f, "Mixed"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solid" => Ok(RenderMode::Solid),
            "wireframe" => Ok(RenderMode::Wireframe),
            "mixed" => Ok(RenderMode::Mixed),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

/// Shading applied in the pipeline's shading stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// Full white, regardless of orientation.
    None,
    /// One grayscale Lambertian term per face.
    #[default]
    Flat,
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadingMode::None => write!(f, "None"),
            ShadingMode::Flat => write!(f, "Flat"),
        }
    }
}

impl FromStr for ShadingMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ShadingMode::None),
            "flat" => Ok(ShadingMode::Flat),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Color,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_attributes(position: Vec3, normal: Option<Vec3>, uv: Option<Vec2>) -> Self {
        Self {
            position,
            normal: normal.unwrap_or_default(),
            uv: uv.unwrap_or_default(),
            color: Color::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub cull: bool,
    pub render_mode: RenderMode,
    pub shading_mode: ShadingMode,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3]) -> Self {
        Self {
            vertices,
            cull: false,
            render_mode: RenderMode::default(),
            shading_mode: ShadingMode::default(),
        }
    }

    pub fn from_positions(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::new([Vertex::new(a), Vertex::new(b), Vertex::new(c)])
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.vertices.map(|v| v.position)
    }

    /// Un-normalized face normal: `(P1 - P0) x (P2 - P0)`.
    pub fn face_normal(&self) -> Vec3 {
        let [p0, p1, p2] = self.positions();
        (p1 - p0).cross(p2 - p0)
    }

    /// Device-space points for the rasterizers.
    pub fn to_simple(&self) -> SimpleTriangle {
        SimpleTriangle::new(self.positions())
    }

    /// Fill color: the color of the first vertex.
    pub fn fill_color(&self) -> u32 {
        self.vertices[0].color.to_argb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_normal_follows_winding() {
        let t = Triangle::from_positions(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(t.face_normal(), Vec3::IN);
    }

    #[test]
    fn parse_modes() {
        assert_eq!("MIXED".parse::<RenderMode>(), Ok(RenderMode::Mixed));
        assert_eq!("flat".parse::<ShadingMode>(), Ok(ShadingMode::Flat));
        assert!("gouraud".parse::<ShadingMode>().is_err());
    }
}
