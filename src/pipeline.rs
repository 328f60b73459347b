//! Per-triangle pipeline stages and the draw queue.
//!
//! [`crate::engine::Engine::enqueue`] runs the stages in a fixed order:
//!
//! ```text
//! model-view -> shade -> cull -> project -> viewport -> DrawQueue
//! ```
//!
//! Stage failures (a zero-length normal, `w == 0` in the divide) never stop
//! the triangle: the degraded value flows on and the failure lands in the
//! caller's [`ErrorRegister`].

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::colors::Color;
use crate::error::{EngineError, ErrorRegister};
use crate::math::{Matrix, Vec3};
use crate::projection::ProjectionMode;
use crate::triangle::{ShadingMode, Triangle};

/// Which faces the cull stage drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullFaceMode {
    None,
    /// Drop faces turned away from the camera.
    #[default]
    Back,
    /// Drop faces turned towards the camera.
    Front,
}

impl fmt::Display for CullFaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CullFaceMode::None => write!(f, "None"),
            CullFaceMode::Back => write!(f, "Back"),
            CullFaceMode::Front => write!(f, "Front"),
        }
    }
}

impl FromStr for CullFaceMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CullFaceMode::None),
            "back" => Ok(CullFaceMode::Back),
            "front" => Ok(CullFaceMode::Front),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

/// Moves every vertex position through `model_view`.
pub fn transform(triangle: &mut Triangle, model_view: &Matrix, errors: &mut ErrorRegister) {
    for vertex in &mut triangle.vertices {
        vertex.position = model_view.transform_point(vertex.position).recover(errors);
    }
}

/// Camera-to-face direction used by shading and culling.
///
/// The camera sits at the view-space origin looking down +z. Orthographic
/// projection has no eye point, so the fixed [`Vec3::IN`] direction stands
/// in for it.
pub fn view_vector(
    triangle: &Triangle,
    projection_mode: ProjectionMode,
    errors: &mut ErrorRegister,
) -> Vec3 {
    match projection_mode {
        ProjectionMode::Orthographic => Vec3::IN,
        ProjectionMode::WeakPerspective | ProjectionMode::Perspective => {
            triangle.vertices[0].position.normalize().recover(errors)
        }
    }
}

/// Unit face normal. A degenerate face keeps its zero normal.
pub fn face_normal(triangle: &Triangle, errors: &mut ErrorRegister) -> Vec3 {
    triangle.face_normal().normalize().recover(errors)
}

/// Grayscale Lambertian level for a face: `|view . normal| * 255`.
pub fn gray_level(view: Vec3, normal: Vec3, shading_mode: ShadingMode) -> u8 {
    match shading_mode {
        ShadingMode::None => 255,
        ShadingMode::Flat => (view.dot(normal).abs().min(1.0) * 255.0).round() as u8,
    }
}

/// Writes the face's gray level into all three vertex colors.
pub fn shade(triangle: &mut Triangle, view: Vec3, normal: Vec3) {
    let color = Color::gray(gray_level(view, normal, triangle.shading_mode));
    for vertex in &mut triangle.vertices {
        vertex.color = color;
    }
}

/// Whether the cull stage drops a face with this orientation.
pub fn should_cull(view: Vec3, normal: Vec3, mode: CullFaceMode) -> bool {
    let facing = view.dot(normal);
    match mode {
        CullFaceMode::None => false,
        CullFaceMode::Back => facing >= 0.0,
        CullFaceMode::Front => facing < 0.0,
    }
}

/// Projects every vertex; `Matrix x Vec3` performs the homogeneous divide.
pub fn project(triangle: &mut Triangle, projection: &Matrix, errors: &mut ErrorRegister) {
    for vertex in &mut triangle.vertices {
        vertex.position = projection.transform_point(vertex.position).recover(errors);
    }
}

/// Maps NDC `[-1, 1]` onto `[0, size]` for x and y. z keeps its NDC value.
pub fn to_viewport(triangle: &mut Triangle, width: u32, height: u32) {
    for vertex in &mut triangle.vertices {
        let p = vertex.position;
        vertex.position = Vec3::new(
            (p.x + 1.0) / 2.0 * width as f64,
            (p.y + 1.0) / 2.0 * height as f64,
            p.z,
        );
    }
}

/// FIFO of projected triangles, filled by `enqueue` and drained once per
/// frame.
#[derive(Debug, Default, Clone)]
pub struct DrawQueue {
    triangles: VecDeque<Triangle>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push_back(triangle);
    }

    pub fn pop(&mut self) -> Option<Triangle> {
        self.triangles.pop_front()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    /// Queued triangles, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }
}

/// Counters for the most recent frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Triangles handed to `enqueue`.
    pub submitted: usize,
    pub culled: usize,
    /// Triangles drained by the last `commence_draw`.
    pub drawn: usize,
    pub draw_time: Duration,
}
