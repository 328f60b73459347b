//! Projection models and their parameters.
//!
//! [`Projection`] is the single source of truth for the perspective
//! parameters (FOV, aspect ratio, near/far planes). [`ProjectionMode`] tags
//! which model the current projection matrix implements; the pipeline uses
//! the tag to pick the shading/culling reference vector.

use std::fmt;
use std::str::FromStr;

use crate::error::{Checked, EngineError};
use crate::math::Matrix;

/// Which projection model the projection matrix implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Parallel projection. Shading and culling use the fixed `Vec3::IN`
    /// reference direction.
    #[default]
    Orthographic,
    /// Divide x and y by z, no FOV or aspect scaling.
    WeakPerspective,
    /// Full perspective with the homogeneous divide.
    Perspective,
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Orthographic => write!(f, "Orthographic"),
            ProjectionMode::WeakPerspective => write!(f, "WeakPerspective"),
            ProjectionMode::Perspective => write!(f, "Perspective"),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orthographic" | "ortho" => Ok(ProjectionMode::Orthographic),
            "weak-perspective" | "weakperspective" | "weak" => Ok(ProjectionMode::WeakPerspective),
            "perspective" => Ok(ProjectionMode::Perspective),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    fov: f64,
    /// Aspect ratio (width / height).
    aspect_ratio: f64,
    /// Near plane distance.
    z_near: f64,
    /// Far plane distance.
    z_far: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(60.0, 1.0, 0.1, 100.0)
    }
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `fov` - Vertical field of view in degrees
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near plane distance
    /// * `z_far` - Far plane distance (must differ from `z_near`)
    pub fn new(fov: f64, aspect_ratio: f64, z_near: f64, z_far: f64) -> Self {
        Self {
            fov,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Returns the vertical field of view in degrees.
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Returns the horizontal field of view in degrees.
    pub fn fov_x(&self) -> f64 {
        let half = (self.fov.to_radians() / 2.0).tan();
        (2.0 * (self.aspect_ratio * half).atan()).to_degrees()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f64 {
        self.z_near
    }

    pub fn z_far(&self) -> f64 {
        self.z_far
    }

    pub fn set_fov(&mut self, fov: f64) {
        self.fov = fov;
    }

    /// Updates the aspect ratio (typically called on window resize).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn set_planes(&mut self, z_near: f64, z_far: f64) {
        self.z_near = z_near;
        self.z_far = z_far;
    }

    /// Builds the projection matrix for `mode`.
    ///
    /// The orthographic model maps the NDC box itself (`[-1, 1]` on x and y,
    /// `[near, far]` on z), so it only reorganizes depth.
    pub fn matrix(&self, mode: ProjectionMode) -> Checked<Matrix> {
        match mode {
            ProjectionMode::Orthographic => {
                Matrix::orthographic(-1.0, 1.0, 1.0, -1.0, self.z_near, self.z_far)
            }
            ProjectionMode::WeakPerspective => Checked::ok(Matrix::weak_perspective()),
            ProjectionMode::Perspective => {
                Matrix::perspective(self.fov, self.aspect_ratio, self.z_near, self.z_far)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fov_x_matches_aspect_ratio() {
        // With aspect ratio 1:1, fov_x should equal fov
        let proj = Projection::new(45.0, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.fov_x(), proj.fov(), epsilon = 1e-9);
    }

    #[test]
    fn fov_x_wider_with_higher_aspect() {
        let proj = Projection::new(45.0, 16.0 / 9.0, 0.1, 100.0);
        assert!(proj.fov_x() > proj.fov());
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!(
            "Perspective".parse::<ProjectionMode>(),
            Ok(ProjectionMode::Perspective)
        );
        assert_eq!("ortho".parse::<ProjectionMode>(), Ok(ProjectionMode::Orthographic));
        assert_eq!(
            "fisheye".parse::<ProjectionMode>(),
            Err(EngineError::InvalidMode("fisheye".to_string()))
        );
    }

    #[test]
    fn matrix_per_mode() {
        let proj = Projection::default();
        assert_eq!(
            proj.matrix(ProjectionMode::WeakPerspective).into_result(),
            Ok(Matrix::weak_perspective())
        );
        let persp = proj.matrix(ProjectionMode::Perspective).into_result().unwrap();
        assert_eq!(persp.get(2, 3), 1.0);
        let ortho = proj.matrix(ProjectionMode::Orthographic).into_result().unwrap();
        assert_relative_eq!(ortho.get(0, 0), 1.0);
    }
}
