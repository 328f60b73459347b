//! Object placement: position, Euler rotation and scale.

use crate::error::EngineError;
use crate::math::{Matrix, Vec3};
use crate::matrix_stack::MatrixStack;

/// Where a mesh sits in view space.
///
/// Rotation is in degrees, like [`MatrixStack::rotate_x`]. Mutators return
/// `&mut Self` for chaining:
///
/// ```ignore
/// cube.set_position(Vec3::new(0.0, 0.0, 5.0))
///     .rotate(Vec3::new(0.0, 90.0, 0.0))
///     .set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity rotation and scale, placed at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    /// Euler angles in degrees (pitch, yaw, roll).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: Vec3) -> &mut Self {
        self.rotation = wrap_degrees(degrees);
        self
    }

    /// Adds `delta` degrees per axis, wrapped into `[0, 360)`.
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = wrap_degrees(self.rotation + delta);
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: f64) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Model matrix for row vectors (`v * M`): scale, then rotate about x, y
    /// and z in that order, then translate.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::scaling(self.scale.x, self.scale.y, self.scale.z)
            * Matrix::rotation_x(self.rotation.x.to_radians())
            * Matrix::rotation_y(self.rotation.y.to_radians())
            * Matrix::rotation_z(self.rotation.z.to_radians())
            * Matrix::translation(self.position.x, self.position.y, self.position.z)
    }

    /// Multiplies the model matrix onto the stack's current matrix, so the
    /// transform applies before whatever the stack already holds.
    pub fn apply(&self, stack: &mut MatrixStack) -> Result<(), EngineError> {
        stack.mult_matrix(&self.to_matrix())
    }
}

fn wrap_degrees(v: Vec3) -> Vec3 {
    Vec3::new(v.x.rem_euclid(360.0), v.y.rem_euclid(360.0), v.z.rem_euclid(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
        assert_eq!(t.to_matrix(), Matrix::identity(4));
    }

    #[test]
    fn chained_setters() {
        let mut t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        t.translate(Vec3::new(2.0, 0.0, 0.0))
            .rotate(Vec3::new(0.0, 350.0, 0.0))
            .rotate(Vec3::new(0.0, 20.0, -30.0))
            .set_scale_uniform(2.0);

        assert_eq!(t.position(), Vec3::new(3.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(t.rotation().z, 330.0);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn scales_then_translates() {
        let mut t = Transform::at(Vec3::new(0.0, 0.0, 5.0));
        t.set_scale_uniform(2.0);
        let p = t.to_matrix().transform_point(Vec3::new(1.0, 1.0, 1.0)).into_result().unwrap();
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 7.0);
    }

    #[test]
    fn rotates_before_translating() {
        let mut t = Transform::at(Vec3::new(10.0, 0.0, 0.0));
        t.set_rotation(Vec3::new(0.0, 90.0, 0.0));
        let p = t.to_matrix().transform_point(Vec3::new(0.0, 0.0, 1.0)).into_result().unwrap();
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.x, 11.0);
    }

    #[test]
    fn apply_matches_the_stack_helpers() {
        let mut t = Transform::at(Vec3::new(0.0, 0.0, 5.0));
        t.set_rotation(Vec3::new(30.0, 45.0, 0.0));

        let mut by_transform = MatrixStack::new();
        t.apply(&mut by_transform).unwrap();

        let mut by_hand = MatrixStack::new();
        by_hand.translate(0.0, 0.0, 5.0);
        by_hand.rotate_y(45.0);
        by_hand.rotate_x(30.0);

        let p = Vec3::new(1.0, -2.0, 0.5);
        let a = by_transform.model_view().transform_point(p).into_result().unwrap();
        let b = by_hand.model_view().transform_point(p).into_result().unwrap();
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }
}
