//! 4D vector for homogeneous coordinates.

use std::ops::{Add, Mul, Sub};

use super::vec3::Vec3;
use crate::error::{Checked, EngineError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Vec4 {
    /// The origin as a point (w=1).
    fn default() -> Self {
        Self::point(0.0, 0.0, 0.0)
    }
}

impl Vec4 {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (w=1) from x, y, z coordinates.
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Create a Vec4 from a Vec3 with specified w component.
    pub const fn from_vec3(v: Vec3, w: f64) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Convert to Vec3, discarding w.
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Convert to Vec3 with the homogeneous divide.
    ///
    /// With `w == 0` the divide is skipped and the result is flagged.
    pub fn to_vec3_perspective(self) -> Checked<Vec3> {
        if self.w == 0.0 {
            return Checked::degraded(self.to_vec3(), EngineError::DivisionByZero);
        }
        Checked::ok(Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w))
    }

    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Scales all four components to unit length. A zero vector is returned
    /// unchanged and flagged with [`EngineError::DivisionByZero`].
    pub fn normalize(&self) -> Checked<Self> {
        let length = self.length();
        if length == 0.0 {
            return Checked::degraded(*self, EngineError::DivisionByZero);
        }
        Checked::ok(*self * (1.0 / length))
    }
}

impl Add<Vec4> for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Self::Output {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub<Vec4> for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Self::Output {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f64> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl From<Vec3> for Vec4 {
    /// Convert Vec3 to Vec4 as a point (w=1).
    fn from(v: Vec3) -> Self {
        Self::point(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_includes_w() {
        let n = Vec4::new(1.0, 1.0, 1.0, 1.0).normalize().into_result().unwrap();
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.w, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn normalize_zero_is_flagged() {
        let zero = Vec4::new(0.0, 0.0, 0.0, 0.0);
        let (v, err) = zero.normalize().into_parts();
        assert_eq!(v, zero);
        assert_eq!(err, Some(EngineError::DivisionByZero));
    }

    #[test]
    fn perspective_divide_by_zero_w_is_flagged() {
        let checked = Vec4::new(2.0, 4.0, 6.0, 0.0).to_vec3_perspective();
        assert!(!checked.is_ok());
        assert_eq!(*checked.value(), Vec3::new(2.0, 4.0, 6.0));
    }
}
