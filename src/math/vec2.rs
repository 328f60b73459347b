use std::ops::{Add, Mul, Sub};

use crate::error::{Checked, EngineError};

/// Texture coordinate or screen-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction; a zero vector comes back unchanged
    /// with [`EngineError::DivisionByZero`].
    pub fn normalize(&self) -> Checked<Self> {
        let length = self.length();
        if length == 0.0 {
            return Checked::degraded(*self, EngineError::DivisionByZero);
        }
        Checked::ok(*self * (1.0 / length))
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn perp_dot(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Self::Output {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_scales_to_unit_length() {
        let n = Vec2::new(-3.0, 4.0).normalize().into_result().unwrap();
        assert_relative_eq!(n.x, -0.6, epsilon = 1e-12);
        assert_relative_eq!(n.y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn normalize_zero_is_flagged() {
        let (v, err) = Vec2::ZERO.normalize().into_parts();
        assert_eq!(v, Vec2::ZERO);
        assert_eq!(err, Some(EngineError::DivisionByZero));
    }
}
