//! Dynamically sized row-major matrix.
//!
//! # Convention
//! - Storage is row-major: `m[row][col]`
//! - Vectors are **row vectors** on the left: `vertex * M`
//! - Translation is stored in the **last row**
//! - Transforms chain **left-to-right**: `v * A * B` applies A first, then B
//!
//! Dimension mismatches never panic. The checked operations hand back the
//! left operand (or the untouched vector) together with
//! [`EngineError::MatrixDimensions`]; the operators do the same and log it.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;
use super::vec4::Vec4;
use crate::error::{Checked, EngineError};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Default for Matrix {
    /// 4x4 identity.
    fn default() -> Self {
        Self::identity(4)
    }
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn from_rows<const R: usize, const C: usize>(rows: [[f64; C]; R]) -> Self {
        Self {
            rows: R,
            cols: C,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Resets a square matrix to identity. Non-square matrices are left alone.
    pub fn set_identity(&mut self) -> Result<(), EngineError> {
        if !self.is_square() {
            return Err(EngineError::MatrixNotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        *self = Self::identity(self.rows);
        Ok(())
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                t.set(col, row, self.get(row, col));
            }
        }
        t
    }

    fn dimensions_error(&self, rhs_rows: usize, rhs_cols: usize) -> EngineError {
        EngineError::MatrixDimensions {
            lhs_rows: self.rows,
            lhs_cols: self.cols,
            rhs_rows,
            rhs_cols,
        }
    }

    /// `self * rhs`. On a dimension mismatch the left operand comes back.
    pub fn multiply(&self, rhs: &Matrix) -> Checked<Matrix> {
        if self.cols != rhs.rows {
            return Checked::degraded(self.clone(), self.dimensions_error(rhs.rows, rhs.cols));
        }

        let mut result = Self::zeros(self.rows, rhs.cols);
        for row in 0..self.rows {
            for col in 0..rhs.cols {
                let sum = (0..self.cols)
                    .map(|k| self.get(row, k) * rhs.get(k, col))
                    .sum();
                result.set(row, col, sum);
            }
        }
        Checked::ok(result)
    }

    /// Transforms a point: `[x, y, z, 1] * M`, then divides by the resulting w.
    ///
    /// A 3x3 matrix is applied as a pure linear map with no divide. When the
    /// homogeneous w comes out as zero the divide is skipped and the
    /// un-normalized coordinates are returned with
    /// [`EngineError::DivisionByZero`].
    pub fn transform_point(&self, v: Vec3) -> Checked<Vec3> {
        match (self.rows, self.cols) {
            (3, 3) => Checked::ok(Vec3::new(
                v.x * self.get(0, 0) + v.y * self.get(1, 0) + v.z * self.get(2, 0),
                v.x * self.get(0, 1) + v.y * self.get(1, 1) + v.z * self.get(2, 1),
                v.x * self.get(0, 2) + v.y * self.get(1, 2) + v.z * self.get(2, 2),
            )),
            (4, 4) => self.transform_vec4(Vec4::from(v)).value().to_vec3_perspective(),
            _ => Checked::degraded(v, self.dimensions_error(1, 4)),
        }
    }

    /// Full 4x4 linear map of a homogeneous vector. No implicit divide.
    pub fn transform_vec4(&self, v: Vec4) -> Checked<Vec4> {
        if self.rows != 4 || self.cols != 4 {
            return Checked::degraded(v, self.dimensions_error(1, 4));
        }
        let column = |col: usize| {
            v.x * self.get(0, col)
                + v.y * self.get(1, col)
                + v.z * self.get(2, col)
                + v.w * self.get(3, col)
        };
        Checked::ok(Vec4::new(column(0), column(1), column(2), column(3)))
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last row (row-vector convention).
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis (radians).
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis (radians).
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis (radians).
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Orthographic projection of the box `[l, r] x [b, t] x [n, f]` onto
    /// the NDC cube.
    ///
    /// A zero-width axis is left as identity and the result carries
    /// [`EngineError::DivisionByZero`]; the other axes are still mapped.
    pub fn orthographic(l: f64, r: f64, t: f64, b: f64, n: f64, f: f64) -> Checked<Self> {
        let mut m = Self::identity(4);
        let mut error = None;

        for (axis, lo, hi) in [(0, l, r), (1, b, t), (2, n, f)] {
            let extent = hi - lo;
            if extent == 0.0 {
                error = Some(EngineError::DivisionByZero);
                continue;
            }
            m.set(axis, axis, 2.0 / extent);
            m.set(3, axis, -(hi + lo) / extent);
        }

        match error {
            Some(err) => Checked::degraded(m, err),
            None => Checked::ok(m),
        }
    }

    /// Perspective projection with the homogeneous divide routed through w.
    ///
    /// `fov` is the vertical field of view in degrees. With
    /// `f = 1 / tan(fov / 2)` and `q = far / (far - near)`:
    ///
    /// ```text
    /// x' = (f / aspect) * x      [0][0]
    /// y' = f * y                 [1][1]
    /// z' = q * z - near * q      [2][2], [3][2]
    /// w' = z                     [2][3] = 1, [3][3] = 0
    /// ```
    ///
    /// Degenerate parameters yield the identity with
    /// [`EngineError::DivisionByZero`].
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Checked<Self> {
        let tan_half = (fov.to_radians() / 2.0).tan();
        if tan_half == 0.0 || aspect == 0.0 || far == near {
            return Checked::degraded(Self::identity(4), EngineError::DivisionByZero);
        }

        let f = 1.0 / tan_half;
        let q = far / (far - near);
        let mut m = Self::zeros(4, 4);
        m.set(0, 0, f / aspect);
        m.set(1, 1, f);
        m.set(2, 2, q);
        m.set(3, 2, -near * q);
        m.set(2, 3, 1.0);
        Checked::ok(m)
    }

    /// Divides x and y by z, nothing else: identity with `[2][3] = 1`,
    /// `[3][3] = 0`.
    pub fn weak_perspective() -> Self {
        let mut m = Self::identity(4);
        m.set(2, 3, 1.0);
        m.set(3, 3, 0.0);
        m
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        self.multiply(rhs).logged()
    }
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        &self * &rhs
    }
}

/// Row vector times matrix, with the homogeneous divide.
impl Mul<&Matrix> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        rhs.transform_point(self).logged()
    }
}

/// Row vector times matrix, no divide.
impl Mul<&Matrix> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        rhs.transform_vec4(self).logged()
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(rows: usize, cols: usize) -> Matrix {
        let mut m = Matrix::zeros(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                m.set(r, c, (r * 7 + c * 3) as f64 - 4.5);
            }
        }
        m
    }

    #[test]
    fn default_is_4x4_identity() {
        assert_eq!(Matrix::default(), Matrix::identity(4));
    }

    #[test]
    fn identity_is_neutral_on_both_sides() {
        for (rows, cols) in [(4, 4), (3, 4), (2, 5), (4, 1)] {
            let m = sample(rows, cols);
            assert_eq!(&Matrix::identity(rows) * &m, m);
            assert_eq!(&m * &Matrix::identity(cols), m);
        }
    }

    #[test]
    fn mismatched_multiply_returns_left_operand() {
        let a = sample(3, 2);
        let b = sample(3, 3);
        let (value, err) = a.multiply(&b).into_parts();
        assert_eq!(value, a);
        assert_eq!(
            err,
            Some(EngineError::MatrixDimensions {
                lhs_rows: 3,
                lhs_cols: 2,
                rhs_rows: 3,
                rhs_cols: 3,
            })
        );
    }

    #[test]
    fn set_identity_requires_square() {
        let mut m = sample(2, 3);
        assert_eq!(
            m.set_identity(),
            Err(EngineError::MatrixNotSquare { rows: 2, cols: 3 })
        );
        assert_eq!(m, sample(2, 3));

        let mut sq = sample(3, 3);
        assert!(sq.set_identity().is_ok());
        assert_eq!(sq, Matrix::identity(3));
    }

    #[test]
    fn translation_moves_points() {
        let p = Vec3::new(1.0, 2.0, 3.0) * &Matrix::translation(1.0, -1.0, 5.0);
        assert_eq!(p, Vec3::new(2.0, 1.0, 8.0));
    }

    #[test]
    fn transforms_chain_left_to_right() {
        // Scale first, then translate.
        let m = Matrix::scaling(2.0, 2.0, 2.0) * Matrix::translation(1.0, 0.0, 0.0);
        let p = Vec3::new(1.0, 1.0, 1.0) * &m;
        assert_eq!(p, Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let p = Vec3::RIGHT * &Matrix::rotation_z(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn point_transform_skips_divide_when_w_is_zero() {
        // Weak perspective routes z into w; z = 0 leaves w = 0.
        let (p, err) = Matrix::weak_perspective()
            .transform_point(Vec3::new(2.0, 3.0, 0.0))
            .into_parts();
        assert_eq!(p, Vec3::new(2.0, 3.0, 0.0));
        assert_eq!(err, Some(EngineError::DivisionByZero));
    }

    #[test]
    fn weak_perspective_divides_by_z() {
        let p = Vec3::new(4.0, 6.0, 2.0) * &Matrix::weak_perspective();
        assert_eq!(p, Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn vec4_transform_has_no_implicit_divide() {
        let v = Vec4::new(4.0, 6.0, 2.0, 1.0) * &Matrix::weak_perspective();
        assert_eq!(v, Vec4::new(4.0, 6.0, 2.0, 2.0));
    }

    #[test]
    fn three_by_three_is_linear() {
        let m = Matrix::from_rows([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [1.0, 0.0, 1.0]]);
        let p = m.transform_point(Vec3::new(1.0, 1.0, 1.0)).into_result().unwrap();
        assert_eq!(p, Vec3::new(3.0, 3.0, 1.0));
    }

    #[test]
    fn vector_transform_needs_four_columns() {
        let m = sample(4, 3);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let (p, err) = m.transform_point(v).into_parts();
        assert_eq!(p, v);
        assert!(matches!(err, Some(EngineError::MatrixDimensions { .. })));
    }

    #[test]
    fn orthographic_of_ndc_box_is_identity() {
        let m = Matrix::orthographic(-1.0, 1.0, 1.0, -1.0, -1.0, 1.0)
            .into_result()
            .unwrap();
        assert_relative_eq!(m, Matrix::identity(4));
        let p = Vec3::new(0.25, -0.75, 0.5);
        let q = p * &m;
        assert_relative_eq!(q.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(q.y, p.y, epsilon = 1e-12);
        assert_relative_eq!(q.z, p.z, epsilon = 1e-12);
    }

    #[test]
    fn orthographic_maps_box_corners_to_ndc() {
        let m = Matrix::orthographic(0.0, 800.0, 600.0, 0.0, 0.0, 10.0)
            .into_result()
            .unwrap();
        let lo = Vec3::new(0.0, 0.0, 0.0) * &m;
        let hi = Vec3::new(800.0, 600.0, 10.0) * &m;
        assert_relative_eq!(lo.x, -1.0);
        assert_relative_eq!(lo.y, -1.0);
        assert_relative_eq!(lo.z, -1.0);
        assert_relative_eq!(hi.x, 1.0);
        assert_relative_eq!(hi.y, 1.0);
        assert_relative_eq!(hi.z, 1.0);
    }

    #[test]
    fn orthographic_degenerate_axis_stays_identity() {
        let (m, err) = Matrix::orthographic(-2.0, 2.0, 1.0, 1.0, -1.0, 1.0).into_parts();
        assert_eq!(err, Some(EngineError::DivisionByZero));
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(3, 1), 0.0);
        assert_relative_eq!(m.get(0, 0), 0.5);
    }

    #[test]
    fn perspective_cell_placement() {
        let m = Matrix::perspective(90.0, 2.0, 1.0, 11.0).into_result().unwrap();
        let f = 1.0 / (45f64.to_radians()).tan();
        let q = 11.0 / 10.0;
        assert_relative_eq!(m.get(0, 0), f / 2.0, epsilon = 1e-12);
        assert_relative_eq!(m.get(1, 1), f, epsilon = 1e-12);
        assert_relative_eq!(m.get(2, 2), q, epsilon = 1e-12);
        assert_relative_eq!(m.get(3, 2), -q, epsilon = 1e-12);
        assert_eq!(m.get(2, 3), 1.0);
        assert_eq!(m.get(3, 3), 0.0);
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let m = Matrix::perspective(60.0, 1.0, 0.1, 100.0).into_result().unwrap();
        let near = Vec3::new(0.0, 0.0, 0.1) * &m;
        let far = Vec3::new(0.0, 0.0, 100.0) * &m;
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn perspective_degenerate_planes() {
        let (m, err) = Matrix::perspective(60.0, 1.0, 5.0, 5.0).into_parts();
        assert_eq!(m, Matrix::identity(4));
        assert_eq!(err, Some(EngineError::DivisionByZero));
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let m = sample(2, 3);
        let t = m.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.get(2, 1), m.get(1, 2));
        assert_eq!(t.transpose(), m);
    }
}
