//! Projection and model-view matrix stacks.
//!
//! Two independent LIFO stacks plus a working ("current") matrix for each.
//! [`MatrixStack::set_matrix_mode`] selects which pair subsequent
//! push/pop/load/multiply calls target.
//!
//! Each stack holds between 1 and [`MATRIX_STACK_LIMIT`] entries. The base
//! entry is never popped. Overflow and underflow are reported as errors and
//! leave everything untouched.

use std::fmt;
use std::str::FromStr;

use crate::error::{Checked, EngineError};
use crate::math::Matrix;
use crate::projection::{Projection, ProjectionMode};

/// Maximum depth of either stack.
pub const MATRIX_STACK_LIMIT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMode {
    Projection,
    #[default]
    ModelView,
}

impl fmt::Display for MatrixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixMode::Projection => write!(f, "Projection"),
            MatrixMode::ModelView => write!(f, "ModelView"),
        }
    }
}

impl FromStr for MatrixMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "projection" => Ok(MatrixMode::Projection),
            "modelview" | "model-view" => Ok(MatrixMode::ModelView),
            _ => Err(EngineError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatrixStack {
    mode: MatrixMode,
    projection: Matrix,
    projection_mode: ProjectionMode,
    model_view: Matrix,
    projection_stack: Vec<(Matrix, ProjectionMode)>,
    model_view_stack: Vec<Matrix>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    /// Both stacks start with one identity entry; the projection entry is
    /// tagged orthographic.
    pub fn new() -> Self {
        Self {
            mode: MatrixMode::default(),
            projection: Matrix::identity(4),
            projection_mode: ProjectionMode::Orthographic,
            model_view: Matrix::identity(4),
            projection_stack: vec![(Matrix::identity(4), ProjectionMode::Orthographic)],
            model_view_stack: vec![Matrix::identity(4)],
        }
    }

    pub fn matrix_mode(&self) -> MatrixMode {
        self.mode
    }

    pub fn set_matrix_mode(&mut self, mode: MatrixMode) {
        log::debug!("matrix mode -> {}", mode);
        self.mode = mode;
    }

    /// Number of entries on the stack for `mode`, base entry included.
    pub fn depth(&self, mode: MatrixMode) -> usize {
        match mode {
            MatrixMode::Projection => self.projection_stack.len(),
            MatrixMode::ModelView => self.model_view_stack.len(),
        }
    }

    pub fn projection(&self) -> &Matrix {
        &self.projection
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projection_mode
    }

    pub fn model_view(&self) -> &Matrix {
        &self.model_view
    }

    /// Working matrix for the active mode.
    pub fn current(&self) -> &Matrix {
        match self.mode {
            MatrixMode::Projection => &self.projection,
            MatrixMode::ModelView => &self.model_view,
        }
    }

    fn current_mut(&mut self) -> &mut Matrix {
        match self.mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.model_view,
        }
    }

    /// Saves the working matrix (and, for projection, its mode tag).
    pub fn push_matrix(&mut self) -> Result<(), EngineError> {
        if self.depth(self.mode) >= MATRIX_STACK_LIMIT {
            return Err(EngineError::StackOverflow);
        }
        match self.mode {
            MatrixMode::Projection => self
                .projection_stack
                .push((self.projection.clone(), self.projection_mode)),
            MatrixMode::ModelView => self.model_view_stack.push(self.model_view.clone()),
        }
        Ok(())
    }

    /// Restores the most recently pushed matrix into the working slot.
    pub fn pop_matrix(&mut self) -> Result<(), EngineError> {
        if self.depth(self.mode) <= 1 {
            return Err(EngineError::StackUnderflow);
        }
        match self.mode {
            MatrixMode::Projection => {
                if let Some((matrix, mode)) = self.projection_stack.pop() {
                    self.projection = matrix;
                    self.projection_mode = mode;
                }
            }
            MatrixMode::ModelView => {
                if let Some(matrix) = self.model_view_stack.pop() {
                    self.model_view = matrix;
                }
            }
        }
        Ok(())
    }

    pub fn load_identity(&mut self) {
        *self.current_mut() = Matrix::identity(4);
    }

    /// Replaces the working matrix. Only 4x4 matrices are accepted.
    pub fn load_matrix(&mut self, matrix: Matrix) -> Result<(), EngineError> {
        if matrix.rows() != 4 || matrix.cols() != 4 {
            return Err(EngineError::MatrixDimensions {
                lhs_rows: matrix.rows(),
                lhs_cols: matrix.cols(),
                rhs_rows: 4,
                rhs_cols: 4,
            });
        }
        *self.current_mut() = matrix;
        Ok(())
    }

    /// `current = matrix * current`, so `matrix` applies to vertices first.
    pub fn mult_matrix(&mut self, matrix: &Matrix) -> Result<(), EngineError> {
        let product = matrix.multiply(self.current()).into_result()?;
        if product.rows() != 4 || product.cols() != 4 {
            return Err(EngineError::MatrixDimensions {
                lhs_rows: product.rows(),
                lhs_cols: product.cols(),
                rhs_rows: 4,
                rhs_cols: 4,
            });
        }
        *self.current_mut() = product;
        Ok(())
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        *self.current_mut() = &Matrix::translation(x, y, z) * self.current();
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        *self.current_mut() = &Matrix::scaling(x, y, z) * self.current();
    }

    /// Rotation about X, angle in degrees.
    pub fn rotate_x(&mut self, degrees: f64) {
        *self.current_mut() = &Matrix::rotation_x(degrees.to_radians()) * self.current();
    }

    /// Rotation about Y, angle in degrees.
    pub fn rotate_y(&mut self, degrees: f64) {
        *self.current_mut() = &Matrix::rotation_y(degrees.to_radians()) * self.current();
    }

    /// Rotation about Z, angle in degrees.
    pub fn rotate_z(&mut self, degrees: f64) {
        *self.current_mut() = &Matrix::rotation_z(degrees.to_radians()) * self.current();
    }

    /// Loads a projection model into the projection working matrix.
    ///
    /// Independent of the active matrix mode. A degenerate parameter set
    /// still loads the degraded matrix, so the frame keeps drawing.
    pub fn set_projection(&mut self, mode: ProjectionMode, params: &Projection) -> Checked<()> {
        log::debug!("projection -> {} {:?}", mode, params);
        let (matrix, error) = params.matrix(mode).into_parts();
        self.projection = matrix;
        self.projection_mode = mode;
        match error {
            Some(err) => Checked::degraded((), err),
            None => Checked::ok(()),
        }
    }

    pub fn set_orthographic(
        &mut self,
        l: f64,
        r: f64,
        t: f64,
        b: f64,
        n: f64,
        f: f64,
    ) -> Checked<()> {
        let (matrix, error) = Matrix::orthographic(l, r, t, b, n, f).into_parts();
        self.projection = matrix;
        self.projection_mode = ProjectionMode::Orthographic;
        match error {
            Some(err) => Checked::degraded((), err),
            None => Checked::ok(()),
        }
    }

    pub fn set_perspective(&mut self, fov: f64, aspect: f64, near: f64, far: f64) -> Checked<()> {
        self.set_projection(ProjectionMode::Perspective, &Projection::new(fov, aspect, near, far))
    }

    pub fn set_weak_perspective(&mut self) {
        self.projection = Matrix::weak_perspective();
        self.projection_mode = ProjectionMode::WeakPerspective;
    }
}
