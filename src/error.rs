//! Error taxonomy and the "degrade, don't crash" result types.
//!
//! Math and matrix-stack failures never abort a frame. Operations that can
//! still produce a usable (if wrong) value return a [`Checked`], which pairs
//! the degraded value with the failure that caused it. The [`Engine`] keeps
//! the most recent failure in its [`ErrorRegister`] so a harness can inspect
//! it after the frame.
//!
//! [`Engine`]: crate::engine::Engine

use thiserror::Error;

/// Every failure the core can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("matrix is not square ({rows}x{cols})")]
    MatrixNotSquare { rows: usize, cols: usize },
    #[error("matrix dimensions do not match ({lhs_rows}x{lhs_cols} by {rhs_rows}x{rhs_cols})")]
    MatrixDimensions {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
    #[error("matrix stack overflow")]
    StackOverflow,
    #[error("matrix stack underflow")]
    StackUnderflow,
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("failed to load model: {0}")]
    FailedToLoadModel(String),
    #[error("not initialized")]
    NotInitialized,
}

impl EngineError {
    /// Canonical upper-snake code for log lines and harness overlays.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::DivisionByZero => "DIVISION_BY_ZERO",
            EngineError::MatrixNotSquare { .. } => "MATRIX_NOT_SQUARE",
            EngineError::MatrixDimensions { .. } => "MATRIX_DIMENSIONS_ERROR",
            EngineError::StackOverflow => "STACK_OVERFLOW",
            EngineError::StackUnderflow => "STACK_UNDERFLOW",
            EngineError::InvalidMode(_) => "INVALID_MODE",
            EngineError::FailedToLoadModel(_) => "FAILED_TO_LOAD_MODEL",
            EngineError::NotInitialized => "NOT_INITIALIZED",
        }
    }
}

/// A value that is always usable, plus the failure (if any) that degraded it.
///
/// `Checked` is how the math layer keeps rendering going: a bad matrix still
/// yields a value (the unmodified operand, an un-divided point, ...) and the
/// caller decides whether to record, log, or escalate the failure.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Checked<T> {
    value: T,
    error: Option<EngineError>,
}

impl<T> Checked<T> {
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn degraded(value: T, error: EngineError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn error(&self) -> Option<&EngineError> {
        self.error.as_ref()
    }

    pub fn into_parts(self) -> (T, Option<EngineError>) {
        (self.value, self.error)
    }

    /// Strict view: the degraded value is dropped on failure.
    pub fn into_result(self) -> Result<T, EngineError> {
        match self.error {
            None => Ok(self.value),
            Some(err) => Err(err),
        }
    }

    /// Records the failure (if any) in `register` and returns the value.
    pub fn recover(self, register: &mut ErrorRegister) -> T {
        if let Some(err) = self.error {
            register.record(err);
        }
        self.value
    }

    /// Logs the failure (if any) and returns the value.
    pub fn logged(self) -> T {
        if let Some(err) = &self.error {
            log::warn!("{}: {}", err.code(), err);
        }
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Checked<U> {
        Checked {
            value: f(self.value),
            error: self.error,
        }
    }
}

/// Sticky last-error slot.
///
/// Each failure overwrites the previous one; nothing accumulates. The slot is
/// owned by a rendering context, so independent contexts never share it.
#[derive(Debug, Default, Clone)]
pub struct ErrorRegister {
    last: Option<EngineError>,
}

impl ErrorRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, error: EngineError) {
        log::warn!("{}: {}", error.code(), error);
        self.last = Some(error);
    }

    /// Records the error side of `result` and hands back its success side.
    pub fn check<T>(&mut self, result: Result<T, EngineError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    pub fn last(&self) -> Option<&EngineError> {
        self.last.as_ref()
    }

    /// Returns the last error and resets the slot.
    pub fn take(&mut self) -> Option<EngineError> {
        self.last.take()
    }

    /// `ErrorToString`-style text for the current slot.
    pub fn describe(&self) -> String {
        match &self.last {
            Some(err) => format!("{}: {}", err.code(), err),
            None => "NO_ERROR".to_string(),
        }
    }
}
