//! Error type for functional data operations.

use thiserror::Error;

/// Errors raised by depth estimators, elastic metrics, and the functional
/// data container.
///
/// Negative warping derivatives and arccos arguments that drift marginally
/// outside [-1, 1] are floating-point artifacts, not errors; they are
/// corrected in place by the numerical guards in [`crate::helpers`] and never
/// surface through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FdaError {
    /// An operation restricted to scalar-valued functions received
    /// vector-valued input.
    #[error("scalar-valued functions required, got codomain dimension {0}")]
    VectorValued(usize),

    /// An operation restricted to functions over a one-dimensional domain
    /// received a higher-dimensional domain.
    #[error("one-dimensional domain required, got {0} domain dimensions")]
    NonUnivariateDomain(usize),

    /// A domain interval has zero or negative length.
    #[error("degenerate domain interval [{lo}, {hi}]")]
    DegenerateDomain { lo: f64, hi: f64 },

    /// Grid points are not strictly increasing, or lie outside the domain.
    #[error("invalid grid on domain axis {axis}")]
    InvalidGrid { axis: usize },

    /// Two operands disagree on grid size.
    #[error("grid size mismatch: {left} vs {right} points")]
    GridSizeMismatch { left: usize, right: usize },

    /// Two operands disagree on sample count.
    #[error("sample count mismatch: {left} vs {right} samples")]
    SampleCountMismatch { left: usize, right: usize },

    /// The value buffer length does not match the declared shape.
    #[error("value buffer has length {got}, expected {expected}")]
    ValueLength { expected: usize, got: usize },

    /// Too few reference samples for the requested statistic.
    #[error("at least {required} reference samples required, got {got}")]
    InsufficientSample { required: usize, got: usize },

    /// A regularization penalty must be non-negative.
    #[error("penalty must be non-negative, got {0}")]
    NegativePenalty(f64),

    /// `predict` was called before `fit`.
    #[error("estimator has not been fitted")]
    NotFitted,
}
