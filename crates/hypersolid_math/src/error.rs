use thiserror::Error;

use crate::Float;

/// Result of a numeric kernel computation.
pub type MathResult<T> = Result<T, MathError>;

/// Error produced by the numeric kernel.
#[derive(Error, Debug, Copy, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MathError {
    /// The magnitude of the result exceeds the largest representable float.
    ///
    /// `ln_value` is the natural logarithm of the true result, which is
    /// still finite.
    #[error("numeric overflow: result is e^{ln_value:.3}, which exceeds the representable range")]
    NumericOverflow {
        /// Natural logarithm of the true result.
        ln_value: Float,
    },
    /// The argument is outside the domain of the function.
    #[error("{function}({x}) is undefined")]
    OutOfDomain {
        /// Name of the function.
        function: &'static str,
        /// Argument that was passed.
        x: Float,
    },
}
