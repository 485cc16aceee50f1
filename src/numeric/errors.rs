// ============================================================================
// Numeric Errors
// Error types for integer-cent arithmetic
// ============================================================================

use thiserror::Error;

/// Errors that can occur during price and money arithmetic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Result exceeded the representable maximum
    #[error("arithmetic overflow: result exceeded maximum value")]
    Overflow,
    /// Result below the representable minimum
    #[error("arithmetic underflow: result below minimum value")]
    Underflow,
    /// Input string or value is invalid
    #[error("invalid input: could not parse value")]
    InvalidInput,
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
