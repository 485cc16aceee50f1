// ============================================================================
// Numeric Module
// Integer minor-unit arithmetic for prices, balances and fees
// ============================================================================
//
// This module provides:
// - Price: limit/execution price in cents (never negative)
// - Money: signed cent amount for balances, notionals and fees
// - Quantity / Timestamp aliases
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - No floating-point operations
// - Fallible arithmetic returns Result

mod errors;
mod money;

pub use errors::{NumericError, NumericResult};
pub use money::{Money, Price};

/// Share count. Orders always carry a strictly positive original quantity.
pub type Quantity = u64;

/// Submission / execution time. Only ever compared, never read as wall clock.
pub type Timestamp = u64;
