// ============================================================================
// Order Outcome
// ============================================================================

use crate::numeric::Quantity;

use super::{Order, Trade};

/// Result of matching one incoming order against one book side.
///
/// `trades` is in execution order and may be empty. `remainder` is the
/// incoming order itself (same id) with its remaining quantity updated; a
/// remaining quantity of zero means the order was fully filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub trades: Vec<Trade>,
    pub remainder: Order,
}

impl OrderOutcome {
    pub fn new(trades: Vec<Trade>, remainder: Order) -> Self {
        Self { trades, remainder }
    }

    /// Outcome of an order that met nothing it could cross.
    pub fn unmatched(order: Order) -> Self {
        Self::new(Vec::new(), order)
    }

    /// Sum of the quantities of all trades.
    pub fn filled_quantity(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    pub fn is_fully_filled(&self) -> bool {
        self.remainder.is_filled()
    }

    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Trade>, Order) {
        (self.trades, self.remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TraderId;
    use crate::numeric::Price;

    #[test]
    fn test_unmatched_outcome() {
        let order = Order::bid(TraderId(1), "IBM", Price::from_cents(100), 10, 1);
        let outcome = OrderOutcome::unmatched(order.clone());

        assert!(!outcome.has_trades());
        assert_eq!(outcome.filled_quantity(), 0);
        assert!(!outcome.is_fully_filled());
        assert_eq!(outcome.remainder, order);
    }
}
