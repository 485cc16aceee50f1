// ============================================================================
// Trade Domain Model
// ============================================================================

use crate::error::SettlementError;
use crate::numeric::{Money, NumericResult, Price, Quantity, Timestamp};
use uuid::Uuid;

use super::{Order, OrderId, Side, TraderId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fees charged to both counterparties of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TradeFees {
    pub buyer: Money,
    pub seller: Money,
}

/// One execution between a resting order and an incoming order.
///
/// Everything but the fees is fixed at construction. Fees start at zero and
/// are written exactly once, by settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    /// Unique trade identifier
    pub id: Uuid,

    /// Ticker of the traded security
    pub security: String,

    pub buyer: TraderId,
    pub seller: TraderId,

    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    /// Side of the incoming order that initiated the match
    pub aggressor: Side,

    /// Executed quantity (always > 0)
    pub quantity: Quantity,

    /// Execution price: the resting order's limit price
    pub price: Price,

    pub time: Timestamp,

    fees: Option<TradeFees>,
}

impl Trade {
    /// Records a fill of `quantity` between `resting` and `incoming` at the
    /// resting order's price.
    pub fn execute(resting: &Order, incoming: &Order, quantity: Quantity, time: Timestamp) -> Self {
        debug_assert_ne!(resting.side, incoming.side, "crossing same-side orders");
        debug_assert!(quantity > 0, "zero-quantity trade");

        let (bid, ask) = match incoming.side {
            Side::Bid => (incoming, resting),
            Side::Ask => (resting, incoming),
        };

        Self {
            id: Uuid::new_v4(),
            security: (*resting.security).clone(),
            buyer: bid.trader,
            seller: ask.trader,
            buy_order_id: bid.id,
            sell_order_id: ask.id,
            aggressor: incoming.side,
            quantity,
            price: resting.price,
            time,
            fees: None,
        }
    }

    /// Notional value of the trade (price × quantity).
    ///
    /// Returns a Result because multiplication can overflow.
    pub fn value(&self) -> NumericResult<Money> {
        self.price.checked_notional(self.quantity)
    }

    /// Order id of the passive (resting) side.
    pub fn maker_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::Bid => self.sell_order_id,
            Side::Ask => self.buy_order_id,
        }
    }

    /// Order id of the aggressor.
    pub fn taker_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::Bid => self.buy_order_id,
            Side::Ask => self.sell_order_id,
        }
    }

    pub fn is_self_trade(&self) -> bool {
        self.buyer == self.seller
    }

    pub fn buyer_fee(&self) -> Money {
        self.fees.map(|f| f.buyer).unwrap_or(Money::ZERO)
    }

    pub fn seller_fee(&self) -> Money {
        self.fees.map(|f| f.seller).unwrap_or(Money::ZERO)
    }

    pub fn fees(&self) -> Option<TradeFees> {
        self.fees
    }

    pub fn is_settled(&self) -> bool {
        self.fees.is_some()
    }

    /// Sets both fees. Permitted once per trade.
    pub fn set_fees(&mut self, buyer: Money, seller: Money) -> Result<(), SettlementError> {
        if self.fees.is_some() {
            return Err(SettlementError::FeesAlreadySet { trade: self.id });
        }
        self.fees = Some(TradeFees { buyer, seller });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossing_pair() -> (Order, Order) {
        let resting = Order::ask(TraderId(1), "IBM", Price::from_cents(9_500), 5, 1);
        let incoming = Order::bid(TraderId(2), "IBM", Price::from_cents(10_000), 10, 2);
        (resting, incoming)
    }

    #[test]
    fn test_trade_execution_uses_resting_price() {
        let (resting, incoming) = crossing_pair();
        let trade = Trade::execute(&resting, &incoming, 5, 2);

        assert_eq!(trade.security, "IBM");
        assert_eq!(trade.price, Price::from_cents(9_500));
        assert_eq!(trade.buyer, TraderId(2));
        assert_eq!(trade.seller, TraderId(1));
        assert_eq!(trade.aggressor, Side::Bid);
        assert_eq!(trade.maker_order_id(), resting.id);
        assert_eq!(trade.taker_order_id(), incoming.id);
        assert_eq!(trade.value().unwrap(), Money::from_cents(47_500));
    }

    #[test]
    fn test_fees_set_once() {
        let (resting, incoming) = crossing_pair();
        let mut trade = Trade::execute(&resting, &incoming, 5, 2);

        assert!(!trade.is_settled());
        assert_eq!(trade.buyer_fee(), Money::ZERO);
        assert_eq!(trade.seller_fee(), Money::ZERO);

        trade
            .set_fees(Money::from_cents(120), Money::from_cents(95))
            .unwrap();
        assert_eq!(trade.buyer_fee(), Money::from_cents(120));
        assert_eq!(trade.seller_fee(), Money::from_cents(95));

        let err = trade.set_fees(Money::ZERO, Money::ZERO).unwrap_err();
        assert_eq!(err, SettlementError::FeesAlreadySet { trade: trade.id });
        assert_eq!(trade.buyer_fee(), Money::from_cents(120));
    }

    #[test]
    fn test_ask_aggressor_roles() {
        let resting = Order::bid(TraderId(7), "IBM", Price::from_cents(50), 3, 1);
        let incoming = Order::ask(TraderId(8), "IBM", Price::from_cents(50), 3, 2);
        let trade = Trade::execute(&resting, &incoming, 3, 2);

        assert_eq!(trade.buyer, TraderId(7));
        assert_eq!(trade.seller, TraderId(8));
        assert_eq!(trade.maker_order_id(), resting.id);
        assert!(!trade.is_self_trade());
    }
}
