// ============================================================================
// Order Book Domain Model
// ============================================================================

use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::numeric::{Money, Price, Quantity, Timestamp};

use super::{Order, OrderOutcome, Side, TraderId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Book Level
// ============================================================================

/// Aggregated view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub order_count: usize,
}

// ============================================================================
// Order Book Side
// ============================================================================

/// One side (bids or asks) of one security's book.
///
/// Resting orders are kept in a price-level map of FIFO queues. Within a
/// level, orders are sorted by submission time; orders with equal times keep
/// their arrival order. Which end of the map is "best" is decided by the side
/// tag: highest price for bids, lowest for asks.
///
/// Every resting order has a remaining quantity greater than zero.
#[derive(Debug, Clone)]
pub struct OrderBookSide {
    side: Side,
    levels: BTreeMap<Price, VecDeque<Order>>,
    order_count: usize,
}

impl OrderBookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    /// Side of the orders this book side holds.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert an order at its price-time priority position.
    ///
    /// Returns `false` and leaves the side untouched when the order has no
    /// remaining quantity.
    ///
    /// # Panics
    /// Panics if the order belongs to the other side.
    pub fn add_order(&mut self, order: Order) -> bool {
        assert_eq!(
            order.side, self.side,
            "{} order deposited on the {} side",
            order.side, self.side
        );
        if order.is_filled() {
            return false;
        }

        let level = self.levels.entry(order.price).or_default();
        let position = level.partition_point(|resting| resting.time <= order.time);
        level.insert(position, order);
        self.order_count += 1;
        true
    }

    /// Get the best (top-of-book) price
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.keys().next_back().copied(),
            Side::Ask => self.levels.keys().next().copied(),
        }
    }

    /// Highest-priority resting order
    pub fn best(&self) -> Option<&Order> {
        let level = match self.side {
            Side::Bid => self.levels.values().next_back(),
            Side::Ask => self.levels.values().next(),
        };
        level.and_then(VecDeque::front)
    }

    /// Resting orders in priority order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Order> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.values().rev().flatten()),
            Side::Ask => Box::new(self.levels.values().flatten()),
        }
    }

    /// Aggregated quantities of the best `num_levels` price levels.
    pub fn depth(&self, num_levels: usize) -> Vec<OrderBookLevel> {
        let iter: Box<dyn Iterator<Item = (&Price, &VecDeque<Order>)>> = match self.side {
            Side::Bid => Box::new(self.levels.iter().rev()),
            Side::Ask => Box::new(self.levels.iter()),
        };

        iter.take(num_levels)
            .map(|(price, orders)| OrderBookLevel {
                price: *price,
                quantity: orders.iter().map(Order::remaining).sum(),
                order_count: orders.len(),
            })
            .collect()
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.order_count
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.iter().map(Order::remaining).sum()
    }

    /// Remaining quantity resting for one trader.
    pub fn quantity_for(&self, trader: TraderId) -> Quantity {
        self.iter()
            .filter(|order| order.trader == trader)
            .map(Order::remaining)
            .sum()
    }

    /// Mutable access to the FIFO queue at the best price, for matching.
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut VecDeque<Order>)> {
        let entry = match self.side {
            Side::Bid => self.levels.iter_mut().next_back(),
            Side::Ask => self.levels.iter_mut().next(),
        };
        entry.map(|(price, orders)| (*price, orders))
    }

    /// Drops a price level that matching has emptied.
    pub(crate) fn remove_empty_level(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(VecDeque::is_empty) {
            self.levels.remove(&price);
        }
    }

    pub(crate) fn note_removed(&mut self) {
        self.order_count -= 1;
    }
}

// ============================================================================
// Order Book
// ============================================================================

/// Bid and ask sides of one security.
///
/// The book is the only owner of its sides. Callers read them through shared
/// references and mutate them only through [`Orderbook::submit`].
#[derive(Debug, Clone)]
pub struct Orderbook {
    security: Arc<String>,
    bids: OrderBookSide,
    asks: OrderBookSide,
}

impl Orderbook {
    pub fn new(security: impl Into<String>) -> Self {
        Self {
            security: Arc::new(security.into()),
            bids: OrderBookSide::new(Side::Bid),
            asks: OrderBookSide::new(Side::Ask),
        }
    }

    pub fn security(&self) -> &str {
        &self.security
    }

    pub fn bids(&self) -> &OrderBookSide {
        &self.bids
    }

    pub fn asks(&self) -> &OrderBookSide {
        &self.asks
    }

    /// The side holding resting orders of `side`.
    pub fn side(&self, side: Side) -> &OrderBookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Match `order` against the opposite side, then rest any remainder on
    /// the order's own side.
    pub fn submit(&mut self, order: Order, time: Timestamp) -> OrderOutcome {
        debug_assert_eq!(
            order.security.as_str(),
            self.security.as_str(),
            "order routed to the wrong book"
        );

        let (opposite, own) = match order.side {
            Side::Bid => (&mut self.asks, &mut self.bids),
            Side::Ask => (&mut self.bids, &mut self.asks),
        };

        let outcome = opposite.match_order(order, time);
        if !outcome.remainder.is_filled() {
            tracing::debug!(
                security = %self.security,
                order_id = %outcome.remainder.id.as_uuid(),
                side = %outcome.remainder.side,
                price = %outcome.remainder.price,
                remaining = outcome.remainder.remaining(),
                "order resting in book"
            );
            own.add_order(outcome.remainder.clone());
        }
        outcome
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot::with_depth(
            (*self.security).clone(),
            self.bids.depth(depth),
            self.asks.depth(depth),
        )
    }
}

// ============================================================================
// Order Book Snapshot
// ============================================================================

/// Immutable snapshot of the order book state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub security: String,
    /// Bid levels, best first
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels, best first
    pub asks: Vec<OrderBookLevel>,
    /// Current spread (ask - bid)
    pub spread: Option<Money>,
    /// Mid price in currency units
    pub mid_price: Option<Decimal>,
}

impl OrderBookSnapshot {
    pub fn with_depth(
        security: String,
        bids: Vec<OrderBookLevel>,
        asks: Vec<OrderBookLevel>,
    ) -> Self {
        let (spread, mid_price) = match (bids.first(), asks.first()) {
            (Some(bid), Some(ask)) => {
                let bid = bid.price.cents() as i128;
                let ask = ask.price.cents() as i128;
                let spread = i64::try_from(ask - bid).ok().map(Money::from_cents);
                let mid = i64::try_from(ask + bid)
                    .ok()
                    .map(|sum| Decimal::new(sum, 2) / Decimal::from(2));
                (spread, mid)
            },
            _ => (None, None),
        };

        Self {
            security,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|level| level.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|level| level.price)
    }

    pub fn total_bid_quantity(&self) -> Quantity {
        self.bids.iter().map(|level| level.quantity).sum()
    }

    pub fn total_ask_quantity(&self) -> Quantity {
        self.asks.iter().map(|level| level.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(price: u64, qty: Quantity, time: Timestamp) -> Order {
        Order::bid(TraderId(1), "IBM", Price::from_cents(price), qty, time)
    }

    fn ask(price: u64, qty: Quantity, time: Timestamp) -> Order {
        Order::ask(TraderId(2), "IBM", Price::from_cents(price), qty, time)
    }

    #[test]
    fn test_bid_side_best_price() {
        let mut side = OrderBookSide::new(Side::Bid);

        side.add_order(bid(50_000, 1, 1));
        side.add_order(bid(50_100, 1, 2));
        side.add_order(bid(49_900, 1, 3));

        // Best bid should be highest price
        assert_eq!(side.best_price(), Some(Price::from_cents(50_100)));
        assert_eq!(side.len(), 3);
        assert_eq!(side.level_count(), 3);
    }

    #[test]
    fn test_quantity_for_one_trader() {
        let mut side = OrderBookSide::new(Side::Ask);
        side.add_order(ask(100, 4, 1));
        side.add_order(Order::ask(TraderId(7), "IBM", Price::from_cents(101), 3, 2));
        side.add_order(ask(102, 6, 3));

        assert_eq!(side.quantity_for(TraderId(2)), 10);
        assert_eq!(side.quantity_for(TraderId(7)), 3);
        assert_eq!(side.quantity_for(TraderId(9)), 0);
    }

    #[test]
    fn test_ask_side_iterates_in_priority_order() {
        let mut side = OrderBookSide::new(Side::Ask);

        side.add_order(ask(105, 1, 1));
        side.add_order(ask(100, 2, 3));
        side.add_order(ask(100, 3, 2));
        side.add_order(ask(110, 4, 0));

        let seen: Vec<(u64, Timestamp)> = side.iter().map(|o| (o.price.cents(), o.time)).collect();
        assert_eq!(seen, vec![(100, 2), (100, 3), (105, 1), (110, 0)]);
        assert_eq!(side.best().map(|o| o.time), Some(2));
        assert_eq!(side.total_quantity(), 10);
    }

    #[test]
    fn test_equal_times_keep_arrival_order() {
        let mut side = OrderBookSide::new(Side::Bid);
        let first = bid(100, 1, 5);
        let second = bid(100, 2, 5);
        let first_id = first.id;

        side.add_order(first);
        side.add_order(second);

        assert_eq!(side.best().map(|o| o.id), Some(first_id));
    }

    #[test]
    fn test_zero_quantity_order_not_inserted() {
        let mut side = OrderBookSide::new(Side::Bid);
        let mut spent = bid(100, 4, 1);
        spent.fill(4);

        assert!(!side.add_order(spent));
        assert!(side.is_empty());
        assert_eq!(side.level_count(), 0);
    }

    #[test]
    #[should_panic(expected = "deposited on the bid side")]
    fn test_wrong_side_deposit_panics() {
        let mut side = OrderBookSide::new(Side::Bid);
        side.add_order(ask(100, 1, 1));
    }

    #[test]
    fn test_depth_aggregates_levels() {
        let mut side = OrderBookSide::new(Side::Bid);
        side.add_order(bid(100, 1, 1));
        side.add_order(bid(100, 2, 2));
        side.add_order(bid(99, 5, 3));
        side.add_order(bid(98, 5, 4));

        let depth = side.depth(2);
        assert_eq!(
            depth,
            vec![
                OrderBookLevel {
                    price: Price::from_cents(100),
                    quantity: 3,
                    order_count: 2,
                },
                OrderBookLevel {
                    price: Price::from_cents(99),
                    quantity: 5,
                    order_count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_order_book_snapshot() {
        let level = |price, quantity| OrderBookLevel {
            price: Price::from_cents(price),
            quantity,
            order_count: 1,
        };
        let snapshot = OrderBookSnapshot::with_depth(
            "IBM".to_string(),
            vec![level(5_000, 1)],
            vec![level(5_101, 2)],
        );

        assert_eq!(snapshot.best_bid(), Some(Price::from_cents(5_000)));
        assert_eq!(snapshot.best_ask(), Some(Price::from_cents(5_101)));
        assert_eq!(snapshot.spread, Some(Money::from_cents(101)));
        assert_eq!(snapshot.mid_price, Some(Decimal::new(50_505, 3)));
    }

    #[test]
    fn test_one_sided_snapshot_has_no_spread() {
        let mut book = Orderbook::new("IBM");
        book.submit(bid(100, 10, 1), 1);

        let snapshot = book.snapshot(5);
        assert_eq!(snapshot.total_bid_quantity(), 10);
        assert_eq!(snapshot.total_ask_quantity(), 0);
        assert_eq!(snapshot.spread, None);
        assert_eq!(snapshot.mid_price, None);
    }
}
