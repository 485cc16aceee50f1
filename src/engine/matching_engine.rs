// ============================================================================
// Matching Engine
// Routes orders to per-security books and records the resulting trades
// ============================================================================

use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use crossbeam_skiplist::map::Entry;
use crossbeam_skiplist::SkipMap;
use parking_lot::Mutex;

use crate::domain::{Order, OrderBookSnapshot, OrderOutcome, Orderbook, Trade};
use crate::interfaces::{EventHandler, OrderEvent, Settlement};
use crate::numeric::Timestamp;

/// Matching engine holding one order book per security.
///
/// Each book sits behind its own mutex, so submissions for one security are
/// serialized while different securities match in parallel. The ticker map
/// itself is a lock-free skip list.
pub struct MatchingEngine {
    /// Ticker -> order book
    books: SkipMap<String, Mutex<Orderbook>>,

    /// Every trade produced, in execution order
    trades: Mutex<Vec<Trade>>,

    /// Downstream ledger
    settlement: Arc<dyn Settlement>,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new(settlement: Arc<dyn Settlement>, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            books: SkipMap::new(),
            trades: Mutex::new(Vec::new()),
            settlement,
            event_handler,
        }
    }

    /// Creates the (empty) book for `ticker` if it does not exist yet.
    pub fn open_book(&self, ticker: &str) {
        self.book(ticker);
    }

    /// Submit an order to its security's book.
    ///
    /// Matches the order, rests any remainder, settles every trade and
    /// appends it to the trade log. Settlement failures are reported through
    /// the event handler; they never change what matched.
    ///
    /// # Panics
    /// Panics if the order has no remaining quantity.
    pub fn submit(&self, order: Order, time: Timestamp) -> Vec<Trade> {
        match self.submit_checked(order, time, |_, _| Ok::<(), Infallible>(())) {
            Ok(trades) => trades,
            Err(never) => match never {},
        }
    }

    /// Like [`submit`](Self::submit), but first runs `check` against the
    /// book while holding its lock. A failed check leaves the book, the
    /// ledger and the trade log untouched.
    pub fn submit_checked<E>(
        &self,
        order: Order,
        time: Timestamp,
        check: impl FnOnce(&Orderbook, &Order) -> Result<(), E>,
    ) -> Result<Vec<Trade>, E> {
        let entry = self.book(&order.security);
        let mut book = entry.value().lock();
        check(&book, &order)?;

        let outcome = book.submit(order, time);
        let mut events = Self::fill_events(&outcome);
        let (mut trades, _) = outcome.into_parts();

        for trade in &mut trades {
            match self.settlement.settle(trade) {
                Ok(()) if trade.is_settled() => events.push(OrderEvent::TradeSettled {
                    trade_id: trade.id,
                    buyer_fee: trade.buyer_fee(),
                    seller_fee: trade.seller_fee(),
                    timestamp: Utc::now(),
                }),
                Ok(()) => {}
                Err(err) => {
                    tracing::error!(trade = %trade.id, error = %err, "settlement failed");
                    events.push(OrderEvent::SettlementFailed {
                        trade_id: trade.id,
                        reason: err.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        // Appended before the book is released so the log keeps per-security
        // execution order.
        self.trades.lock().extend(trades.iter().cloned());
        drop(book);

        self.event_handler.on_events(events);
        Ok(trades)
    }

    /// Copy of the trade log
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().clone()
    }

    pub fn trade_count(&self) -> usize {
        self.trades.lock().len()
    }

    /// Read-only access to one book while holding its lock.
    pub fn with_book<R>(&self, ticker: &str, f: impl FnOnce(&Orderbook) -> R) -> Option<R> {
        let entry = self.books.get(ticker)?;
        let book = entry.value().lock();
        Some(f(&book))
    }

    /// Get order book snapshot
    pub fn snapshot(&self, ticker: &str, depth: usize) -> Option<OrderBookSnapshot> {
        self.with_book(ticker, |book| book.snapshot(depth))
    }

    /// Tickers with a book, in ticker order
    pub fn tickers(&self) -> Vec<String> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn book(&self, ticker: &str) -> Entry<'_, String, Mutex<Orderbook>> {
        match self.books.get(ticker) {
            Some(entry) => entry,
            None => self
                .books
                .get_or_insert(ticker.to_string(), Mutex::new(Orderbook::new(ticker))),
        }
    }

    fn fill_events(outcome: &OrderOutcome) -> Vec<OrderEvent> {
        let mut events: Vec<OrderEvent> = outcome
            .trades
            .iter()
            .map(|trade| OrderEvent::OrderMatched {
                trade: trade.clone(),
                timestamp: Utc::now(),
            })
            .collect();

        let order = &outcome.remainder;
        if order.is_filled() {
            events.push(OrderEvent::OrderFilled {
                order_id: order.id,
                total_filled: order.filled(),
                timestamp: Utc::now(),
            });
            return events;
        }

        if order.filled() > 0 {
            events.push(OrderEvent::OrderPartiallyFilled {
                order_id: order.id,
                filled_quantity: order.filled(),
                remaining_quantity: order.remaining(),
                timestamp: Utc::now(),
            });
        }
        events.push(OrderEvent::OrderAddedToBook {
            order_id: order.id,
            price: order.price,
            quantity: order.remaining(),
            timestamp: Utc::now(),
        });
        events
    }
}
