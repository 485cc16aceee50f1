// ============================================================================
// Limit Order Book Library
// Continuous double auction with price-time priority matching
// ============================================================================

//! # LOB Engine
//!
//! A continuous double-auction exchange: buy and sell limit orders for listed
//! securities are matched under price-time priority, and whatever does not
//! match rests in the book.
//!
//! ## Features
//!
//! - **Price-time priority** per security, executions at the resting price
//! - **Per-security locking**: books for different securities match in parallel
//! - **Accounts ledger** with balances, positions and tiered fees
//! - **Admission** checks (listing, registration, balance, position, tick/lot)
//! - **CSV ingestion** and plain-text / JSON reports
//!
//! ## Example
//!
//! ```rust
//! use lob_engine::prelude::*;
//!
//! let exchange = ExchangeBuilder::new()
//!     .fee_schedule(FeeSchedule::zero())
//!     .list("IBM", "International Business Machines")
//!     .build()
//!     .unwrap();
//!
//! let seller = exchange
//!     .register_trader("Seller", TraderKind::Retail, AccountTier::Basic, Money::ZERO)
//!     .unwrap();
//! let buyer = exchange
//!     .register_trader("Buyer", TraderKind::Institutional, AccountTier::Pro, Money::from_cents(1_000_000))
//!     .unwrap();
//! exchange.add_position(seller, "IBM", 100).unwrap();
//!
//! exchange
//!     .submit_order(Order::ask(seller, "IBM", Price::from_cents(9_500), 5, 1), 1)
//!     .unwrap();
//! let trades = exchange
//!     .submit_order(Order::bid(buyer, "IBM", Price::from_cents(10_000), 10, 2), 2)
//!     .unwrap();
//!
//! // Executed at the resting price; the rest of the bid waits in the book
//! assert_eq!(trades[0].price, Price::from_cents(9_500));
//! let snapshot = exchange.snapshot("IBM", 5).unwrap();
//! assert_eq!(snapshot.best_bid(), Some(Price::from_cents(10_000)));
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod interfaces;
pub mod numeric;
pub mod report;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        Account, AccountTier, ExchangeConfig, FeeSchedule, Order, OrderBookLevel, OrderBookSide,
        OrderBookSnapshot, OrderId, OrderOutcome, Orderbook, Security, Side, Trade, TraderId,
        TraderKind,
    };
    pub use crate::engine::{AccountsLedger, Exchange, ExchangeBuilder, MatchingEngine};
    pub use crate::error::{AdmissionError, ConfigError, ExchangeError, SettlementError};
    pub use crate::interfaces::{
        EventHandler, LoggingEventHandler, NoOpEventHandler, NoSettlement, OrderEvent, Settlement,
    };
    pub use crate::numeric::{Money, Price, Quantity, Timestamp};
}
