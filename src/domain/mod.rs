// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod account;
pub mod config;
pub mod order;
pub mod order_book;
pub mod outcome;
pub mod security;
pub mod trade;

pub use account::{Account, AccountTier, Trader, TraderKind};
pub use config::{ExchangeConfig, FeeSchedule, TierRates};
pub use order::{Order, OrderId, Side, TraderId};
pub use order_book::{OrderBookLevel, OrderBookSide, OrderBookSnapshot, Orderbook};
pub use outcome::OrderOutcome;
pub use security::{Security, SecurityList};
pub use trade::{Trade, TradeFees};
