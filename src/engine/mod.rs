// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod exchange;
mod ledger;
mod matching_engine;
mod price_time;

pub mod factory;

pub use exchange::Exchange;
pub use factory::ExchangeBuilder;
pub use ledger::AccountsLedger;
pub use matching_engine::MatchingEngine;
