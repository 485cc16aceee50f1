// ============================================================================
// Exchange Factory
// Creates exchanges with proper configuration
// ============================================================================

use crate::domain::{ExchangeConfig, FeeSchedule, Security};
use crate::engine::Exchange;
use crate::error::ConfigError;
use crate::interfaces::{EventHandler, NoOpEventHandler};
use crate::numeric::{Price, Quantity};
use std::sync::Arc;

/// Builder for creating exchanges with fluent API
///
/// # Example
/// ```
/// use lob_engine::prelude::*;
///
/// let exchange = ExchangeBuilder::new()
///     .fee_schedule(FeeSchedule::zero())
///     .with_tick_size(Price::from_cents(1))
///     .list("IBM", "International Business Machines")
///     .build()
///     .unwrap();
///
/// assert!(exchange.security("IBM").is_some());
/// ```
pub struct ExchangeBuilder {
    config: ExchangeConfig,
    securities: Vec<Security>,
    event_handler: Arc<dyn EventHandler>,
}

impl ExchangeBuilder {
    /// Create a new builder with the standard fee schedule
    pub fn new() -> Self {
        Self::from_config(ExchangeConfig::standard())
    }

    /// Start from an existing configuration
    pub fn from_config(config: ExchangeConfig) -> Self {
        Self {
            config,
            securities: Vec::new(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn fee_schedule(mut self, fee_schedule: FeeSchedule) -> Self {
        self.config.fee_schedule = fee_schedule;
        self
    }

    /// Set price tick size
    pub fn with_tick_size(mut self, tick_size: Price) -> Self {
        self.config.tick_size = Some(tick_size);
        self
    }

    /// Set lot size
    pub fn with_lot_size(mut self, lot_size: Quantity) -> Self {
        self.config.lot_size = Some(lot_size);
        self
    }

    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// List a security at build time
    pub fn list(mut self, ticker: impl Into<String>, title: impl Into<String>) -> Self {
        self.securities.push(Security::new(ticker, title));
        self
    }

    pub fn securities(mut self, securities: impl IntoIterator<Item = Security>) -> Self {
        self.securities.extend(securities);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Validate the configuration and create the exchange
    pub fn build(self) -> Result<Exchange, ConfigError> {
        let exchange = Exchange::new(self.config, self.event_handler)?;
        for security in self.securities {
            exchange.list_security(security)?;
        }
        Ok(exchange)
    }
}

impl Default for ExchangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
