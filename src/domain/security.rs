// ============================================================================
// Listed Securities
// ============================================================================

use std::collections::BTreeMap;

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Security {
    pub ticker: String,
    pub title: String,
}

impl Security {
    pub fn new(ticker: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            title: title.into(),
        }
    }
}

/// Securities listed on the exchange, keyed by ticker.
#[derive(Debug, Clone, Default)]
pub struct SecurityList {
    securities: BTreeMap<String, Security>,
}

impl SecurityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists a security.
    ///
    /// # Errors
    /// `EmptyTicker` for a blank ticker, `DuplicateTicker` if already listed.
    pub fn add(&mut self, security: Security) -> Result<(), ConfigError> {
        if security.ticker.is_empty() {
            return Err(ConfigError::EmptyTicker);
        }
        if self.securities.contains_key(&security.ticker) {
            return Err(ConfigError::DuplicateTicker {
                ticker: security.ticker,
            });
        }
        self.securities.insert(security.ticker.clone(), security);
        Ok(())
    }

    pub fn get(&self, ticker: &str) -> Option<&Security> {
        self.securities.get(ticker)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.securities.contains_key(ticker)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Security> {
        self.securities.values()
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}
