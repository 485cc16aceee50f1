// ============================================================================
// Trader & Account Domain Model
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use crate::numeric::{Money, NumericResult, Quantity};

use super::TraderId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of market participant; selects the fee rate within a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraderKind {
    Retail,
    Institutional,
}

impl TraderKind {
    /// `Retail` maps to retail, anything else to institutional.
    pub fn from_label(label: &str) -> Self {
        if label == "Retail" {
            TraderKind::Retail
        } else {
            TraderKind::Institutional
        }
    }
}

/// Account class; selects the fee tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccountTier {
    Basic,
    Pro,
}

impl AccountTier {
    /// `Basic` maps to basic, anything else to pro.
    pub fn from_label(label: &str) -> Self {
        if label == "Basic" {
            AccountTier::Basic
        } else {
            AccountTier::Pro
        }
    }
}

/// A registered market participant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trader {
    pub id: TraderId,
    pub name: String,
    pub kind: TraderKind,
}

impl fmt::Display for Trader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Cash balance and share positions of one trader.
///
/// The balance is signed: settlement debits a buyer even when concurrent
/// fills have already drawn the account below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Account {
    pub trader: Trader,
    pub tier: AccountTier,
    balance: Money,
    positions: BTreeMap<String, Quantity>,
}

impl Account {
    pub fn new(trader: Trader, tier: AccountTier, balance: Money) -> Self {
        Self {
            trader,
            tier,
            balance,
            positions: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> TraderId {
        self.trader.id
    }

    #[inline]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Shares held in `ticker` (0 when never held).
    pub fn position(&self, ticker: &str) -> Quantity {
        self.positions.get(ticker).copied().unwrap_or(0)
    }

    /// All non-empty positions, ordered by ticker.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Quantity)> {
        self.positions
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(ticker, qty)| (ticker.as_str(), *qty))
    }

    pub fn add_to_position(&mut self, ticker: &str, quantity: Quantity) {
        let held = self.positions.entry(ticker.to_string()).or_insert(0);
        *held = held.saturating_add(quantity);
    }

    /// Removes `quantity` shares of `ticker`.
    ///
    /// Returns the current holding as the error when it is too small; the
    /// account is left untouched in that case.
    pub fn deduct_from_position(&mut self, ticker: &str, quantity: Quantity) -> Result<(), Quantity> {
        let held = self.position(ticker);
        if held < quantity {
            return Err(held);
        }
        if let Some(slot) = self.positions.get_mut(ticker) {
            *slot = held - quantity;
        }
        Ok(())
    }

    pub fn add_money(&mut self, amount: Money) -> NumericResult<()> {
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }

    pub fn withdraw_money(&mut self, amount: Money) -> NumericResult<()> {
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }

    /// Charges a fee against the balance.
    pub fn apply_fee(&mut self, fee: Money) -> NumericResult<()> {
        self.withdraw_money(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        let trader = Trader {
            id: TraderId(1),
            name: "Alice".to_string(),
            kind: TraderKind::Retail,
        };
        Account::new(trader, AccountTier::Basic, Money::from_cents(10_000))
    }

    #[test]
    fn test_labels() {
        assert_eq!(TraderKind::from_label("Retail"), TraderKind::Retail);
        assert_eq!(TraderKind::from_label("Hedge"), TraderKind::Institutional);
        assert_eq!(AccountTier::from_label("Basic"), AccountTier::Basic);
        assert_eq!(AccountTier::from_label("basic"), AccountTier::Pro);
    }

    #[test]
    fn test_positions() {
        let mut acc = account();
        assert_eq!(acc.position("IBM"), 0);

        acc.add_to_position("IBM", 10);
        assert_eq!(acc.position("IBM"), 10);

        assert_eq!(acc.deduct_from_position("IBM", 11), Err(10));
        assert_eq!(acc.position("IBM"), 10);

        acc.deduct_from_position("IBM", 10).unwrap();
        assert_eq!(acc.position("IBM"), 0);
        assert_eq!(acc.positions().count(), 0);
    }

    #[test]
    fn test_money_movements() {
        let mut acc = account();
        acc.withdraw_money(Money::from_cents(12_000)).unwrap();
        assert_eq!(acc.balance(), Money::from_cents(-2_000));

        acc.add_money(Money::from_cents(5_000)).unwrap();
        acc.apply_fee(Money::from_cents(100)).unwrap();
        assert_eq!(acc.balance(), Money::from_cents(2_900));
    }
}
