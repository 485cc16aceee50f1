// ============================================================================
// Exchange Configuration
// Fee schedule per account tier plus order granularity rules
// ============================================================================

use rust_decimal::Decimal;

use crate::error::ConfigError;
use crate::numeric::{Money, NumericError, NumericResult, Price, Quantity};

use super::{AccountTier, TraderKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Fee Schedule
// ============================================================================

/// Fee rates of one account tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TierRates {
    /// Fraction of trade value charged to retail traders
    pub retail: Decimal,

    /// Fraction of trade value charged to institutional traders
    pub institutional: Decimal,

    /// Floor applied to every fee of this tier
    pub minimum: Money,
}

impl TierRates {
    pub const FREE: Self = Self {
        retail: Decimal::ZERO,
        institutional: Decimal::ZERO,
        minimum: Money::ZERO,
    };

    pub fn rate(&self, kind: TraderKind) -> Decimal {
        match kind {
            TraderKind::Retail => self.retail,
            TraderKind::Institutional => self.institutional,
        }
    }

    /// Fee on a trade of `value`: the rate applied in cents, rounded half
    /// away from zero, never below the tier minimum.
    pub fn fee(&self, kind: TraderKind, value: Money) -> NumericResult<Money> {
        let cents = Decimal::from(value.cents())
            .checked_mul(self.rate(kind))
            .ok_or(NumericError::Overflow)?;
        Ok(Money::from_decimal_cents(cents)?.max(self.minimum))
    }

    fn validate(&self, tier: AccountTier) -> Result<(), ConfigError> {
        for rate in [self.retail, self.institutional] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(ConfigError::InvalidFeeRate {
                    tier,
                    rate: rate.to_string(),
                });
            }
        }
        if self.minimum.is_negative() {
            return Err(ConfigError::NegativeMinimumFee { tier });
        }
        Ok(())
    }
}

/// Fee rates for every account tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeeSchedule {
    pub basic: TierRates,
    pub pro: TierRates,
}

impl FeeSchedule {
    /// Basic: 0.25% retail, 0.20% institutional, $1.00 minimum.
    /// Pro: 0.10% retail, 0.05% institutional, no minimum.
    pub fn standard() -> Self {
        Self {
            basic: TierRates {
                retail: Decimal::new(25, 4),
                institutional: Decimal::new(20, 4),
                minimum: Money::from_cents(100),
            },
            pro: TierRates {
                retail: Decimal::new(10, 4),
                institutional: Decimal::new(5, 4),
                minimum: Money::ZERO,
            },
        }
    }

    /// No fees at all.
    pub fn zero() -> Self {
        Self {
            basic: TierRates::FREE,
            pro: TierRates::FREE,
        }
    }

    pub fn tier(&self, tier: AccountTier) -> &TierRates {
        match tier {
            AccountTier::Basic => &self.basic,
            AccountTier::Pro => &self.pro,
        }
    }

    pub fn fee(&self, tier: AccountTier, kind: TraderKind, value: Money) -> NumericResult<Money> {
        self.tier(tier).fee(kind, value)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.basic.validate(AccountTier::Basic)?;
        self.pro.validate(AccountTier::Pro)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Complete Exchange Configuration
// ============================================================================

/// Exchange-wide settings applied by admission and settlement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExchangeConfig {
    pub fee_schedule: FeeSchedule,

    /// Optional: Price tick size (minimum price increment)
    /// None means no tick size enforcement
    pub tick_size: Option<Price>,

    /// Optional: Lot size (minimum quantity increment)
    /// None means no lot size enforcement
    pub lot_size: Option<Quantity>,
}

impl ExchangeConfig {
    pub fn new(fee_schedule: FeeSchedule) -> Self {
        Self {
            fee_schedule,
            tick_size: None,
            lot_size: None,
        }
    }

    /// Builder method: Set price tick size
    pub fn with_tick_size(mut self, tick: Price) -> Self {
        self.tick_size = Some(tick);
        self
    }

    /// Builder method: Set lot size
    pub fn with_lot_size(mut self, lot: Quantity) -> Self {
        self.lot_size = Some(lot);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fee_schedule.validate()?;

        if self.tick_size == Some(Price::ZERO) {
            return Err(ConfigError::ZeroTickSize);
        }
        if self.lot_size == Some(0) {
            return Err(ConfigError::ZeroLotSize);
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl ExchangeConfig {
    /// Standard fees, any price, any quantity.
    pub fn standard() -> Self {
        Self::new(FeeSchedule::standard())
    }

    /// No fees; useful for replaying order streams and for tests.
    pub fn fee_free() -> Self {
        Self::new(FeeSchedule::zero())
    }

    /// Standard fees, cent ticks and round lots of 100 shares.
    pub fn round_lots() -> Self {
        Self::standard()
            .with_tick_size(Price::from_cents(1))
            .with_lot_size(100)
    }
}
