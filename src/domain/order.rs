// ============================================================================
// Order Domain Model
// ============================================================================

use crate::numeric::{Money, NumericResult, Price, Quantity, Timestamp};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak reference to a participant: an identity used to look the trader up
/// in the ledger, never ownership of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraderId(pub u32);

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Buy or sell intent. The tag parameterizes both the crossing test and the
/// price ordering of a book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Buy intent
    Bid,
    /// Sell intent
    Ask,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Crossing test for an incoming order on this side against a resting
    /// order on the opposite side.
    #[inline]
    pub fn crosses(self, incoming: Price, resting: Price) -> bool {
        match self {
            Side::Bid => incoming >= resting,
            Side::Ask => incoming <= resting,
        }
    }

    /// True when `a` has strictly better price priority than `b` on a book
    /// side holding orders of this side (higher bids, lower asks).
    #[inline]
    pub fn is_better_price(self, a: Price, b: Price) -> bool {
        match self {
            Side::Bid => a > b,
            Side::Ask => a < b,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }

    /// Parses the order-file spelling (`bid` / `ask`, case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("bid") {
            Some(Side::Bid)
        } else if s.eq_ignore_ascii_case("ask") {
            Some(Side::Ask)
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A limit order.
///
/// Identity (id, trader, security, side, price, original quantity, time) is
/// fixed at construction. The remaining quantity only ever decreases, and only
/// the matching algorithm decreases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub trader: TraderId,
    pub security: Arc<String>,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub time: Timestamp,

    remaining: Quantity,
}

impl Order {
    pub fn new(
        trader: TraderId,
        security: impl Into<String>,
        side: Side,
        price: Price,
        quantity: Quantity,
        time: Timestamp,
    ) -> Self {
        Self {
            id: OrderId::new(),
            trader,
            security: Arc::new(security.into()),
            side,
            price,
            quantity,
            time,
            remaining: quantity,
        }
    }

    pub fn bid(
        trader: TraderId,
        security: impl Into<String>,
        price: Price,
        quantity: Quantity,
        time: Timestamp,
    ) -> Self {
        Self::new(trader, security, Side::Bid, price, quantity, time)
    }

    pub fn ask(
        trader: TraderId,
        security: impl Into<String>,
        price: Price,
        quantity: Quantity,
        time: Timestamp,
    ) -> Self {
        Self::new(trader, security, Side::Ask, price, quantity, time)
    }

    #[inline]
    pub fn remaining(&self) -> Quantity {
        self.remaining
    }

    #[inline]
    pub fn filled(&self) -> Quantity {
        self.quantity - self.remaining
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Value of the full original quantity at the limit price.
    pub fn value(&self) -> NumericResult<Money> {
        self.price.checked_notional(self.quantity)
    }

    /// Consumes `qty` of the remaining quantity.
    pub(crate) fn fill(&mut self, qty: Quantity) {
        debug_assert!(qty > 0, "zero-quantity fill");
        debug_assert!(qty <= self.remaining, "fill exceeds remaining quantity");
        self.remaining -= qty;
    }
}
