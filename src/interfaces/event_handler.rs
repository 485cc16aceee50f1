// ============================================================================
// Event Handler Interface
// Defines the contract for observing order and trade events
// ============================================================================

use crate::domain::{OrderId, Side, Trade, TraderId};
use crate::numeric::{Money, Price, Quantity};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the exchange
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderEvent {
    /// Order received by the exchange
    OrderReceived {
        order_id: OrderId,
        trader: TraderId,
        security: String,
        side: Side,
        timestamp: DateTime<Utc>,
    },

    /// Order refused by admission
    OrderRejected {
        order_id: OrderId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Order matched, trade generated
    OrderMatched {
        trade: Trade,
        timestamp: DateTime<Utc>,
    },

    /// Order partially filled
    OrderPartiallyFilled {
        order_id: OrderId,
        filled_quantity: Quantity,
        remaining_quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Order fully filled
    OrderFilled {
        order_id: OrderId,
        total_filled: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Remainder rested on its own side of the book
    OrderAddedToBook {
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Ledger applied a trade and fixed its fees
    TradeSettled {
        trade_id: Uuid,
        buyer_fee: Money,
        seller_fee: Money,
        timestamp: DateTime<Utc>,
    },

    /// Ledger could not apply a trade; the match itself stands
    SettlementFailed {
        trade_id: Uuid,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing exchange events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an order event
    fn on_event(&self, event: OrderEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        tracing::debug!("exchange event: {:?}", event);
    }
}
