//! Error types for the exchange and its collaborators.
//!
//! Matching itself is infallible: an order that reaches the book has already
//! passed admission, and a broken book invariant is a bug that panics rather
//! than an error value. Everything that *can* fail for well-defined reasons
//! around the core lives here.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{AccountTier, TraderId};
use crate::numeric::{Money, NumericError, Price, Quantity};

/// Why admission refused to forward an order to the matching engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("order quantity must be positive")]
    ZeroQuantity,

    #[error("ticker {ticker} not supported")]
    UnknownTicker { ticker: String },

    #[error("trader with ID {trader} not registered with the exchange")]
    UnknownTrader { trader: TraderId },

    #[error("price {price} is not a multiple of the tick size {tick}")]
    OffTick { price: Price, tick: Price },

    #[error("quantity {quantity} is not a multiple of the lot size {lot}")]
    OddLot { quantity: Quantity, lot: Quantity },

    #[error("seller with ID {trader} has {held} and tries to sell {quantity}")]
    InsufficientPosition {
        trader: TraderId,
        held: Quantity,
        quantity: Quantity,
    },

    #[error(
        "buyer with ID {trader} does not have enough balance: has {balance} and tries to buy for {required}"
    )]
    InsufficientBalance {
        trader: TraderId,
        balance: Money,
        required: Money,
    },

    #[error("order value out of range: {0}")]
    Numeric(#[from] NumericError),
}

/// Failures while applying a trade to the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("fees for trade {trade} were already set")]
    FeesAlreadySet { trade: Uuid },

    #[error("trader with ID {trader} has no account")]
    UnknownTrader { trader: TraderId },

    #[error("trader with ID {trader} holds {held} and cannot deliver {quantity}")]
    PositionUnderflow {
        trader: TraderId,
        held: Quantity,
        quantity: Quantity,
    },

    #[error("settlement arithmetic failed: {0}")]
    Numeric(#[from] NumericError),
}

/// Invalid exchange configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ticker cannot be empty")]
    EmptyTicker,

    #[error("ticker {ticker} listed twice")]
    DuplicateTicker { ticker: String },

    #[error("{tier:?} fee rate {rate} must be in [0, 1)")]
    InvalidFeeRate { tier: AccountTier, rate: String },

    #[error("{tier:?} minimum fee cannot be negative")]
    NegativeMinimumFee { tier: AccountTier },

    #[error("tick size must be positive")]
    ZeroTickSize,

    #[error("lot size must be positive")]
    ZeroLotSize,
}

/// Failures while reading bulk input files.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),
}

/// Top-level error of the exchange facade.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("order rejected: {0}")]
    Rejected(#[from] AdmissionError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}
