// ============================================================================
// Bulk Ingestion
// Flat CSV files for listings, accounts, initial positions and order streams
// ============================================================================

//! CSV loaders.
//!
//! Every file starts with a header line, which is skipped. Fields are comma
//! separated and trimmed. Blank lines and `#` comments are ignored.
//!
//! - Securities: `ticker, title`
//! - Accounts: `title, trader_type, account_type, initial_balance(cents)`
//! - Positions: `trader_id, ticker, quantity`
//! - Orders: `trader_id, ticker, type(ask|bid), quantity, price(cents), time`
//!
//! A line that is not UTF-8, does not parse, or refers to an unknown trader
//! or ticker, is skipped with a warning. Only I/O failures abort a load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::domain::{AccountTier, Order, Security, Side, TraderId, TraderKind};
use crate::engine::Exchange;
use crate::error::{ExchangeError, IngestError};
use crate::numeric::{Money, Price, Quantity, Timestamp};

/// What a load did with the lines it read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Lines applied to the exchange
    pub applied: usize,

    /// Malformed lines or lines naming an unknown trader/ticker
    pub skipped: usize,

    /// Orders that parsed but were refused by admission
    pub rejected: usize,
}

enum LineResult {
    Applied,
    Skipped,
    Rejected,
}

/// Opens a file for one of the loaders.
pub fn open(path: impl AsRef<Path>) -> Result<BufReader<File>, IngestError> {
    let path = path.as_ref();
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })
}

// ============================================================================
// Loaders
// ============================================================================

pub fn load_securities(exchange: &Exchange, reader: impl BufRead) -> Result<IngestSummary, IngestError> {
    for_each_record(reader, 2, |fields| {
        match exchange.list_security(Security::new(fields[0], fields[1])) {
            Ok(()) => LineResult::Applied,
            Err(err) => {
                tracing::warn!("skipping security {}: {}", fields[0], err);
                LineResult::Skipped
            }
        }
    })
}

pub fn load_accounts(exchange: &Exchange, reader: impl BufRead) -> Result<IngestSummary, IngestError> {
    for_each_record(reader, 4, |fields| {
        let Some(balance) = parse::<i64>(fields[3]) else {
            return LineResult::Skipped;
        };
        let registered = exchange.register_trader(
            fields[0],
            TraderKind::from_label(fields[1]),
            AccountTier::from_label(fields[2]),
            Money::from_cents(balance),
        );
        match registered {
            Ok(_) => LineResult::Applied,
            Err(err) => {
                tracing::warn!("skipping account {}: {}", fields[0], err);
                LineResult::Skipped
            }
        }
    })
}

pub fn load_positions(exchange: &Exchange, reader: impl BufRead) -> Result<IngestSummary, IngestError> {
    for_each_record(reader, 3, |fields| {
        let (Some(trader), Some(quantity)) = (parse::<u32>(fields[0]), parse::<Quantity>(fields[2]))
        else {
            return LineResult::Skipped;
        };
        match exchange.add_position(TraderId(trader), fields[1], quantity) {
            Ok(()) => LineResult::Applied,
            Err(err) => {
                tracing::warn!("skipping position: {}", err);
                LineResult::Skipped
            }
        }
    })
}

/// Replays an order stream; each order is submitted at its own time.
pub fn load_orders(exchange: &Exchange, reader: impl BufRead) -> Result<IngestSummary, IngestError> {
    for_each_record(reader, 6, |fields| {
        let Some(order) = parse_order(fields) else {
            return LineResult::Skipped;
        };
        if exchange.ledger().trader_by_id(order.trader).is_none() {
            tracing::warn!("skipping order from unknown trader {}", order.trader);
            return LineResult::Skipped;
        }
        if exchange.security(&order.security).is_none() {
            tracing::warn!("skipping order for unknown ticker {}", order.security);
            return LineResult::Skipped;
        }

        let time = order.time;
        match exchange.submit_order(order, time) {
            Ok(_) => LineResult::Applied,
            Err(ExchangeError::Rejected(_)) => LineResult::Rejected,
            Err(err) => {
                tracing::warn!("order not applied: {}", err);
                LineResult::Skipped
            }
        }
    })
}

// ============================================================================
// Line parsing
// ============================================================================

fn parse_order(fields: &[&str]) -> Option<Order> {
    // trader_id, ticker, type, quantity, price, time
    let trader = TraderId(parse(fields[0])?);
    let ticker = fields[1];
    let Some(side) = Side::parse(fields[2]) else {
        tracing::warn!("order type {:?} not found", fields[2]);
        return None;
    };
    let quantity: Quantity = parse(fields[3])?;
    let price = Price::from_cents(parse(fields[4])?);
    let time: Timestamp = parse(fields[5])?;

    Some(Order::new(trader, ticker, side, price, quantity, time))
}

fn parse<T: FromStr>(field: &str) -> Option<T> {
    match field.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("cannot parse field {:?}", field);
            None
        }
    }
}

fn split_and_trim(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn for_each_record<R: BufRead>(
    mut reader: R,
    min_fields: usize,
    mut apply: impl FnMut(&[&str]) -> LineResult,
) -> Result<IngestSummary, IngestError> {
    let mut summary = IngestSummary::default();
    let mut buf = Vec::new();
    let mut number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        number += 1;
        if number == 1 {
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(line = number, "skipping line that is not UTF-8: {}", err);
                summary.skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_and_trim(trimmed);
        let result = if fields.len() < min_fields {
            LineResult::Skipped
        } else {
            apply(&fields)
        };

        match result {
            LineResult::Applied => summary.applied += 1,
            LineResult::Rejected => summary.rejected += 1,
            LineResult::Skipped => {
                tracing::warn!(line = number, "skipping malformed line: {}", trimmed);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}
