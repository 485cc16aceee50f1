// ============================================================================
// Reporting
// Plain-text tables of books, trades, balances and fees
// ============================================================================

use crate::domain::{OrderBookSide, Orderbook, Side};
use crate::engine::Exchange;

const BOOK_HEADER: &str = "[Trader__  Tkr_  Quantity  Price_____  Time____]\n";
const TRADE_HEADER: &str = "[From____  To______  Tkr_  Quantity  Price_____  Time____]\n";
const BALANCE_HEADER: &str = "[Trader__  Name____________  Balance_______  Positions]\n";

/// Resting asks of every book, best first within each security.
pub fn ask_table(exchange: &Exchange, header: bool) -> String {
    book_table(exchange, Side::Ask, header)
}

/// Resting bids of every book, best first within each security.
pub fn bid_table(exchange: &Exchange, header: bool) -> String {
    book_table(exchange, Side::Bid, header)
}

/// One side of one book in priority order.
pub fn side_table(side: &OrderBookSide, ticker: &str, header: bool) -> String {
    let mut out = String::new();
    if header {
        out.push_str(BOOK_HEADER);
    }
    write_side(&mut out, side, ticker);
    out
}

/// Every trade in execution order; "From" is the seller, "To" the buyer.
pub fn trade_log(exchange: &Exchange, header: bool) -> String {
    let mut out = String::new();
    if header {
        out.push_str(TRADE_HEADER);
    }
    for trade in exchange.trades() {
        out.push_str(&format!(
            "{:<8}  {:<8}  {:<4}  {:>8}  {:>10}  {:>8}\n",
            trade.seller.0, trade.buyer.0, trade.security, trade.quantity, trade.price, trade.time
        ));
    }
    out
}

pub fn balances(exchange: &Exchange, header: bool) -> String {
    let mut out = String::new();
    if header {
        out.push_str(BALANCE_HEADER);
    }
    for account in exchange.accounts() {
        let positions: Vec<String> = account
            .positions()
            .map(|(ticker, qty)| format!("{}:{}", ticker, qty))
            .collect();
        out.push_str(&format!(
            "{:<8}  {:<16}  {:>14}  {}\n",
            account.id().0,
            account.trader.name,
            account.balance(),
            positions.join(" ")
        ));
    }
    out
}

pub fn fees_collected(exchange: &Exchange, header: bool) -> String {
    let fees = exchange.fees_collected();
    if header {
        format!("[Fees collected: {}]\n", fees)
    } else {
        format!("{}\n", fees)
    }
}

fn book_table(exchange: &Exchange, side: Side, header: bool) -> String {
    let mut out = String::new();
    if header {
        out.push_str(BOOK_HEADER);
    }
    for ticker in exchange.engine().tickers() {
        exchange.with_book(&ticker, |book: &Orderbook| {
            write_side(&mut out, book.side(side), book.security())
        });
    }
    out
}

fn write_side(out: &mut String, side: &OrderBookSide, ticker: &str) {
    for order in side.iter() {
        out.push_str(&format!(
            "{:<8}  {:<4}  {:>8}  {:>10}  {:>8}\n",
            order.trader.0,
            ticker,
            order.remaining(),
            order.price,
            order.time
        ));
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Snapshots of every book, `depth` levels per side.
#[cfg(feature = "serde")]
pub fn snapshots_json(exchange: &Exchange, depth: usize) -> serde_json::Result<String> {
    let snapshots: Vec<_> = exchange
        .engine()
        .tickers()
        .iter()
        .filter_map(|ticker| exchange.snapshot(ticker, depth))
        .collect();
    serde_json::to_string_pretty(&snapshots)
}

#[cfg(feature = "serde")]
pub fn trade_log_json(exchange: &Exchange) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&exchange.trades())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountTier, FeeSchedule, Order, TraderKind};
    use crate::engine::ExchangeBuilder;
    use crate::numeric::{Money, Price};

    fn exchange() -> Exchange {
        let ex = ExchangeBuilder::new()
            .fee_schedule(FeeSchedule::zero())
            .list("IBM", "IBM Corp")
            .build()
            .unwrap();
        let seller = ex
            .register_trader("Seller", TraderKind::Retail, AccountTier::Basic, Money::ZERO)
            .unwrap();
        let buyer = ex
            .register_trader("Buyer", TraderKind::Retail, AccountTier::Basic, Money::from_cents(1_000_000))
            .unwrap();
        ex.add_position(seller, "IBM", 30).unwrap();

        ex.submit_order(Order::ask(seller, "IBM", Price::from_cents(10_100), 10, 1), 1)
            .unwrap();
        ex.submit_order(Order::ask(seller, "IBM", Price::from_cents(10_000), 10, 2), 2)
            .unwrap();
        ex.submit_order(Order::bid(buyer, "IBM", Price::from_cents(10_000), 4, 3), 3)
            .unwrap();
        ex.submit_order(Order::bid(buyer, "IBM", Price::from_cents(9_900), 1, 4), 4)
            .unwrap();
        ex
    }

    #[test]
    fn test_book_tables_in_priority_order() {
        let ex = exchange();

        let asks = ask_table(&ex, true);
        let lines: Vec<&str> = asks.lines().collect();
        assert_eq!(lines[0], BOOK_HEADER.trim_end());
        assert_eq!(lines[1], "1         IBM          6     $100.00         2");
        assert_eq!(lines[2], "1         IBM         10     $101.00         1");

        let bids = bid_table(&ex, false);
        assert_eq!(bids, "2         IBM          1      $99.00         4\n");
    }

    #[test]
    fn test_side_table_one_row_per_order() {
        let ex = exchange();
        let table = ex
            .with_book("IBM", |book| side_table(book.asks(), book.security(), true))
            .unwrap();

        assert_eq!(
            table,
            format!(
                "{}{}\n{}\n",
                BOOK_HEADER,
                "1         IBM          6     $100.00         2",
                "1         IBM         10     $101.00         1"
            )
        );
        assert_eq!(side_table(&OrderBookSide::new(Side::Bid), "IBM", false), "");
    }

    #[test]
    fn test_trade_log_and_fees() {
        let ex = exchange();
        let log = trade_log(&ex, true);
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "1         2         IBM          4     $100.00         3");

        assert_eq!(fees_collected(&ex, true), "[Fees collected: $0.00]\n");
        assert_eq!(fees_collected(&ex, false), "$0.00\n");
    }

    #[test]
    fn test_balances() {
        let ex = exchange();
        let table = balances(&ex, false);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("1         Seller"));
        assert!(lines[0].contains("$400.00"));
        assert!(lines[0].ends_with("IBM:26"));
        assert!(lines[1].contains("$9,600.00"));
        assert!(lines[1].ends_with("IBM:4"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_reports() {
        let ex = exchange();
        let trades: serde_json::Value = serde_json::from_str(&trade_log_json(&ex).unwrap()).unwrap();
        assert_eq!(trades.as_array().unwrap().len(), 1);

        let books: serde_json::Value =
            serde_json::from_str(&snapshots_json(&ex, 5).unwrap()).unwrap();
        assert_eq!(books[0]["security"], "IBM");
    }
}
