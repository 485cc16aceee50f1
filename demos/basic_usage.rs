// ============================================================================
// Basic Usage Example
// ============================================================================

use lob_engine::prelude::*;
use lob_engine::report;
use std::sync::Arc;

fn main() {
    println!("=== LOB Exchange Example ===\n");

    let exchange = ExchangeBuilder::new()
        .fee_schedule(FeeSchedule::standard())
        .event_handler(Arc::new(LoggingEventHandler))
        .list("IBM", "International Business Machines")
        .build()
        .expect("valid configuration");

    let sellers: Vec<TraderId> = (0..5)
        .map(|i| {
            let id = exchange
                .register_trader(
                    format!("seller_{}", i),
                    TraderKind::Institutional,
                    AccountTier::Pro,
                    Money::ZERO,
                )
                .expect("id space");
            exchange
                .add_position(id, "IBM", 10)
                .expect("registered trader");
            id
        })
        .collect();
    let buyer = exchange
        .register_trader("buyer", TraderKind::Retail, AccountTier::Basic, Money::from_cents(10_000_000))
        .expect("id space");

    println!("Listed IBM, registered {} traders\n", exchange.accounts().len());

    // Asks at $500.00, $501.00, ... $504.00
    println!("Adding asks...");
    for (i, seller) in sellers.iter().enumerate() {
        let price = Price::from_cents(50_000 + i as u64 * 100);
        let ask = Order::ask(*seller, "IBM", price, 10, i as u64);
        exchange.submit_order(ask, i as u64).expect("admitted");
    }

    // Bids below the best ask rest in the book
    println!("Adding bids...");
    for i in 0..3u64 {
        let price = Price::from_cents(49_900 - i * 100);
        let bid = Order::bid(buyer, "IBM", price, 5, 10 + i);
        exchange.submit_order(bid, 10 + i).expect("admitted");
    }

    println!("\n=== Order Book Snapshot ===");
    if let Some(snapshot) = exchange.snapshot("IBM", 5) {
        println!("\nBids:");
        for level in &snapshot.bids {
            println!("  {} @ {}", level.quantity, level.price);
        }

        println!("\nAsks:");
        for level in &snapshot.asks {
            println!("  {} @ {}", level.quantity, level.price);
        }

        println!("\nSpread: {:?}", snapshot.spread.map(|s| s.to_string()));
        println!("Mid Price: {:?}", snapshot.mid_price);
    }

    // Crosses the first three ask levels
    println!("\n=== Submitting Crossing Bid ===");
    let sweep = Order::bid(buyer, "IBM", Price::from_cents(50_200), 25, 20);
    match exchange.submit_order(sweep, 20) {
        Ok(trades) => {
            for trade in &trades {
                println!(
                    "  Trade: {} x {} @ {} (fees {} / {})",
                    trade.id,
                    trade.quantity,
                    trade.price,
                    trade.buyer_fee(),
                    trade.seller_fee()
                );
            }
        }
        Err(err) => println!("  rejected: {}", err),
    }

    println!("\n=== Final State ===");
    print!("{}", report::ask_table(&exchange, true));
    print!("{}", report::bid_table(&exchange, true));
    print!("{}", report::balances(&exchange, true));
    print!("{}", report::fees_collected(&exchange, true));
}
