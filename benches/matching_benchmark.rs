// ============================================================================
// Matching Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Book Matching - Price-time matching on a single Orderbook
// 2. Engine Submission - Through the per-security MatchingEngine
// 3. Exchange Submission - Admission + matching + settlement
// 4. Order Book Operations - Snapshot
// ============================================================================

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use lob_engine::prelude::*;
use std::hint::black_box;
use std::sync::Arc;

fn ask(trader: u32, price: u64, time: Timestamp) -> Order {
    Order::ask(TraderId(trader), "IBM", Price::from_cents(price), 1, time)
}

fn bid(trader: u32, price: u64, qty: Quantity, time: Timestamp) -> Order {
    Order::bid(TraderId(trader), "IBM", Price::from_cents(price), qty, time)
}

/// Book with `levels` ask levels of `per_level` orders each, from $500.00 up.
fn seeded_book(levels: u64, per_level: u64) -> Orderbook {
    let mut book = Orderbook::new("IBM");
    let mut time = 0;
    for level in 0..levels {
        for _ in 0..per_level {
            book.submit(ask(1, 50_000 + level, time), time);
            time += 1;
        }
    }
    book
}

// ============================================================================
// Book Matching Benchmarks
// ============================================================================

fn benchmark_price_time_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_time_matching");

    for num_orders in [100u64, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_orders),
            num_orders,
            |b, &num_orders| {
                let book = seeded_book(num_orders / 10, 10);

                // Bid that sweeps the first 5 price levels
                b.iter_batched(
                    || book.clone(),
                    |mut book| black_box(book.submit(bid(2, 50_004, 50, u64::MAX), u64::MAX)),
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn benchmark_no_cross(c: &mut Criterion) {
    c.bench_function("book_insert_no_cross", |b| {
        let book = seeded_book(100, 10);
        b.iter_batched(
            || book.clone(),
            |mut book| black_box(book.submit(bid(2, 49_000, 1, 0), 0)),
            BatchSize::LargeInput,
        );
    });
}

// ============================================================================
// Engine & Exchange Benchmarks
// ============================================================================

fn benchmark_engine_round_trip(c: &mut Criterion) {
    c.bench_function("engine_ask_then_bid", |b| {
        let engine = MatchingEngine::new(Arc::new(NoSettlement), Arc::new(NoOpEventHandler));
        let mut time = 0;

        b.iter(|| {
            time += 1;
            engine.submit(ask(1, 50_000, time), time);
            black_box(engine.submit(bid(2, 50_000, 1, time), time));
        });
    });
}

fn benchmark_exchange_submission(c: &mut Criterion) {
    c.bench_function("exchange_settled_trade", |b| {
        let exchange = ExchangeBuilder::new()
            .list("IBM", "IBM Corp")
            .build()
            .expect("valid configuration");
        let seller = exchange
            .register_trader("S", TraderKind::Institutional, AccountTier::Pro, Money::ZERO)
            .expect("id space");
        let buyer = exchange
            .register_trader("B", TraderKind::Retail, AccountTier::Basic, Money::from_cents(i64::MAX / 2))
            .expect("id space");
        exchange
            .add_position(seller, "IBM", u64::MAX / 2)
            .expect("registered trader");
        let mut time = 0;

        b.iter(|| {
            time += 1;
            let _ = exchange.submit_order(ask(seller.0, 50_000, time), time);
            black_box(exchange.submit_order(bid(buyer.0, 50_000, 1, time), time))
        });
    });
}

// ============================================================================
// Order Book Operations Benchmarks
// ============================================================================

fn benchmark_order_book_snapshot(c: &mut Criterion) {
    c.bench_function("order_book_snapshot", |b| {
        let mut book = seeded_book(100, 1);

        // 100 bid levels below the asks
        for i in 0..100 {
            book.submit(bid(2, 49_900 - i, 1, i), i);
        }

        b.iter(|| {
            black_box(book.snapshot(10));
        });
    });
}

criterion_group!(
    benches,
    benchmark_price_time_matching,
    benchmark_no_cross,
    benchmark_engine_round_trip,
    benchmark_exchange_submission,
    benchmark_order_book_snapshot,
);
criterion_main!(benches);
