// ============================================================================
// Exchange
// Admission gate in front of the matching engine and the ledger
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::{
    Account, AccountTier, ExchangeConfig, Order, OrderBookSnapshot, Orderbook, Security,
    SecurityList, Side, Trade, TraderId, TraderKind,
};
use crate::error::{AdmissionError, ConfigError, ExchangeError, SettlementError};
use crate::interfaces::{EventHandler, OrderEvent};
use crate::numeric::{Money, NumericResult, Quantity, Timestamp};

use super::{AccountsLedger, MatchingEngine};

/// A limit-order-book exchange.
///
/// Orders pass admission, then go to the matching engine, whose trades are
/// settled against the accounts ledger.
pub struct Exchange {
    config: ExchangeConfig,
    securities: RwLock<SecurityList>,
    ledger: Arc<AccountsLedger>,
    engine: MatchingEngine,
    event_handler: Arc<dyn EventHandler>,
}

impl Exchange {
    /// Creates an exchange with an empty ledger.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration does not validate.
    pub fn new(
        config: ExchangeConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let ledger = Arc::new(AccountsLedger::new(config.fee_schedule));
        let engine = MatchingEngine::new(ledger.clone(), event_handler.clone());

        Ok(Self {
            config,
            securities: RwLock::new(SecurityList::new()),
            ledger,
            engine,
            event_handler,
        })
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn ledger(&self) -> &AccountsLedger {
        &self.ledger
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    // ========================================================================
    // Listing & registration
    // ========================================================================

    /// Lists a security and opens its (empty) book.
    pub fn list_security(&self, security: Security) -> Result<(), ConfigError> {
        let ticker = security.ticker.clone();
        self.securities.write().add(security)?;
        self.engine.open_book(&ticker);
        tracing::debug!(ticker = %ticker, "security listed");
        Ok(())
    }

    pub fn security(&self, ticker: &str) -> Option<Security> {
        self.securities.read().get(ticker).cloned()
    }

    pub fn securities(&self) -> Vec<Security> {
        self.securities.read().iter().cloned().collect()
    }

    /// # Errors
    /// Returns `Overflow` once the trader id space is exhausted.
    pub fn register_trader(
        &self,
        name: impl Into<String>,
        kind: TraderKind,
        tier: AccountTier,
        initial_balance: Money,
    ) -> NumericResult<TraderId> {
        self.ledger.register(name, kind, tier, initial_balance)
    }

    pub fn add_position(
        &self,
        trader: TraderId,
        ticker: &str,
        quantity: Quantity,
    ) -> Result<(), SettlementError> {
        self.ledger.add_to_position(trader, ticker, quantity)
    }

    // ========================================================================
    // Admission & submission
    // ========================================================================

    /// Checks an order against the listing, the ledger and the configured
    /// granularity.
    ///
    /// Shares already offered in the trader's resting asks for the same
    /// ticker are not available to a new ask.
    pub fn validate_order(&self, order: &Order) -> Result<(), AdmissionError> {
        self.check_terms(order)?;
        match self
            .engine
            .with_book(&order.security, |book| self.check_holdings(order, book))
        {
            Some(result) => result,
            None => self.check_holdings(order, &Orderbook::new(order.security.as_str())),
        }
    }

    /// Validates and matches an order.
    ///
    /// The holdings check runs under the book lock, so resting asks of a
    /// trader never exceed the shares the trader holds.
    ///
    /// # Errors
    /// `ExchangeError::Rejected` when admission refuses the order; the books
    /// and the ledger are untouched in that case.
    pub fn submit_order(&self, order: Order, time: Timestamp) -> Result<Vec<Trade>, ExchangeError> {
        let order_id = order.id;
        self.event_handler.on_event(OrderEvent::OrderReceived {
            order_id,
            trader: order.trader,
            security: order.security.to_string(),
            side: order.side,
            timestamp: Utc::now(),
        });

        let result = self.check_terms(&order).and_then(|()| {
            self.engine
                .submit_checked(order, time, |book, order| self.check_holdings(order, book))
        });

        result.map_err(|err| {
            tracing::warn!(order_id = %order_id.as_uuid(), "order validation: {}", err);
            self.event_handler.on_event(OrderEvent::OrderRejected {
                order_id,
                reason: err.to_string(),
                timestamp: Utc::now(),
            });
            err.into()
        })
    }

    /// Checks that do not depend on the book: quantity, listing,
    /// registration, tick and lot.
    fn check_terms(&self, order: &Order) -> Result<(), AdmissionError> {
        if order.quantity == 0 {
            return Err(AdmissionError::ZeroQuantity);
        }

        if !self.securities.read().contains(&order.security) {
            return Err(AdmissionError::UnknownTicker {
                ticker: order.security.to_string(),
            });
        }

        if !self.ledger.contains(order.trader) {
            return Err(AdmissionError::UnknownTrader {
                trader: order.trader,
            });
        }

        if let Some(tick) = self.config.tick_size {
            if !order.price.is_on_tick(tick) {
                return Err(AdmissionError::OffTick {
                    price: order.price,
                    tick,
                });
            }
        }
        if let Some(lot) = self.config.lot_size {
            if order.quantity % lot != 0 {
                return Err(AdmissionError::OddLot {
                    quantity: order.quantity,
                    lot,
                });
            }
        }

        Ok(())
    }

    /// Ask: free shares (held minus resting asks) cover the quantity.
    /// Bid: balance covers price × quantity.
    fn check_holdings(&self, order: &Order, book: &Orderbook) -> Result<(), AdmissionError> {
        let account = self
            .ledger
            .account(order.trader)
            .ok_or(AdmissionError::UnknownTrader {
                trader: order.trader,
            })?;

        match order.side {
            Side::Ask => {
                let offered = book.asks().quantity_for(order.trader);
                let held = account.position(&order.security).saturating_sub(offered);
                if held < order.quantity {
                    return Err(AdmissionError::InsufficientPosition {
                        trader: order.trader,
                        held,
                        quantity: order.quantity,
                    });
                }
            }
            Side::Bid => {
                let required = order.value()?;
                if account.balance() < required {
                    return Err(AdmissionError::InsufficientBalance {
                        trader: order.trader,
                        balance: account.balance(),
                        required,
                    });
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn trades(&self) -> Vec<Trade> {
        self.engine.trades()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.ledger.accounts()
    }

    pub fn fees_collected(&self) -> Money {
        self.ledger.fees_collected()
    }

    pub fn snapshot(&self, ticker: &str, depth: usize) -> Option<OrderBookSnapshot> {
        self.engine.snapshot(ticker, depth)
    }

    pub fn with_book<R>(&self, ticker: &str, f: impl FnOnce(&Orderbook) -> R) -> Option<R> {
        self.engine.with_book(ticker, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeeSchedule;
    use crate::interfaces::NoOpEventHandler;
    use crate::numeric::Price;

    fn exchange(config: ExchangeConfig) -> Exchange {
        let exchange = Exchange::new(config, Arc::new(NoOpEventHandler)).unwrap();
        exchange.list_security(Security::new("IBM", "IBM Corp")).unwrap();
        exchange
    }

    fn rejection(result: Result<Vec<Trade>, ExchangeError>) -> AdmissionError {
        match result {
            Err(ExchangeError::Rejected(err)) => err,
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_admission_order_of_checks() {
        let ex = exchange(ExchangeConfig::fee_free());
        let t = ex.register_trader("A", TraderKind::Retail, AccountTier::Basic, Money::from_cents(500)).unwrap();

        let zero = Order::bid(TraderId(99), "ZZZ", Price::from_cents(1), 0, 1);
        assert_eq!(ex.validate_order(&zero), Err(AdmissionError::ZeroQuantity));

        let unknown_ticker = Order::bid(TraderId(99), "ZZZ", Price::from_cents(1), 1, 1);
        assert_eq!(
            ex.validate_order(&unknown_ticker),
            Err(AdmissionError::UnknownTicker {
                ticker: "ZZZ".to_string()
            })
        );

        let unknown_trader = Order::bid(TraderId(99), "IBM", Price::from_cents(1), 1, 1);
        assert_eq!(
            ex.validate_order(&unknown_trader),
            Err(AdmissionError::UnknownTrader {
                trader: TraderId(99)
            })
        );

        let no_shares = Order::ask(t, "IBM", Price::from_cents(100), 1, 1);
        assert_eq!(
            ex.validate_order(&no_shares),
            Err(AdmissionError::InsufficientPosition {
                trader: t,
                held: 0,
                quantity: 1
            })
        );

        let too_dear = Order::bid(t, "IBM", Price::from_cents(100), 6, 1);
        assert_eq!(
            ex.validate_order(&too_dear),
            Err(AdmissionError::InsufficientBalance {
                trader: t,
                balance: Money::from_cents(500),
                required: Money::from_cents(600)
            })
        );

        let affordable = Order::bid(t, "IBM", Price::from_cents(100), 5, 1);
        assert!(ex.validate_order(&affordable).is_ok());
    }

    #[test]
    fn test_tick_and_lot_sizes() {
        let config = ExchangeConfig::new(FeeSchedule::zero())
            .with_tick_size(Price::from_cents(5))
            .with_lot_size(10);
        let ex = exchange(config);
        let t = ex.register_trader("A", TraderKind::Retail, AccountTier::Basic, Money::from_cents(1_000_000)).unwrap();

        let off_tick = Order::bid(t, "IBM", Price::from_cents(101), 10, 1);
        assert_eq!(
            ex.validate_order(&off_tick),
            Err(AdmissionError::OffTick {
                price: Price::from_cents(101),
                tick: Price::from_cents(5)
            })
        );

        let odd_lot = Order::bid(t, "IBM", Price::from_cents(100), 15, 1);
        assert_eq!(
            ex.validate_order(&odd_lot),
            Err(AdmissionError::OddLot {
                quantity: 15,
                lot: 10
            })
        );

        let ok = Order::bid(t, "IBM", Price::from_cents(100), 20, 1);
        assert!(ex.validate_order(&ok).is_ok());
    }

    #[test]
    fn test_rejected_order_never_reaches_the_book() {
        let ex = exchange(ExchangeConfig::fee_free());
        let t = ex.register_trader("A", TraderKind::Retail, AccountTier::Basic, Money::ZERO).unwrap();

        let err = rejection(ex.submit_order(Order::bid(t, "IBM", Price::from_cents(100), 1, 1), 1));
        assert!(matches!(err, AdmissionError::InsufficientBalance { .. }));
        assert_eq!(ex.with_book("IBM", |b| b.is_empty()), Some(true));
        assert!(ex.trades().is_empty());
    }

    #[test]
    fn test_resting_asks_reserve_shares() {
        let ex = exchange(ExchangeConfig::fee_free());
        let seller = ex.register_trader("S", TraderKind::Retail, AccountTier::Basic, Money::ZERO).unwrap();
        let buyer = ex
            .register_trader("B", TraderKind::Retail, AccountTier::Basic, Money::from_cents(10_000))
            .unwrap();
        ex.add_position(seller, "IBM", 10).unwrap();

        ex.submit_order(Order::ask(seller, "IBM", Price::from_cents(100), 10, 1), 1)
            .unwrap();
        let err = rejection(ex.submit_order(Order::ask(seller, "IBM", Price::from_cents(100), 10, 2), 2));
        assert_eq!(
            err,
            AdmissionError::InsufficientPosition {
                trader: seller,
                held: 0,
                quantity: 10
            }
        );
        assert_eq!(ex.with_book("IBM", |b| b.asks().total_quantity()), Some(10));

        let trades = ex
            .submit_order(Order::bid(buyer, "IBM", Price::from_cents(100), 20, 3), 3)
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert!(trades[0].is_settled());

        let logged: u64 = ex.trades().iter().map(|t| t.quantity).sum();
        assert_eq!(logged, 10);
        assert_eq!(ex.ledger().position(buyer, "IBM"), Some(logged));
        assert_eq!(ex.ledger().position(seller, "IBM"), Some(0));
        assert_eq!(ex.ledger().balance(buyer), Some(Money::from_cents(9_000)));
        assert_eq!(ex.with_book("IBM", |b| b.bids().total_quantity()), Some(10));
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let config = ExchangeConfig::fee_free().with_lot_size(0);
        assert!(matches!(
            Exchange::new(config, Arc::new(NoOpEventHandler)),
            Err(ConfigError::ZeroLotSize)
        ));
    }

    #[test]
    fn test_listing_opens_a_book() {
        let ex = exchange(ExchangeConfig::fee_free());
        assert_eq!(ex.engine().tickers(), vec!["IBM".to_string()]);
        assert!(matches!(
            ex.list_security(Security::new("IBM", "again")),
            Err(ConfigError::DuplicateTicker { .. })
        ));
    }
}
