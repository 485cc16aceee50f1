// ============================================================================
// Accounts Ledger
// Balances, positions and fee collection; settles trades
// ============================================================================

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::domain::{Account, AccountTier, FeeSchedule, Trade, Trader, TraderId, TraderKind};
use crate::error::SettlementError;
use crate::interfaces::Settlement;
use crate::numeric::{Money, NumericError, NumericResult, Quantity};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: BTreeMap<TraderId, Account>,
    fees_collected: Money,
}

/// Registry of trader accounts.
///
/// All accounts and the fee total sit behind one lock so a trade is applied
/// to both counterparties at once or not at all.
#[derive(Debug)]
pub struct AccountsLedger {
    state: RwLock<LedgerState>,
    fee_schedule: FeeSchedule,
}

impl AccountsLedger {
    pub fn new(fee_schedule: FeeSchedule) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            fee_schedule,
        }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    /// Opens an account; ids are handed out sequentially from 1.
    ///
    /// # Errors
    /// Returns `Overflow` once the id space is exhausted.
    pub fn register(
        &self,
        name: impl Into<String>,
        kind: TraderKind,
        tier: AccountTier,
        initial_balance: Money,
    ) -> NumericResult<TraderId> {
        let mut state = self.state.write();
        let id = next_trader_id(state.accounts.len())?;
        let trader = Trader {
            id,
            name: name.into(),
            kind,
        };
        tracing::debug!(trader = %id, ?kind, ?tier, balance = %initial_balance, "account registered");
        state
            .accounts
            .insert(id, Account::new(trader, tier, initial_balance));
        Ok(id)
    }

    pub fn trader_by_id(&self, id: TraderId) -> Option<Trader> {
        self.state.read().accounts.get(&id).map(|acc| acc.trader.clone())
    }

    pub fn contains(&self, id: TraderId) -> bool {
        self.state.read().accounts.contains_key(&id)
    }

    /// Copy of the account as it is now.
    pub fn account(&self, id: TraderId) -> Option<Account> {
        self.state.read().accounts.get(&id).cloned()
    }

    pub fn balance(&self, id: TraderId) -> Option<Money> {
        self.state.read().accounts.get(&id).map(Account::balance)
    }

    pub fn position(&self, id: TraderId, ticker: &str) -> Option<Quantity> {
        self.state.read().accounts.get(&id).map(|acc| acc.position(ticker))
    }

    /// Credits shares to an account (initial positions).
    pub fn add_to_position(
        &self,
        id: TraderId,
        ticker: &str,
        quantity: Quantity,
    ) -> Result<(), SettlementError> {
        let mut state = self.state.write();
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(SettlementError::UnknownTrader { trader: id })?;
        account.add_to_position(ticker, quantity);
        Ok(())
    }

    pub fn fees_collected(&self) -> Money {
        self.state.read().fees_collected
    }

    /// All accounts in id order.
    pub fn accounts(&self) -> Vec<Account> {
        self.state.read().accounts.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().accounts.is_empty()
    }
}

/// Id of the account registered after `count` existing ones.
fn next_trader_id(count: usize) -> NumericResult<TraderId> {
    u32::try_from(count)
        .ok()
        .and_then(|n| n.checked_add(1))
        .map(TraderId)
        .ok_or(NumericError::Overflow)
}

impl Default for AccountsLedger {
    fn default() -> Self {
        Self::new(FeeSchedule::standard())
    }
}

impl Settlement for AccountsLedger {
    /// Buyer pays value plus fee and receives the shares; seller receives
    /// value minus fee and delivers the shares.
    fn settle(&self, trade: &mut Trade) -> Result<(), SettlementError> {
        if trade.is_settled() {
            return Err(SettlementError::FeesAlreadySet { trade: trade.id });
        }

        let value = trade.value()?;
        let mut state = self.state.write();

        // Stage both accounts so nothing is written unless every step succeeds.
        // A self-trade stages one account that plays both roles.
        let mut staged: BTreeMap<TraderId, Account> = BTreeMap::new();
        for id in [trade.buyer, trade.seller] {
            let account = state
                .accounts
                .get(&id)
                .ok_or(SettlementError::UnknownTrader { trader: id })?;
            staged.entry(id).or_insert_with(|| account.clone());
        }

        let buyer_fee = {
            let buyer = &staged[&trade.buyer];
            self.fee_schedule.fee(buyer.tier, buyer.trader.kind, value)?
        };
        let seller_fee = {
            let seller = &staged[&trade.seller];
            self.fee_schedule.fee(seller.tier, seller.trader.kind, value)?
        };

        if let Some(buyer) = staged.get_mut(&trade.buyer) {
            buyer.apply_fee(buyer_fee)?;
            buyer.withdraw_money(value)?;
            buyer.add_to_position(&trade.security, trade.quantity);
        }
        if let Some(seller) = staged.get_mut(&trade.seller) {
            seller.apply_fee(seller_fee)?;
            seller.add_money(value)?;
            seller
                .deduct_from_position(&trade.security, trade.quantity)
                .map_err(|held| SettlementError::PositionUnderflow {
                    trader: trade.seller,
                    held,
                    quantity: trade.quantity,
                })?;
        }

        let fees_collected = state
            .fees_collected
            .checked_add(buyer_fee)?
            .checked_add(seller_fee)?;

        trade.set_fees(buyer_fee, seller_fee)?;
        state.accounts.extend(staged);
        state.fees_collected = fees_collected;

        tracing::debug!(
            trade = %trade.id,
            buyer_fee = %buyer_fee,
            seller_fee = %seller_fee,
            "trade settled"
        );
        Ok(())
    }
}
