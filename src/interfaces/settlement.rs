// ============================================================================
// Settlement Interface
// Contract between the matching engine and the ledger
// ============================================================================

use crate::domain::Trade;
use crate::error::SettlementError;

/// Downstream consumer of trades.
///
/// The engine hands every trade to `settle` right after matching. The
/// implementation fixes the trade's fees (once) and applies balances and
/// positions. A failure is reported but never changes what matched.
pub trait Settlement: Send + Sync {
    fn settle(&self, trade: &mut Trade) -> Result<(), SettlementError>;
}

/// Settlement that leaves trades unsettled (zero fees, no ledger).
pub struct NoSettlement;

impl Settlement for NoSettlement {
    fn settle(&self, _trade: &mut Trade) -> Result<(), SettlementError> {
        Ok(())
    }
}
