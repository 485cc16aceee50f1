// ============================================================================
// Price/Time Priority Matching Algorithm (FIFO)
// ============================================================================

use crate::domain::{Order, OrderBookSide, OrderOutcome, Trade};
use crate::numeric::Timestamp;

/// Price/Time priority (FIFO) matching.
///
/// The incoming order walks the side from the best price outwards. At each
/// level resting orders are consumed oldest first, each fill executing at the
/// resting order's price. Matching stops as soon as the incoming order is
/// filled, the side is exhausted, or the best resting price no longer
/// crosses.
///
/// # Example
/// ```text
/// Asks:  90 x 4 (t=1)
///        90 x 4 (t=2)
///
/// Incoming: Bid 6 @ 90
/// Result: 4 @ 90 against t=1 (removed), 2 @ 90 against t=2 (2 left resting)
/// ```
impl OrderBookSide {
    /// Match an incoming opposite-side order against this side.
    ///
    /// # Panics
    /// Panics if `incoming` has no remaining quantity or is on the same side
    /// as this book side.
    pub fn match_order(&mut self, mut incoming: Order, time: Timestamp) -> OrderOutcome {
        assert!(
            incoming.remaining() > 0,
            "incoming order {} has no remaining quantity",
            incoming.id.as_uuid()
        );
        assert_ne!(
            incoming.side,
            self.side(),
            "crossing test evaluated on same-side orders"
        );

        let mut trades = Vec::new();

        while incoming.remaining() > 0 {
            let (level_price, level) = match self.best_level_mut() {
                Some(best) => best,
                None => break,
            };

            if !incoming.side.crosses(incoming.price, level_price) {
                break;
            }

            let mut removed = 0;
            while incoming.remaining() > 0 {
                let resting = match level.front_mut() {
                    Some(resting) => resting,
                    None => break,
                };
                debug_assert!(resting.remaining() > 0, "spent order left resting");

                let fill = incoming.remaining().min(resting.remaining());
                let trade = Trade::execute(resting, &incoming, fill, time);

                resting.fill(fill);
                incoming.fill(fill);

                tracing::debug!(
                    security = %trade.security,
                    buyer = %trade.buyer,
                    seller = %trade.seller,
                    price = %trade.price,
                    quantity = fill,
                    "trade executed"
                );
                trades.push(trade);

                if resting.is_filled() {
                    level.pop_front();
                    removed += 1;
                }
            }

            for _ in 0..removed {
                self.note_removed();
            }
            self.remove_empty_level(level_price);
        }

        OrderOutcome::new(trades, incoming)
    }
}
