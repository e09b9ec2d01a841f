//! Matching engine: price-time priority over the resting book.
//!
//! ## Matching Rules
//!
//! - The newly admitted order is the taker; OPEN/PARTIAL orders with the
//!   same market and token type on the opposite side are the makers.
//! - YES and NO are separate books within a market and never cross.
//! - A BUY taker walks asks priced at or below its limit, cheapest first;
//!   a SELL taker walks bids priced at or above its limit, highest first;
//!   ties go to the earliest admission.
//! - A user's own orders are excluded, so self-matching is impossible.
//! - Fills settle at the sell order's limit price; the crossing bid's
//!   surplus returns to the buyer as a refund out of its pre-lock.
//!
//! ## Transaction Granularity
//!
//! Each fill runs in its own ledger transaction: balance mutations, both
//! orders' fill counters and statuses, and the trade record commit
//! together. A [`ExchangeError::LedgerInconsistency`] from the executor
//! aborts only the current fill; earlier fills stay committed, the taker
//! keeps whatever partial state it reached, and the incident is logged for
//! reconciliation.

use tracing::{error, warn};

use crate::engine::executor;
use crate::error::ExchangeError;
use crate::ledger::Ledger;
use crate::types::{Order, OrderId, OrderStatus, Side, Trade};

/// Result of one matching pass.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The taker order as persisted after the pass
    pub taker: Order,
    /// Trades produced, in execution order
    pub trades: Vec<Trade>,
}

impl MatchResult {
    /// Whether the taker was completely filled.
    pub fn fully_filled(&self) -> bool {
        self.taker.status == OrderStatus::Filled
    }
}

/// Run the matching loop with the committed order `taker_id` as the taker.
///
/// Returns the taker's persisted final state and the trades produced.
pub fn run(ledger: &Ledger, taker_id: OrderId, now: u64) -> Result<MatchResult, ExchangeError> {
    let mut trades = Vec::new();

    loop {
        let mut txn = ledger.begin();
        let mut taker = txn
            .order(taker_id)
            .cloned()
            .ok_or(ExchangeError::LedgerInconsistency(format!(
                "taker order {taker_id} vanished during matching"
            )))?;

        if taker.remaining() == 0 {
            break;
        }
        let Some(mut maker) = txn.best_opposing(&taker) else {
            // Nothing crosses; the taker rests as OPEN or PARTIAL
            break;
        };

        if maker.remaining() == 0 {
            // A resting order with nothing left is a bookkeeping anomaly;
            // retire it and keep walking the book.
            warn!(order_id = maker.id, market_id = maker.market_id, "resting order had zero remainder");
            maker.status = OrderStatus::Filled;
            txn.update_order(maker);
            txn.commit();
            continue;
        }

        let fill_qty = taker.remaining().min(maker.remaining());
        // Fills settle at the ask
        let exec_price = match taker.side {
            Side::Buy => maker.price,
            Side::Sell => taker.price,
        };
        let (buy, sell) = match taker.side {
            Side::Buy => (&taker, &maker),
            Side::Sell => (&maker, &taker),
        };

        match executor::apply_fill(&mut txn, buy, sell, fill_qty, exec_price) {
            Ok(()) => {
                let trade = txn.insert_trade(
                    taker.market_id,
                    buy.id,
                    sell.id,
                    taker.outcome,
                    exec_price,
                    fill_qty,
                    now,
                );
                taker.fill(fill_qty);
                maker.fill(fill_qty);
                txn.update_order(taker);
                txn.update_order(maker);
                txn.commit();
                trades.push(trade);
            }
            Err(err) => {
                error!(
                    error = %err,
                    taker_order = taker.id,
                    maker_order = maker.id,
                    market_id = taker.market_id,
                    "fill aborted; matching terminated for reconciliation"
                );
                drop(txn);
                break;
            }
        }
    }

    let taker = ledger.order(taker_id).ok_or(ExchangeError::LedgerInconsistency(format!(
        "taker order {taker_id} missing after matching"
    )))?;
    Ok(MatchResult { taker, trades })
}

// ============================================================================
// Unit Tests
// ============================================================================
