//! Market settlement: the terminal transition at a known outcome.
//!
//! ## Phases (one transaction)
//!
//! 1. Cancel every OPEN/PARTIAL order.
//! 2. Refund unfilled BUY pre-locks at each order's own limit price.
//! 3. Release reserved seller inventory to the free side, and release the
//!    share of locked collateral that never backed a mint (the unfilled
//!    short remainder beyond the released inventory).
//! 4. Redeem winning tokens at one unit each. The retained collateral
//!    (exactly one unit per minted pair) is consumed funding those
//!    redemptions, whichever side won: each mint created one YES and one
//!    NO, and exactly one of the two redeems. A shorter whose complement
//!    side won is paid through the redemption of the complement tokens,
//!    which equals the collateral that backed the mint; crediting the
//!    collateral on top would pay the same obligation twice and break
//!    monetary conservation.
//! 5. Zero every position and mark the market settled.
//!
//! Settlement is idempotent: a second call fails `AlreadySettled` with no
//! side effects. Any error rolls the whole transaction back and leaves the
//! market unsettled.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::ExchangeError;
use crate::ledger::{AccountKey, Ledger};
use crate::types::price;
use crate::types::{MarketId, Outcome, OrderStatus, SettlementReport, Side};

/// Settle `market_id` at `outcome`.
///
/// The caller must hold the market's writer guard.
pub fn settle(
    ledger: &Ledger,
    market_id: MarketId,
    outcome: Outcome,
    now: u64,
) -> Result<SettlementReport, ExchangeError> {
    let mut txn = ledger.begin();

    if txn.market(market_id)?.settled {
        return Err(ExchangeError::AlreadySettled(market_id));
    }

    // Phase 1 + 2: cancel resting orders, refund BUY pre-locks, and tally
    // unfilled SELL remainders per (account, token type) for phase 3.
    let mut orders_cancelled = 0u64;
    let mut buy_refunds = Decimal::ZERO;
    let mut unfilled_sells: HashMap<(AccountKey, Outcome), u64> = HashMap::new();

    for mut order in txn.open_orders(market_id) {
        let unfilled = order.remaining();
        order.status = OrderStatus::Cancelled;
        orders_cancelled += 1;

        match order.side {
            Side::Buy => {
                let refund = price::notional(order.price, unfilled);
                txn.account_mut(&order.user_id, &order.chain_id).available_usd += refund;
                buy_refunds += refund;
            }
            Side::Sell => {
                let key = ((order.user_id.clone(), order.chain_id.clone()), order.outcome);
                *unfilled_sells.entry(key).or_default() += unfilled;
            }
        }
        txn.update_order(order);
    }

    // Phase 3 + 4 + 5, per position.
    let mut winnings_paid = Decimal::ZERO;
    let mut collateral_returned = Decimal::ZERO;
    let mut collateral_forfeited = Decimal::ZERO;
    let mut payout_lines: Vec<String> = Vec::new();

    for key in txn.accounts_with_position(market_id) {
        let account = txn.account_mut(&key.0, &key.1);
        let mut credit = Decimal::ZERO;

        {
            let position = account.position_mut(market_id);

            for token in [Outcome::Yes, Outcome::No] {
                // Reserved inventory backs orders that no longer exist
                let reserved = position.locked_tokens(token);
                *position.tokens_mut(token) += reserved;
                *position.locked_tokens_mut(token) = 0;

                // Collateral beyond the released inventory never minted
                let unfilled = unfilled_sells.get(&(key.clone(), token)).copied().unwrap_or(0);
                let unused = unfilled.saturating_sub(reserved);
                if unused > 0 {
                    let release =
                        price::collateral(unused).min(position.locked_collateral(token));
                    *position.locked_collateral_mut(token) -= release;
                    credit += release;
                    collateral_returned += release;
                }
            }

            // Winning tokens redeem at one unit each
            let redemption = Decimal::from(position.tokens(outcome));
            credit += redemption;
            winnings_paid += redemption;

            // The retained collateral funds the redemptions: one unit per
            // minted pair, of which exactly the winning half pays out.
            collateral_forfeited +=
                position.locked_collateral_yes + position.locked_collateral_no;

            position.clear();
        }

        account.available_usd += credit;
        payout_lines.push(format!("{}:{}:{}", key.0, key.1, credit));
    }

    // Each minted pair locked one unit of collateral and produced exactly
    // one winning token, so the two totals must agree.
    if winnings_paid != collateral_forfeited {
        return Err(ExchangeError::LedgerInconsistency(format!(
            "settlement of market {market_id} pays {winnings_paid} against {collateral_forfeited} retained collateral"
        )));
    }

    let market = txn.market_mut(market_id)?;
    market.outcome = Some(outcome);
    market.settled = true;

    let report = SettlementReport {
        market_id,
        outcome,
        orders_cancelled,
        buy_refunds,
        winnings_paid,
        collateral_returned,
        collateral_forfeited,
        payout_digest: SettlementReport::digest_payouts(&mut payout_lines),
        settled_at: now,
    };
    txn.commit();

    info!(
        market_id,
        outcome = outcome.as_str(),
        orders_cancelled,
        winnings = %report.winnings_paid,
        forfeited = %report.collateral_forfeited,
        digest = %report.digest_hex(),
        "market settled"
    );
    Ok(report)
}

// ============================================================================
// Unit Tests
// ============================================================================
