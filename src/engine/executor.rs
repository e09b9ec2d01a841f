//! Trade execution: applying one fill to both parties.
//!
//! ## Monetary Legs
//!
//! The seller is paid `exec_price * qty`. The buyer's funds were pre-locked
//! at their own limit at admission; when the limit exceeds the execution
//! price, the difference returns to the buyer's free balance and the rest
//! of the pre-lock is consumed. Execution never debits the buyer again.
//!
//! ## Token Delivery
//!
//! Reserved inventory transfers first. Any remainder is a short sale: the
//! buyer receives minted tokens and the seller receives the paired
//! complement tokens, one for one. The collateral behind the mint stays
//! locked until settlement; finding less collateral than the mint requires
//! is a ledger inconsistency and aborts the fill.
//!
//! The executor does not touch order status; that belongs to the matching
//! engine.

use rust_decimal::Decimal;
use tracing::trace;

use crate::error::ExchangeError;
use crate::ledger::Txn;
use crate::types::price;
use crate::types::Order;

/// Apply one fill of `qty` tokens at `exec_price` to buyer and seller.
pub fn apply_fill(
    txn: &mut Txn<'_>,
    buy: &Order,
    sell: &Order,
    qty: u64,
    exec_price: Decimal,
) -> Result<(), ExchangeError> {
    let outcome = sell.outcome;

    // Seller payment
    let proceeds = price::notional(exec_price, qty);
    txn.account_mut(&sell.user_id, &sell.chain_id).available_usd += proceeds;

    // Buyer price-improvement refund out of the pre-lock
    if buy.price > exec_price {
        let refund = price::notional(buy.price - exec_price, qty);
        txn.account_mut(&buy.user_id, &buy.chain_id).available_usd += refund;
    }

    // Token delivery, reserved inventory first
    let seller = txn
        .account_mut(&sell.user_id, &sell.chain_id)
        .position_mut(sell.market_id);
    let from_inventory = qty.min(seller.locked_tokens(outcome));
    let minted = qty - from_inventory;

    if minted > 0 && seller.locked_collateral(outcome) < price::collateral(minted) {
        return Err(ExchangeError::LedgerInconsistency(format!(
            "short sale of {minted} {} in market {} by {}:{} exceeds locked collateral {}",
            outcome.as_str(),
            sell.market_id,
            sell.user_id,
            sell.chain_id,
            seller.locked_collateral(outcome),
        )));
    }

    *seller.locked_tokens_mut(outcome) -= from_inventory;
    if minted > 0 {
        // Collateral stays locked until settlement; the seller's exposure
        // is carried by the paired complement tokens.
        *seller.tokens_mut(outcome.complement()) += minted;
    }

    let buyer = txn
        .account_mut(&buy.user_id, &buy.chain_id)
        .position_mut(buy.market_id);
    *buyer.tokens_mut(outcome) += qty;

    trace!(
        market_id = sell.market_id,
        buy_order = buy.id,
        sell_order = sell.id,
        outcome = outcome.as_str(),
        price = %exec_price,
        qty,
        minted,
        "fill applied"
    );
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::types::{MarketId, Outcome, Side};
    use rust_decimal_macros::dec;

    fn setup() -> (Ledger, MarketId) {
        let ledger = Ledger::new();
        let mut txn = ledger.begin();
        let market = txn.insert_market("q".into(), "x".into(), 0);
        txn.commit();
        (ledger, market.id)
    }

    fn orders(
        txn: &mut Txn<'_>,
        market_id: MarketId,
        buy_price: Decimal,
        sell_price: Decimal,
        qty: u64,
    ) -> (Order, Order) {
        let buy = txn.insert_order(
            market_id,
            "buyer".into(),
            "solana".into(),
            Side::Buy,
            Outcome::Yes,
            buy_price,
            qty,
            0,
        );
        let sell = txn.insert_order(
            market_id,
            "seller".into(),
            "solana".into(),
            Side::Sell,
            Outcome::Yes,
            sell_price,
            qty,
            0,
        );
        (buy, sell)
    }

    #[test]
    fn test_fill_from_locked_inventory() {
        let (ledger, market_id) = setup();
        let mut txn = ledger.begin();
        txn.account_mut("seller", "solana").position_mut(market_id).locked_yes_tokens = 10;
        let (buy, sell) = orders(&mut txn, market_id, dec!(0.50), dec!(0.50), 10);

        apply_fill(&mut txn, &buy, &sell, 10, dec!(0.50)).unwrap();
        txn.commit();

        let seller = ledger.account("seller", "solana").unwrap();
        assert_eq!(seller.available_usd, dec!(5.00));
        let seller_pos = seller.position(market_id).unwrap();
        assert_eq!(seller_pos.locked_yes_tokens, 0);
        assert_eq!(seller_pos.no_tokens, 0);

        let buyer_pos = ledger.account("buyer", "solana").unwrap().position(market_id).cloned().unwrap();
        assert_eq!(buyer_pos.yes_tokens, 10);
    }

    #[test]
    fn test_short_sale_mints_paired_tokens() {
        let (ledger, market_id) = setup();
        let mut txn = ledger.begin();
        txn.account_mut("seller", "solana").position_mut(market_id).locked_collateral_yes = dec!(10);
        let (buy, sell) = orders(&mut txn, market_id, dec!(0.50), dec!(0.50), 10);

        apply_fill(&mut txn, &buy, &sell, 10, dec!(0.50)).unwrap();
        txn.commit();

        let seller = ledger.account("seller", "solana").unwrap();
        let seller_pos = seller.position(market_id).unwrap();
        // Collateral survives the fill; the seller holds the complement
        assert_eq!(seller_pos.locked_collateral_yes, dec!(10));
        assert_eq!(seller_pos.no_tokens, 10);

        let buyer_pos = ledger.account("buyer", "solana").unwrap().position(market_id).cloned().unwrap();
        assert_eq!(buyer_pos.yes_tokens, 10);
    }

    #[test]
    fn test_mixed_inventory_and_mint() {
        let (ledger, market_id) = setup();
        let mut txn = ledger.begin();
        {
            let pos = txn.account_mut("seller", "solana").position_mut(market_id);
            pos.locked_yes_tokens = 4;
            pos.locked_collateral_yes = dec!(6);
        }
        let (buy, sell) = orders(&mut txn, market_id, dec!(0.50), dec!(0.50), 10);

        apply_fill(&mut txn, &buy, &sell, 10, dec!(0.50)).unwrap();
        txn.commit();

        let seller_pos =
            ledger.account("seller", "solana").unwrap().position(market_id).cloned().unwrap();
        assert_eq!(seller_pos.locked_yes_tokens, 0);
        assert_eq!(seller_pos.no_tokens, 6);
        assert_eq!(seller_pos.locked_collateral_yes, dec!(6));

        let buyer_pos = ledger.account("buyer", "solana").unwrap().position(market_id).cloned().unwrap();
        assert_eq!(buyer_pos.yes_tokens, 10);
    }

    #[test]
    fn test_price_improvement_refund() {
        let (ledger, market_id) = setup();
        let mut txn = ledger.begin();
        txn.account_mut("seller", "solana").position_mut(market_id).locked_collateral_yes = dec!(10);
        let (buy, sell) = orders(&mut txn, market_id, dec!(0.60), dec!(0.50), 10);

        apply_fill(&mut txn, &buy, &sell, 10, dec!(0.50)).unwrap();
        txn.commit();

        // (0.60 - 0.50) * 10 returns to the buyer's free balance
        assert_eq!(ledger.account("buyer", "solana").unwrap().available_usd, dec!(1.00));
        assert_eq!(ledger.account("seller", "solana").unwrap().available_usd, dec!(5.00));
    }

    #[test]
    fn test_missing_collateral_is_inconsistency() {
        let (ledger, market_id) = setup();
        let mut txn = ledger.begin();
        txn.account_mut("seller", "solana").position_mut(market_id).locked_collateral_yes = dec!(3);
        let (buy, sell) = orders(&mut txn, market_id, dec!(0.50), dec!(0.50), 10);

        let err = apply_fill(&mut txn, &buy, &sell, 10, dec!(0.50)).unwrap_err();
        drop(txn);

        assert!(matches!(err, ExchangeError::LedgerInconsistency(_)));
        // Aborted transaction left no partial effect
        assert!(ledger.account("buyer", "solana").is_none());
        assert!(ledger.account("seller", "solana").is_none());
        assert!(ledger.open_orders(market_id).is_empty());
    }
}
