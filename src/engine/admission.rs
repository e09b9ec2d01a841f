//! Order admission: validation, asset locking, OPEN insert.
//!
//! ## Locking Rules
//!
//! | Side | Token | Action |
//! |------|-------|--------|
//! | BUY  | any   | `available_usd -= price * quantity` (the pre-lock) |
//! | SELL | t     | move `min(quantity, owned)` from free to locked inventory; any shortfall locks one unit of collateral per token |
//!
//! A lock that cannot be satisfied aborts the transaction; no order record
//! is created. The pre-locked BUY funds live implicitly in the deduction;
//! they return to the buyer via execution refunds or settlement
//! cancellation at the order's own limit price.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExchangeError;
use crate::ledger::Txn;
use crate::types::price;
use crate::types::{ChainId, MarketId, Order, Outcome, Side, UserId};

/// Parameters of an order that passed signature verification.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub market_id: MarketId,
    pub user_id: UserId,
    pub chain_id: ChainId,
    pub side: Side,
    pub outcome: Outcome,
    pub price: Decimal,
    pub quantity: u64,
}

/// Admit a new limit order inside `txn`.
///
/// Validates parameters, rejects settled markets, locks assets per the
/// table above, and stages the order in OPEN state. The caller commits the
/// transaction and then runs the matching engine with this order as the
/// taker.
pub fn admit(txn: &mut Txn<'_>, new_order: &NewOrder, now: u64) -> Result<Order, ExchangeError> {
    if new_order.quantity == 0 {
        return Err(ExchangeError::InvalidQuantity);
    }
    price::validate_price(new_order.price)?;

    let market = txn.market(new_order.market_id)?;
    if market.settled {
        return Err(ExchangeError::MarketClosed(market.id));
    }

    lock_assets(txn, new_order)?;

    let order = txn.insert_order(
        new_order.market_id,
        new_order.user_id.clone(),
        new_order.chain_id.clone(),
        new_order.side,
        new_order.outcome,
        new_order.price,
        new_order.quantity,
        now,
    );
    debug!(
        order_id = order.id,
        market_id = order.market_id,
        user_id = %order.user_id,
        side = order.side.as_str(),
        outcome = order.outcome.as_str(),
        price = %order.price,
        quantity = order.quantity,
        "order admitted"
    );
    Ok(order)
}

fn lock_assets(txn: &mut Txn<'_>, new_order: &NewOrder) -> Result<(), ExchangeError> {
    let account = txn.account_mut(&new_order.user_id, &new_order.chain_id);

    match new_order.side {
        Side::Buy => {
            let cost = price::notional(new_order.price, new_order.quantity);
            if account.available_usd < cost {
                return Err(ExchangeError::InsufficientFunds {
                    required: cost,
                    available: account.available_usd,
                });
            }
            account.available_usd -= cost;
            // Zero position record on first reference within the market
            account.position_mut(new_order.market_id);
        }
        Side::Sell => {
            let owned = account.position_mut(new_order.market_id).tokens(new_order.outcome);
            let from_inventory = new_order.quantity.min(owned);
            let shortfall = new_order.quantity - from_inventory;
            let required = price::collateral(shortfall);

            if account.available_usd < required {
                return Err(ExchangeError::InsufficientFunds {
                    required,
                    available: account.available_usd,
                });
            }
            account.available_usd -= required;

            let position = account.position_mut(new_order.market_id);
            let free = position.tokens_mut(new_order.outcome);
            *free = free.checked_sub(from_inventory).ok_or(
                ExchangeError::InsufficientTokens { required: from_inventory, available: owned },
            )?;
            *position.locked_tokens_mut(new_order.outcome) += from_inventory;
            *position.locked_collateral_mut(new_order.outcome) += required;
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
