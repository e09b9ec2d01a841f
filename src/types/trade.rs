//! Trade type representing an executed match between two orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MarketId, Outcome, OrderId};

/// Unique identifier for a trade (assigned by the ledger).
pub type TradeId = u64;

/// A single fill between a buy order and a sell order.
///
/// Created by the trade executor; immutable thereafter. The token type is
/// explicit on every record even though both orders carry it too.
///
/// ## Price
///
/// Fills settle at the sell order's limit price; a crossing bid's surplus
/// is refunded to the buyer at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier
    pub id: TradeId,

    /// Market the trade occurred in
    pub market_id: MarketId,

    /// The buy side order
    pub buy_order_id: OrderId,

    /// The sell side order
    pub sell_order_id: OrderId,

    /// Token type traded
    pub outcome: Outcome,

    /// Execution price in [0, 1]
    pub price: Decimal,

    /// Executed quantity (integer share count)
    pub quantity: u64,

    /// Execution timestamp in milliseconds
    pub executed_at: u64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TradeId,
        market_id: MarketId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        outcome: Outcome,
        price: Decimal,
        quantity: u64,
        executed_at: u64,
    ) -> Self {
        Self {
            id,
            market_id,
            buy_order_id,
            sell_order_id,
            outcome,
            price,
            quantity,
            executed_at,
        }
    }

    /// Notional value of this trade (`price * quantity`).
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
