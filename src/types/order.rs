//! Order types for the exchange.
//!
//! ## Price-Time Priority
//!
//! Orders carry an admission sequence number assigned by the ledger at
//! insert. Within a market all admissions are serialized, so the sequence
//! number is a total order of arrival and serves as the time-priority
//! tie-breaker.
//!
//! ## Quantities
//!
//! Quantities are integer share counts (`u64`); there are no fractional
//! tokens. Prices use [`rust_decimal::Decimal`] and lie in `[0, 1]`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MarketId, Outcome};

/// Unique identifier for an order (assigned by the ledger).
pub type OrderId = u64;

/// User identifier: the wallet address on the user's home chain.
pub type UserId = String;

/// Chain identifier (e.g. `"solana"`, `"cosmoshub-4"`).
pub type ChainId = String;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid) - wants to purchase outcome tokens
    #[default]
    Buy,
    /// Sell order (ask) - wants to sell outcome tokens, shorting if needed
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire form used in the canonical signed message.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Lifecycle status of an order.
///
/// Admission inserts orders as `Open`. The matching engine moves them
/// through `Partial` to `Filled`; settlement moves any still-resting order
/// to `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Open,
    Partial,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Whether an order in this status rests on the book and can match.
    pub fn is_resting(self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::Partial)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order for one token type of one market.
///
/// ## Example
///
/// ```
/// use predex::types::{Order, Outcome, Side};
/// use rust_decimal::Decimal;
///
/// let order = Order::new(
///     1,                           // id
///     42,                          // market_id
///     "9yQ1wallet".to_string(),    // user_id
///     "solana".to_string(),        // chain_id
///     Side::Buy,
///     Outcome::Yes,
///     Decimal::new(55, 2),         // 0.55
///     10,                          // quantity
///     1703577600000,               // created_at (ms)
///     1,                           // seq
/// );
/// assert_eq!(order.remaining(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,

    /// Market this order trades in
    pub market_id: MarketId,

    /// Owner's wallet address
    pub user_id: UserId,

    /// Chain the owner's ledger entry lives on
    pub chain_id: ChainId,

    /// Buy or Sell
    pub side: Side,

    /// Token type; YES and NO books never cross
    pub outcome: Outcome,

    /// Limit price in [0, 1]
    pub price: Decimal,

    /// Total quantity (positive integer share count)
    pub quantity: u64,

    /// Filled quantity, `0 ..= quantity`
    pub filled: u64,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Unix timestamp in milliseconds at admission
    pub created_at: u64,

    /// Admission sequence number; time-priority tie-breaker
    pub seq: u64,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        market_id: MarketId,
        user_id: UserId,
        chain_id: ChainId,
        side: Side,
        outcome: Outcome,
        price: Decimal,
        quantity: u64,
        created_at: u64,
        seq: u64,
    ) -> Self {
        Self {
            id,
            market_id,
            user_id,
            chain_id,
            side,
            outcome,
            price,
            quantity,
            filled: 0,
            status: OrderStatus::Open,
            created_at,
            seq,
        }
    }

    /// Unfilled remainder.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled)
    }

    /// Whether this order still rests on the book.
    #[inline]
    pub fn is_resting(&self) -> bool {
        self.status.is_resting()
    }

    /// Record a fill and advance the status.
    ///
    /// Caps at the remaining quantity and returns the amount actually
    /// applied.
    pub fn fill(&mut self, qty: u64) -> u64 {
        let applied = qty.min(self.remaining());
        self.filled += applied;
        self.status = if self.remaining() == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        applied
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
