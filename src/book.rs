//! Price-level aggregated book snapshots.
//!
//! ## Price Ordering
//!
//! - **Bids** (buy orders): sorted high-to-low (best bid = highest price)
//! - **Asks** (sell orders): sorted low-to-high (best ask = lowest price)
//!
//! The snapshot is derived from committed OPEN/PARTIAL orders of one
//! market and token type; it aggregates unfilled remainders per price
//! level and carries best bid, best ask, and spread. Orders of the same
//! user may rest on both sides (they never match each other), so a
//! crossed or zero spread is reported as `None` just like an empty side.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{MarketId, Order, Outcome, Side};

/// Aggregated unfilled quantity at one price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub quantity: u64,
}

/// Depth snapshot of one market's YES or NO book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthSnapshot {
    pub market_id: MarketId,
    pub outcome: Outcome,
    /// Best price first (highest bid)
    pub bids: Vec<BookLevel>,
    /// Best price first (lowest ask)
    pub asks: Vec<BookLevel>,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub spread: Option<Decimal>,
}

/// Build the depth snapshot for one token type from resting orders.
pub fn depth(orders: &[Order], market_id: MarketId, outcome: Outcome) -> DepthSnapshot {
    let mut bids: BTreeMap<Reverse<Decimal>, u64> = BTreeMap::new();
    let mut asks: BTreeMap<Decimal, u64> = BTreeMap::new();

    for order in orders {
        if order.market_id != market_id || order.outcome != outcome || !order.is_resting() {
            continue;
        }
        match order.side {
            Side::Buy => *bids.entry(Reverse(order.price)).or_default() += order.remaining(),
            Side::Sell => *asks.entry(order.price).or_default() += order.remaining(),
        }
    }

    let best_bid = bids.keys().next().map(|r| r.0);
    let best_ask = asks.keys().next().copied();
    let spread = match (best_bid, best_ask) {
        (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
        _ => None,
    };

    DepthSnapshot {
        market_id,
        outcome,
        bids: bids
            .into_iter()
            .map(|(Reverse(price), quantity)| BookLevel { price, quantity })
            .collect(),
        asks: asks
            .into_iter()
            .map(|(price, quantity)| BookLevel { price, quantity })
            .collect(),
        best_bid,
        best_ask,
        spread,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
