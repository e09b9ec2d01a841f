//! Entity store backing the ledger.
//!
//! ## Storage Layout
//!
//! - **Orders**: `Slab` storage with an order-id index for O(1) lookup.
//!   Slab keys are internal; callers address orders by [`OrderId`] only.
//! - **Markets / Accounts**: hash maps keyed by id and (user, chain).
//! - **Trades / Deposits**: append-only logs. Neither record is ever
//!   mutated after insert.
//!
//! The store itself is not synchronized; [`crate::ledger::Ledger`] wraps it
//! in a lock and hands out transactions.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slab::Slab;

use crate::types::{Account, ChainId, Market, MarketId, Order, OrderId, Trade, UserId};

/// Ledger entries are keyed by wallet and home chain.
pub type AccountKey = (UserId, ChainId);

/// One credited deposit, retained for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub user_id: UserId,
    pub chain_id: ChainId,
    pub amount_usd: Decimal,
    /// Transaction reference on the external chain
    pub tx_ref: String,
    /// Block height the indexer observed the deposit at
    pub block_height: u64,
    /// Credit timestamp in milliseconds
    pub credited_at: u64,
}

/// In-memory entity store.
#[derive(Debug, Default)]
pub(crate) struct Store {
    pub(crate) markets: HashMap<MarketId, Market>,
    pub(crate) orders: Slab<Order>,
    pub(crate) order_index: HashMap<OrderId, usize>,
    pub(crate) trades: Vec<Trade>,
    pub(crate) accounts: HashMap<AccountKey, Account>,
    pub(crate) deposits: Vec<DepositRecord>,

    pub(crate) next_market_id: u64,
    pub(crate) next_order_id: u64,
    pub(crate) next_trade_id: u64,
    pub(crate) next_seq: u64,
}

impl Store {
    pub(crate) fn new() -> Self {
        Self {
            next_market_id: 1,
            next_order_id: 1,
            next_trade_id: 1,
            next_seq: 1,
            ..Self::default()
        }
    }

    /// Look up an order by id.
    pub(crate) fn order(&self, id: OrderId) -> Option<&Order> {
        self.order_index.get(&id).and_then(|&key| self.orders.get(key))
    }

    /// Insert or replace an order, keeping the id index consistent.
    pub(crate) fn put_order(&mut self, order: Order) {
        match self.order_index.get(&order.id) {
            Some(&key) => {
                if let Some(slot) = self.orders.get_mut(key) {
                    *slot = order;
                }
            }
            None => {
                let id = order.id;
                let key = self.orders.insert(order);
                self.order_index.insert(id, key);
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
