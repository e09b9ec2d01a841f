//! Authoritative store of balances, positions, orders, trades, and markets.
//!
//! ## Concurrency Model
//!
//! The ledger is the only shared mutable resource. Writers go through
//! [`Ledger::begin`], which takes the store's write lock for the duration
//! of one [`Txn`]; readers take the read lock just long enough to clone a
//! committed snapshot and never block on in-flight staging.
//!
//! Per-market writer serialization is layered on top: every admission,
//! matching pass, and settlement for a market holds that market's guard
//! (see [`Ledger::market_guard`]), so operations on different markets run
//! in parallel while a single market sees a total order of writes.

mod store;
mod txn;

pub use store::{AccountKey, DepositRecord};
pub use txn::Txn;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::types::{Account, Market, MarketId, Order, OrderId, Outcome, Trade};

/// The exchange ledger.
pub struct Ledger {
    store: RwLock<store::Store>,
    market_locks: Mutex<HashMap<MarketId, Arc<Mutex<()>>>>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(store::Store::new()),
            market_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Begin a transaction. Holds the store write lock until commit or drop.
    pub fn begin(&self) -> Txn<'_> {
        Txn::new(self.store.write())
    }

    /// The serialization guard for one market.
    ///
    /// Callers lock the returned mutex for the whole admission-and-matching
    /// pass or settlement; the guard map itself is only held long enough to
    /// fetch the entry.
    pub fn market_guard(&self, market_id: MarketId) -> Arc<Mutex<()>> {
        self.market_locks
            .lock()
            .entry(market_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ========================================================================
    // Read-only queries (committed snapshots)
    // ========================================================================

    /// A market by id.
    pub fn market(&self, id: MarketId) -> Option<Market> {
        self.store.read().markets.get(&id).cloned()
    }

    /// All markets, ordered by id.
    pub fn markets(&self) -> Vec<Market> {
        let store = self.store.read();
        let mut markets: Vec<Market> = store.markets.values().cloned().collect();
        markets.sort_by_key(|m| m.id);
        markets
    }

    /// An order by id.
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.store.read().order(id).cloned()
    }

    /// OPEN/PARTIAL orders of a market, in admission order.
    pub fn open_orders(&self, market_id: MarketId) -> Vec<Order> {
        let store = self.store.read();
        let mut orders: Vec<Order> = store
            .orders
            .iter()
            .map(|(_, order)| order)
            .filter(|o| o.market_id == market_id && o.is_resting())
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.seq);
        orders
    }

    /// Trades of a market, oldest first, optionally filtered by token type.
    pub fn trades(&self, market_id: MarketId, outcome: Option<Outcome>) -> Vec<Trade> {
        self.store
            .read()
            .trades
            .iter()
            .filter(|t| t.market_id == market_id)
            .filter(|t| outcome.map_or(true, |o| t.outcome == o))
            .cloned()
            .collect()
    }

    /// A user's ledger entry for one chain.
    pub fn account(&self, user_id: &str, chain_id: &str) -> Option<Account> {
        self.store
            .read()
            .accounts
            .get(&(user_id.to_string(), chain_id.to_string()))
            .cloned()
    }

    /// Every ledger entry, for reconciliation sweeps.
    pub fn accounts(&self) -> Vec<(AccountKey, Account)> {
        let store = self.store.read();
        let mut accounts: Vec<(AccountKey, Account)> =
            store.accounts.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        accounts.sort_by(|a, b| a.0.cmp(&b.0));
        accounts
    }

    /// The deposit audit log.
    pub fn deposits(&self) -> Vec<DepositRecord> {
        self.store.read().deposits.clone()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_guard_is_shared_per_market() {
        let ledger = Ledger::new();
        let a = ledger.market_guard(1);
        let b = ledger.market_guard(1);
        let c = ledger.market_guard(2);

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_queries_see_committed_state_only() {
        let ledger = Ledger::new();

        let mut txn = ledger.begin();
        let market = txn.insert_market("q".into(), "alice".into(), 0);
        txn.insert_order(
            market.id,
            "alice".into(),
            "solana".into(),
            Side::Buy,
            Outcome::Yes,
            dec!(0.5),
            10,
            0,
        );
        txn.commit();

        assert_eq!(ledger.markets().len(), 1);
        assert_eq!(ledger.open_orders(market.id).len(), 1);
        assert!(ledger.trades(market.id, None).is_empty());
        assert!(ledger.trades(market.id, Some(Outcome::No)).is_empty());
    }
}
