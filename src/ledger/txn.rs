//! Ledger transactions.
//!
//! ## Semantics
//!
//! A [`Txn`] holds the store's write lock and a staging area. Reads fall
//! through to committed state unless the entity was already staged;
//! mutations touch only the staging area. [`Txn::commit`] applies every
//! staged change at once; dropping the transaction without committing
//! discards all of it. Identifier counters are staged too, so an aborted
//! transaction leaves no id gaps.
//!
//! All balance, order, and market mutation in the crate goes through a
//! transaction; nothing writes to the store directly.

use std::collections::BTreeMap;

use parking_lot::RwLockWriteGuard;
use rust_decimal::Decimal;

use crate::error::ExchangeError;
use crate::ledger::store::{AccountKey, DepositRecord, Store};
use crate::types::{
    Account, ChainId, Market, MarketId, Order, OrderId, Outcome, Side, Trade, UserId,
};

/// One atomic read-modify-write unit over the ledger.
pub struct Txn<'a> {
    store: RwLockWriteGuard<'a, Store>,

    // Staged state, keyed like the store. BTreeMap keeps order iteration
    // deterministic across runs.
    markets: BTreeMap<MarketId, Market>,
    accounts: BTreeMap<AccountKey, Account>,
    orders: BTreeMap<OrderId, Order>,
    trades: Vec<Trade>,
    deposits: Vec<DepositRecord>,

    next_market_id: u64,
    next_order_id: u64,
    next_trade_id: u64,
    next_seq: u64,
}

impl<'a> Txn<'a> {
    pub(crate) fn new(store: RwLockWriteGuard<'a, Store>) -> Self {
        let next_market_id = store.next_market_id;
        let next_order_id = store.next_order_id;
        let next_trade_id = store.next_trade_id;
        let next_seq = store.next_seq;
        Self {
            store,
            markets: BTreeMap::new(),
            accounts: BTreeMap::new(),
            orders: BTreeMap::new(),
            trades: Vec::new(),
            deposits: Vec::new(),
            next_market_id,
            next_order_id,
            next_trade_id,
            next_seq,
        }
    }

    // ========================================================================
    // Markets
    // ========================================================================

    /// Load a market, staged version first.
    pub fn market(&self, id: MarketId) -> Result<&Market, ExchangeError> {
        self.markets
            .get(&id)
            .or_else(|| self.store.markets.get(&id))
            .ok_or(ExchangeError::MarketNotFound(id))
    }

    /// Load a market for mutation, staging a copy on first touch.
    pub fn market_mut(&mut self, id: MarketId) -> Result<&mut Market, ExchangeError> {
        if !self.markets.contains_key(&id) {
            let committed = self
                .store
                .markets
                .get(&id)
                .cloned()
                .ok_or(ExchangeError::MarketNotFound(id))?;
            self.markets.insert(id, committed);
        }
        Ok(self.markets.get_mut(&id).expect("staged above"))
    }

    /// Create a market with a fresh identifier.
    pub fn insert_market(
        &mut self,
        question: String,
        creator: String,
        resolves_at: u64,
    ) -> Market {
        let id = self.next_market_id;
        self.next_market_id += 1;
        let market = Market::new(id, question, creator, resolves_at);
        self.markets.insert(id, market.clone());
        market
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Load an account read-only, if it exists in staged or committed state.
    pub fn account(&self, user_id: &str, chain_id: &str) -> Option<&Account> {
        let key = (user_id.to_string(), chain_id.to_string());
        self.accounts.get(&key).or_else(|| self.store.accounts.get(&key))
    }

    /// Load an account for mutation, creating a zero record on first
    /// reference.
    pub fn account_mut(&mut self, user_id: &str, chain_id: &str) -> &mut Account {
        let key = (user_id.to_string(), chain_id.to_string());
        let store = &*self.store;
        self.accounts
            .entry(key)
            .or_insert_with_key(|k| store.accounts.get(k).cloned().unwrap_or_default())
    }

    /// Keys of every account holding a position record for `market_id`.
    pub fn accounts_with_position(&self, market_id: MarketId) -> Vec<AccountKey> {
        let mut keys: Vec<AccountKey> = self
            .store
            .accounts
            .iter()
            .filter(|(_, account)| account.markets.contains_key(&market_id))
            .map(|(key, _)| key.clone())
            .collect();
        for (key, account) in &self.accounts {
            if account.markets.contains_key(&market_id) && !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys.sort();
        keys
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Load an order, staged version first.
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id).or_else(|| self.store.order(id))
    }

    /// Insert a new OPEN order with fresh id and admission sequence.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_order(
        &mut self,
        market_id: MarketId,
        user_id: UserId,
        chain_id: ChainId,
        side: Side,
        outcome: Outcome,
        price: Decimal,
        quantity: u64,
        now: u64,
    ) -> Order {
        let id = self.next_order_id;
        self.next_order_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        let order = Order::new(id, market_id, user_id, chain_id, side, outcome, price, quantity, now, seq);
        self.orders.insert(id, order.clone());
        order
    }

    /// Stage an updated copy of an existing order.
    pub fn update_order(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    /// All OPEN/PARTIAL orders in a market, in admission order.
    pub fn open_orders(&self, market_id: MarketId) -> Vec<Order> {
        let mut out: Vec<Order> = Vec::new();
        for (_, order) in self.store.orders.iter() {
            if order.market_id != market_id {
                continue;
            }
            // Staged copies supersede committed ones
            let latest = self.orders.get(&order.id).unwrap_or(order);
            if latest.is_resting() {
                out.push(latest.clone());
            }
        }
        for order in self.orders.values() {
            if order.market_id == market_id
                && order.is_resting()
                && self.store.order(order.id).is_none()
            {
                out.push(order.clone());
            }
        }
        out.sort_by_key(|o| o.seq);
        out
    }

    /// Best resting maker for `taker`, by price-time priority.
    ///
    /// Candidates share the taker's market and token type, rest on the
    /// opposite side at a crossing price, and never belong to the taker's
    /// own user. For a BUY taker the cheapest ask wins; for a SELL taker
    /// the highest bid wins; ties go to the earliest admission.
    pub fn best_opposing(&self, taker: &Order) -> Option<Order> {
        self.open_orders(taker.market_id)
            .into_iter()
            .filter(|m| m.outcome == taker.outcome)
            .filter(|m| m.side == taker.side.opposite())
            .filter(|m| m.user_id != taker.user_id)
            .filter(|m| match taker.side {
                Side::Buy => m.price <= taker.price,
                Side::Sell => m.price >= taker.price,
            })
            .min_by(|a, b| match taker.side {
                Side::Buy => a.price.cmp(&b.price).then(a.seq.cmp(&b.seq)),
                Side::Sell => b.price.cmp(&a.price).then(a.seq.cmp(&b.seq)),
            })
    }

    // ========================================================================
    // Trades and deposits
    // ========================================================================

    /// Record an executed fill.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_trade(
        &mut self,
        market_id: MarketId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        outcome: Outcome,
        price: Decimal,
        quantity: u64,
        now: u64,
    ) -> Trade {
        let id = self.next_trade_id;
        self.next_trade_id += 1;
        let trade = Trade::new(id, market_id, buy_order_id, sell_order_id, outcome, price, quantity, now);
        self.trades.push(trade.clone());
        trade
    }

    /// Append a credited deposit to the audit log.
    pub fn record_deposit(&mut self, record: DepositRecord) {
        self.deposits.push(record);
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Apply every staged change to the store.
    pub fn commit(mut self) {
        for (id, market) in std::mem::take(&mut self.markets) {
            self.store.markets.insert(id, market);
        }
        for (key, account) in std::mem::take(&mut self.accounts) {
            self.store.accounts.insert(key, account);
        }
        for (_, order) in std::mem::take(&mut self.orders) {
            self.store.put_order(order);
        }
        self.store.trades.append(&mut self.trades);
        self.store.deposits.append(&mut self.deposits);

        self.store.next_market_id = self.next_market_id;
        self.store.next_order_id = self.next_order_id;
        self.store.next_trade_id = self.next_trade_id;
        self.store.next_seq = self.next_seq;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
