//! Exchange facade: the public entry points.
//!
//! ## Concurrency
//!
//! Every operation that writes a market (order submission, settlement)
//! runs under that market's serialization guard, so one market sees a
//! total order of writes while different markets proceed in parallel.
//! Read-only queries take committed snapshots and never hold a guard.
//!
//! ## Deadlines
//!
//! Order submission accepts an optional deadline. It is checked before
//! admission starts and again before the admission transaction commits;
//! expiry at either point fails [`ExchangeError::DeadlineExceeded`] with
//! no persistent effect. Once admission commits the order is live and
//! matching runs to completion regardless of the deadline.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{self, OrderIntent, SignatureBundle};
use crate::book::{self, DepthSnapshot};
use crate::config::ExchangeConfig;
use crate::engine::{admission, matcher, settlement};
use crate::error::ExchangeError;
use crate::ledger::{DepositRecord, Ledger};
use crate::types::price;
use crate::types::{
    Account, ChainId, Market, MarketId, Order, OrderId, OrderStatus, Outcome, SettlementReport,
    Side, Trade, UserId,
};

// ============================================================================
// API types
// ============================================================================

/// Transport-agnostic order submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    pub market_id: MarketId,
    pub user_id: UserId,
    pub chain_id: ChainId,
    pub wallet_address: String,
    pub side: Side,
    pub outcome: Outcome,
    /// Decimal in [0, 1], kept textual for signature reconstruction
    pub price: String,
    pub quantity: u64,
    pub signature: String,
    /// Cosmos-family chains only
    #[serde(default)]
    pub session_public_key: Option<String>,
    /// Cosmos-family chains only
    #[serde(default)]
    pub session_address: Option<String>,
}

/// Order submission response: the persisted order and its post-matching
/// status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

// ============================================================================
// Exchange
// ============================================================================

/// The exchange core. Holds no process-wide state; every collaborator is
/// owned explicitly.
pub struct Exchange {
    ledger: Ledger,
    config: ExchangeConfig,
}

impl Exchange {
    pub fn new(config: ExchangeConfig) -> Self {
        Self { ledger: Ledger::new(), config }
    }

    /// The underlying ledger, for reconciliation tooling.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ========================================================================
    // Deposit ingress
    // ========================================================================

    /// Credit a deposit observed by the external chain indexer.
    ///
    /// Idempotent across indexer restarts: a call whose `block_height` is
    /// at or below the last credited height for (user, chain) is ignored.
    /// Returns whether the deposit was credited.
    pub fn credit_deposit(
        &self,
        user_id: &str,
        chain_id: &str,
        amount_usd: Decimal,
        tx_ref: &str,
        block_height: u64,
    ) -> Result<bool, ExchangeError> {
        if user_id.trim().is_empty() {
            return Err(ExchangeError::MissingField("user_id"));
        }
        if self.config.chain(chain_id).is_none() {
            return Err(ExchangeError::InvalidChain(chain_id.to_string()));
        }
        if amount_usd <= Decimal::ZERO {
            return Err(ExchangeError::InvalidQuantity);
        }

        let mut txn = self.ledger.begin();
        let account = txn.account_mut(user_id, chain_id);
        if block_height <= account.deposit_height {
            return Ok(false);
        }
        account.available_usd += amount_usd;
        account.deposit_height = block_height;
        let now = now_ms();
        txn.record_deposit(DepositRecord {
            user_id: user_id.to_string(),
            chain_id: chain_id.to_string(),
            amount_usd,
            tx_ref: tx_ref.to_string(),
            block_height,
            credited_at: now,
        });
        txn.commit();

        info!(user_id, chain_id, amount = %amount_usd, block_height, "deposit credited");
        Ok(true)
    }

    // ========================================================================
    // Market lifecycle
    // ========================================================================

    /// Create a market.
    pub fn create_market(
        &self,
        question: &str,
        creator: &str,
        resolves_at: u64,
    ) -> Result<Market, ExchangeError> {
        if question.trim().is_empty() {
            return Err(ExchangeError::MissingField("question"));
        }
        if creator.trim().is_empty() {
            return Err(ExchangeError::MissingField("creator"));
        }

        let mut txn = self.ledger.begin();
        let market = txn.insert_market(question.to_string(), creator.to_string(), resolves_at);
        txn.commit();

        info!(market_id = market.id, question, "market created");
        Ok(market)
    }

    /// Settle a market at its final outcome.
    pub fn settle_market(
        &self,
        market_id: MarketId,
        outcome: Outcome,
    ) -> Result<SettlementReport, ExchangeError> {
        let guard = self.ledger.market_guard(market_id);
        let _serialized = guard.lock();
        settlement::settle(&self.ledger, market_id, outcome, now_ms())
    }

    // ========================================================================
    // Order submission
    // ========================================================================

    /// Submit a signed limit order and run matching synchronously.
    pub fn submit_order(
        &self,
        request: &SubmitOrderRequest,
        deadline: Option<Instant>,
    ) -> Result<SubmitOrderResponse, ExchangeError> {
        // Validation and authorization happen before any locking
        if request.user_id.trim().is_empty() {
            return Err(ExchangeError::MissingField("user_id"));
        }
        if request.quantity == 0 {
            return Err(ExchangeError::InvalidQuantity);
        }
        let parsed_price = price::parse_price(&request.price)?;

        let intent = OrderIntent {
            market_id: request.market_id,
            user_id: &request.user_id,
            side: request.side,
            price_text: &request.price,
            quantity: request.quantity,
            outcome: request.outcome,
        };
        let bundle = SignatureBundle {
            wallet_address: &request.wallet_address,
            signature: &request.signature,
            session_public_key: request.session_public_key.as_deref(),
            session_address: request.session_address.as_deref(),
        };
        auth::verify_order(&self.config, &request.chain_id, &intent, &bundle)?;

        let guard = self.ledger.market_guard(request.market_id);
        let _serialized = guard.lock();
        check_deadline(deadline)?;

        let new_order = admission::NewOrder {
            market_id: request.market_id,
            user_id: request.user_id.clone(),
            chain_id: request.chain_id.clone(),
            side: request.side,
            outcome: request.outcome,
            price: parsed_price,
            quantity: request.quantity,
        };
        let now = now_ms();
        let mut txn = self.ledger.begin();
        let order = admission::admit(&mut txn, &new_order, now)?;
        check_deadline(deadline)?;
        txn.commit();

        // The order is live from here on; matching runs to quiescence
        let result = matcher::run(&self.ledger, order.id, now)?;
        Ok(SubmitOrderResponse { order_id: result.taker.id, status: result.taker.status })
    }

    // ========================================================================
    // Read-only queries
    // ========================================================================

    /// A market by id.
    pub fn market(&self, market_id: MarketId) -> Result<Market, ExchangeError> {
        self.ledger.market(market_id).ok_or(ExchangeError::MarketNotFound(market_id))
    }

    /// All markets.
    pub fn markets(&self) -> Vec<Market> {
        self.ledger.markets()
    }

    /// OPEN/PARTIAL orders of a market, in admission order.
    pub fn open_orders(&self, market_id: MarketId) -> Vec<Order> {
        self.ledger.open_orders(market_id)
    }

    /// Trades of a market, optionally filtered by token type.
    pub fn trades(&self, market_id: MarketId, outcome: Option<Outcome>) -> Vec<Trade> {
        self.ledger.trades(market_id, outcome)
    }

    /// Price-level aggregated depth for one token type.
    pub fn book(&self, market_id: MarketId, outcome: Outcome) -> Result<DepthSnapshot, ExchangeError> {
        self.market(market_id)?;
        Ok(book::depth(&self.ledger.open_orders(market_id), market_id, outcome))
    }

    /// A user's ledger entry for one chain.
    pub fn account(&self, user_id: &str, chain_id: &str) -> Result<Account, ExchangeError> {
        self.ledger.account(user_id, chain_id).ok_or_else(|| ExchangeError::UserNotFound {
            user: user_id.to_string(),
            chain: chain_id.to_string(),
        })
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// Recompute the market's conservation invariants from committed state.
    ///
    /// Checks, per token type and over all accounts:
    ///
    /// - every balance field is non-negative;
    /// - each seller's reservation (locked inventory plus locked
    ///   collateral) covers that seller's open SELL remainders, and locked
    ///   inventory never exceeds them;
    /// - YES supply equals NO supply (tokens are only created in pairs);
    /// - retained collateral net of never-minted reservations equals the
    ///   minted pair count;
    /// - a settled market has no resting orders and only zeroed positions.
    pub fn audit_market(&self, market_id: MarketId) -> Result<(), ExchangeError> {
        let market = self.market(market_id)?;
        let accounts = self.ledger.accounts();
        let open = self.ledger.open_orders(market_id);

        if market.settled {
            if !open.is_empty() {
                return Err(ExchangeError::LedgerInconsistency(format!(
                    "settled market {market_id} still has {} resting orders",
                    open.len()
                )));
            }
            for ((user, chain), account) in &accounts {
                if account.position(market_id).is_some_and(|p| !p.is_zero()) {
                    return Err(ExchangeError::LedgerInconsistency(format!(
                        "settled market {market_id} leaves a live position for {user}:{chain}"
                    )));
                }
            }
            return Ok(());
        }

        let mut supply = [0u64; 2];
        let mut minted_total = Decimal::ZERO;

        for (index, token) in [Outcome::Yes, Outcome::No].into_iter().enumerate() {
            let mut collateral_total = Decimal::ZERO;
            let mut unused_total = Decimal::ZERO;

            for ((user, chain), account) in &accounts {
                if account.available_usd < Decimal::ZERO {
                    return Err(ExchangeError::LedgerInconsistency(format!(
                        "negative balance for {user}:{chain}"
                    )));
                }
                let Some(position) = account.position(market_id) else { continue };
                if position.locked_collateral(token) < Decimal::ZERO {
                    return Err(ExchangeError::LedgerInconsistency(format!(
                        "negative collateral for {user}:{chain} in market {market_id}"
                    )));
                }

                let unfilled: u64 = open
                    .iter()
                    .filter(|o| {
                        o.side == Side::Sell
                            && o.outcome == token
                            && o.user_id == *user
                            && o.chain_id == *chain
                    })
                    .map(|o| o.remaining())
                    .sum();
                let reserved = position.locked_tokens(token);

                if reserved > unfilled {
                    return Err(ExchangeError::LedgerInconsistency(format!(
                        "{user}:{chain} reserves {reserved} {} tokens against {unfilled} unfilled sells",
                        token.as_str()
                    )));
                }
                if Decimal::from(reserved) + position.locked_collateral(token)
                    < Decimal::from(unfilled)
                {
                    return Err(ExchangeError::LedgerInconsistency(format!(
                        "{user}:{chain} cannot cover {unfilled} unfilled {} sells",
                        token.as_str()
                    )));
                }

                supply[index] += position.tokens(token) + reserved;
                collateral_total += position.locked_collateral(token);
                unused_total += Decimal::from(unfilled - reserved);
            }

            let minted = collateral_total - unused_total;
            if minted < Decimal::ZERO {
                return Err(ExchangeError::LedgerInconsistency(format!(
                    "market {market_id} reserves more {} sells than collateral",
                    token.as_str()
                )));
            }
            minted_total += minted;
        }

        if supply[0] != supply[1] {
            return Err(ExchangeError::LedgerInconsistency(format!(
                "market {market_id} YES supply {} diverges from NO supply {}",
                supply[0], supply[1]
            )));
        }
        if Decimal::from(supply[0]) != minted_total {
            return Err(ExchangeError::LedgerInconsistency(format!(
                "market {market_id} supply {} diverges from retained collateral {minted_total}",
                supply[0]
            )));
        }
        Ok(())
    }
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn check_deadline(deadline: Option<Instant>) -> Result<(), ExchangeError> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(ExchangeError::DeadlineExceeded),
        _ => Ok(()),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
