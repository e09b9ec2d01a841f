//! # predex
//!
//! Off-chain binary prediction market exchange.
//!
//! ## Architecture
//!
//! The trading core consists of:
//! - **Types**: markets, orders, trades, positions ([`types`])
//! - **Ledger**: transactional store of all balances and records ([`ledger`])
//! - **Auth**: order signature verification per chain family ([`auth`])
//! - **Engine**: admission, price-time matching, execution, settlement ([`engine`])
//! - **Book**: price-level depth snapshots ([`book`])
//! - **Exchange**: the public facade tying it together ([`exchange`])
//!
//! ## Design Principles
//!
//! 1. **Exact Arithmetic**: prices and money are `rust_decimal::Decimal`,
//!    quantities are integer share counts; no floating point
//! 2. **Single Writer Per Market**: admission, matching, and settlement of
//!    one market are serialized; markets proceed in parallel
//! 3. **Transactional Mutation**: every balance change commits atomically
//!    or not at all
//! 4. **Full Collateral**: every open obligation is backed one-for-one by
//!    locked inventory or locked funds until settlement
//!
//! ## Example
//!
//! ```
//! use predex::{Exchange, ExchangeConfig, Outcome, Side, SubmitOrderRequest};
//! use rust_decimal_macros::dec;
//!
//! let exchange = Exchange::new(ExchangeConfig::trust_all());
//! let market = exchange.create_market("Will it rain tomorrow?", "creator", 0).unwrap();
//!
//! exchange.credit_deposit("alice", "solana", dec!(100), "tx-1", 1).unwrap();
//! let response = exchange
//!     .submit_order(
//!         &SubmitOrderRequest {
//!             market_id: market.id,
//!             user_id: "alice".into(),
//!             chain_id: "solana".into(),
//!             wallet_address: "alice".into(),
//!             side: Side::Buy,
//!             outcome: Outcome::Yes,
//!             price: "0.55".into(),
//!             quantity: 10,
//!             signature: String::new(),
//!             session_public_key: None,
//!             session_address: None,
//!         },
//!         None,
//!     )
//!     .unwrap();
//! assert_eq!(exchange.open_orders(market.id).len(), 1);
//! # let _ = response;
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: markets, orders, trades, positions
pub mod types;

/// Transactional store of balances, orders, trades, markets
pub mod ledger;

/// Order signature verification
pub mod auth;

/// Exchange configuration
pub mod config;

/// Error taxonomy
pub mod error;

/// Trading engine: admission, matching, execution, settlement
pub mod engine;

/// Price-level depth snapshots
pub mod book;

/// Public facade
pub mod exchange;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use book::{BookLevel, DepthSnapshot};
pub use config::{ChainConfig, ExchangeConfig, SignatureScheme};
pub use error::{ErrorBody, ExchangeError};
pub use exchange::{Exchange, SubmitOrderRequest, SubmitOrderResponse};
pub use ledger::Ledger;
pub use types::{
    Market, MarketId, Order, OrderId, OrderStatus, Outcome, SettlementReport, Side, Trade,
};
