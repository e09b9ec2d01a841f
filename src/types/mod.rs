//! Core data types for the exchange.
//!
//! ## Types
//!
//! - [`Market`] / [`Outcome`]: a binary question and its two token types
//! - [`Order`] / [`Side`] / [`OrderStatus`]: limit orders
//! - [`Trade`]: an executed fill between two orders
//! - [`Position`] / [`Account`]: user ledger entries
//! - [`SettlementReport`]: terminal summary of a settled market
//!
//! Prices and monetary amounts use `rust_decimal::Decimal`; quantities are
//! integer share counts.

mod market;
mod order;
mod position;
mod receipt;
mod trade;

pub mod price;

// Re-export all types at module level
pub use market::{Market, MarketId, Outcome};
pub use order::{ChainId, Order, OrderId, OrderStatus, Side, UserId};
pub use position::{Account, Position};
pub use receipt::SettlementReport;
pub use trade::{Trade, TradeId};
