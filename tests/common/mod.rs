//! Shared fixtures for the integration tests.
//!
//! Every scenario starts from five fresh users A-E, each holding 100 USD,
//! in a single newly created market on a trust-without-verify chain.

#![allow(dead_code)]

use predex::types::Position;
use predex::{
    Exchange, ExchangeConfig, MarketId, Outcome, Side, SubmitOrderRequest, SubmitOrderResponse,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const USERS: [&str; 5] = ["A", "B", "C", "D", "E"];
pub const CHAIN: &str = "solana";
pub const SEED_BALANCE: Decimal = dec!(100);

/// A fresh exchange with one market and five funded users.
pub fn fresh_market() -> (Exchange, MarketId) {
    let exchange = Exchange::new(ExchangeConfig::trust_all());
    let market = exchange
        .create_market("Will the question resolve YES?", "creator", 1_800_000_000_000)
        .expect("create market");
    for (height, user) in USERS.iter().enumerate() {
        exchange
            .credit_deposit(user, CHAIN, SEED_BALANCE, &format!("seed-{user}"), height as u64 + 1)
            .expect("seed deposit");
    }
    (exchange, market.id)
}

/// Submit one order for `user` and return the post-matching response.
pub fn place(
    exchange: &Exchange,
    market_id: MarketId,
    user: &str,
    side: Side,
    outcome: Outcome,
    price: &str,
    quantity: u64,
) -> SubmitOrderResponse {
    exchange
        .submit_order(
            &SubmitOrderRequest {
                market_id,
                user_id: user.to_string(),
                chain_id: CHAIN.to_string(),
                wallet_address: user.to_string(),
                side,
                outcome,
                price: price.to_string(),
                quantity,
                signature: String::new(),
                session_public_key: None,
                session_address: None,
            },
            None,
        )
        .expect("order accepted")
}

pub fn usd(exchange: &Exchange, user: &str) -> Decimal {
    exchange.account(user, CHAIN).expect("account exists").available_usd
}

pub fn position(exchange: &Exchange, market_id: MarketId, user: &str) -> Position {
    exchange
        .account(user, CHAIN)
        .expect("account exists")
        .position(market_id)
        .cloned()
        .unwrap_or_default()
}

/// Full conservation check over the fixture's closed system.
///
/// Free balances, locked collateral, and outstanding BUY pre-locks must
/// always sum to the seeded deposits, and the ledger's own market audit
/// must pass.
pub fn assert_conserved(exchange: &Exchange, market_id: MarketId) {
    let free: Decimal = USERS.iter().map(|user| usd(exchange, user)).sum();
    let collateral: Decimal = USERS
        .iter()
        .map(|user| {
            let p = position(exchange, market_id, user);
            p.locked_collateral_yes + p.locked_collateral_no
        })
        .sum();
    let buy_locks: Decimal = exchange
        .open_orders(market_id)
        .iter()
        .filter(|o| o.side == Side::Buy)
        .map(|o| o.price * Decimal::from(o.remaining()))
        .sum();

    let seeded = SEED_BALANCE * Decimal::from(USERS.len() as u64);
    assert_eq!(free + collateral + buy_locks, seeded, "monetary conservation violated");

    exchange.audit_market(market_id).expect("market audit");
}
