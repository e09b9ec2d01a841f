//! Demo binary: drives one market through a full trading session.
//!
//! Deposits, a short-sale cross, a book snapshot, and settlement, with
//! structured logs on stdout. Transport adapters wire the same calls to
//! their RPC surface.

use predex::{Exchange, ExchangeConfig, Outcome, Side, SubmitOrderRequest};
use rust_decimal_macros::dec;

fn order(
    market_id: u64,
    user: &str,
    side: Side,
    outcome: Outcome,
    price: &str,
    quantity: u64,
) -> SubmitOrderRequest {
    SubmitOrderRequest {
        market_id,
        user_id: user.to_string(),
        chain_id: "solana".to_string(),
        wallet_address: user.to_string(),
        side,
        outcome,
        price: price.to_string(),
        quantity,
        signature: String::new(),
        session_public_key: None,
        session_address: None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Development configuration: chains trusted without verification
    let exchange = Exchange::new(ExchangeConfig::trust_all());

    let market = exchange
        .create_market("Will it rain in Lisbon tomorrow?", "creator", 1_800_000_000_000)
        .expect("market creation");
    exchange.credit_deposit("alice", "solana", dec!(100), "tx-a", 1).expect("deposit");
    exchange.credit_deposit("bob", "solana", dec!(100), "tx-b", 1).expect("deposit");

    // alice bids 10 YES at 0.60; bob shorts into the bid at 0.50
    let bid = exchange
        .submit_order(&order(market.id, "alice", Side::Buy, Outcome::Yes, "0.60", 10), None)
        .expect("bid");
    println!("alice bid    -> order {} {:?}", bid.order_id, bid.status);

    let ask = exchange
        .submit_order(&order(market.id, "bob", Side::Sell, Outcome::Yes, "0.50", 10), None)
        .expect("ask");
    println!("bob ask      -> order {} {:?}", ask.order_id, ask.status);

    for trade in exchange.trades(market.id, None) {
        println!("trade        -> {} {} @ {}", trade.quantity, trade.outcome.as_str(), trade.price);
    }

    let depth = exchange.book(market.id, Outcome::Yes).expect("book");
    println!(
        "yes book     -> best bid {:?}, best ask {:?}, spread {:?}",
        depth.best_bid, depth.best_ask, depth.spread
    );

    for user in ["alice", "bob"] {
        let account = exchange.account(user, "solana").expect("account");
        println!("{user:<12} -> {} USD free", account.available_usd);
    }

    let report = exchange.settle_market(market.id, Outcome::Yes).expect("settlement");
    println!(
        "settled YES  -> paid {}, forfeited {}, digest {}",
        report.winnings_paid,
        report.collateral_forfeited,
        report.digest_hex()
    );

    for user in ["alice", "bob"] {
        let account = exchange.account(user, "solana").expect("account");
        println!("{user:<12} -> {} USD final", account.available_usd);
    }
}
