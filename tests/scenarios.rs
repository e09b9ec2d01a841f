//! End-to-end trading scenarios.
//!
//! Each test drives the public exchange surface only: deposits, signed
//! order submission (trust-without-verify chain), settlement, and the
//! read queries. Balances are asserted to the cent and conservation is
//! re-checked after every phase.

mod common;

use common::{assert_conserved, fresh_market, place, position, usd, CHAIN, USERS};
use predex::{ExchangeError, Outcome, OrderStatus, Side};
use rust_decimal_macros::dec;

// ============================================================================
// Scenario 1: initial mint through a short sale
// ============================================================================

#[test]
fn initial_mint() {
    let (exchange, m) = fresh_market();

    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.50", 10);
    let response = place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.50", 10);
    assert_eq!(response.status, OrderStatus::Filled);

    let trades = exchange.trades(m, Some(Outcome::Yes));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, dec!(0.50));
    assert_eq!(trades[0].quantity, 10);

    // A paid 5.00 for 10 minted YES
    assert_eq!(usd(&exchange, "A"), dec!(95));
    assert_eq!(position(&exchange, m, "A").yes_tokens, 10);

    // B locked 10 collateral, received 5.00, and holds the paired NO
    assert_eq!(usd(&exchange, "B"), dec!(95));
    let b = position(&exchange, m, "B");
    assert_eq!(b.no_tokens, 10);
    assert_eq!(b.locked_collateral_yes, dec!(10));
    assert_conserved(&exchange, m);

    exchange.settle_market(m, Outcome::Yes).unwrap();
    assert_eq!(usd(&exchange, "A"), dec!(105));
    assert_eq!(usd(&exchange, "B"), dec!(95));
    for user in ["C", "D", "E"] {
        assert_eq!(usd(&exchange, user), dec!(100));
    }
}

// ============================================================================
// Scenario 2: price improvement goes to the buyer
// ============================================================================

#[test]
fn improved_price() {
    let (exchange, m) = fresh_market();

    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.60", 10);
    assert_eq!(usd(&exchange, "A"), dec!(94));

    place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.50", 10);

    let trades = exchange.trades(m, None);
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, dec!(0.50));

    // A pre-locked 6.00 at its own limit and gets 1.00 back
    assert_eq!(usd(&exchange, "A"), dec!(95));
    assert_eq!(position(&exchange, m, "A").yes_tokens, 10);

    // B received 5.00 against 10 locked collateral
    assert_eq!(usd(&exchange, "B"), dec!(95));
    assert_eq!(position(&exchange, m, "B").locked_collateral_yes, dec!(10));
    assert_conserved(&exchange, m);
}

// ============================================================================
// Scenario 3: partial fills across two makers
// ============================================================================

#[test]
fn partial_fills() {
    let (exchange, m) = fresh_market();

    let bid = place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.55", 10);
    assert_eq!(usd(&exchange, "A"), dec!(94.50));

    place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.50", 3);
    place(&exchange, m, "C", Side::Sell, Outcome::Yes, "0.55", 4);

    let trades = exchange.trades(m, None);
    assert_eq!(trades.len(), 2);
    assert_eq!((trades[0].quantity, trades[0].price), (3, dec!(0.50)));
    assert_eq!((trades[1].quantity, trades[1].price), (4, dec!(0.55)));

    let order = exchange
        .open_orders(m)
        .into_iter()
        .find(|o| o.id == bid.order_id)
        .expect("bid still resting");
    assert_eq!(order.status, OrderStatus::Partial);
    assert_eq!(order.filled, 7);
    assert_eq!(order.remaining(), 3);
    assert_eq!(order.price, dec!(0.55));

    // Of the original 5.50 pre-lock: 1.50 + 0.15 refund went to the first
    // fill, 2.20 to the second, leaving 1.65 against the remainder
    assert_eq!(usd(&exchange, "A"), dec!(94.65));
    assert_eq!(position(&exchange, m, "A").yes_tokens, 7);
    assert_conserved(&exchange, m);
}

// ============================================================================
// Scenario 4: secondary trading of the minted NO inventory
// ============================================================================

#[test]
fn secondary_no_market() {
    let (exchange, m) = fresh_market();

    // Scenario 1 preamble
    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.50", 10);
    place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.50", 10);

    // B sells half the paired NO inventory to E
    place(&exchange, m, "B", Side::Sell, Outcome::No, "0.48", 5);
    let response = place(&exchange, m, "E", Side::Buy, Outcome::No, "0.48", 5);
    assert_eq!(response.status, OrderStatus::Filled);

    let no_trades = exchange.trades(m, Some(Outcome::No));
    assert_eq!(no_trades.len(), 1);
    assert_eq!(no_trades[0].price, dec!(0.48));
    assert_eq!(no_trades[0].quantity, 5);

    let b = position(&exchange, m, "B");
    assert_eq!(b.no_tokens, 5);
    assert_eq!(b.locked_no_tokens, 0);
    assert_eq!(b.locked_collateral_no, dec!(0));
    assert_eq!(usd(&exchange, "B"), dec!(97.40));

    assert_eq!(position(&exchange, m, "E").no_tokens, 5);
    assert_eq!(usd(&exchange, "E"), dec!(97.60));
    assert_conserved(&exchange, m);
}

// ============================================================================
// Scenario 5: self-match prevention
// ============================================================================

#[test]
fn self_match_prevented() {
    let (exchange, m) = fresh_market();

    place(&exchange, m, "A", Side::Sell, Outcome::Yes, "0.65", 5);
    let response = place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.65", 5);

    assert_eq!(response.status, OrderStatus::Open);
    assert!(exchange.trades(m, None).is_empty());
    assert_eq!(exchange.open_orders(m).len(), 2);

    // Both sides rest in the book, crossed by the same user
    let depth = exchange.book(m, Outcome::Yes).unwrap();
    assert_eq!(depth.best_bid, Some(dec!(0.65)));
    assert_eq!(depth.best_ask, Some(dec!(0.65)));
    assert_conserved(&exchange, m);
}

// ============================================================================
// Scenario 6: settlement with forfeiture
// ============================================================================

#[test]
fn settlement_with_forfeiture() {
    let (exchange, m) = fresh_market();

    // Scenario 1 then scenario 4
    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.50", 10);
    place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.50", 10);
    place(&exchange, m, "B", Side::Sell, Outcome::No, "0.48", 5);
    place(&exchange, m, "E", Side::Buy, Outcome::No, "0.48", 5);

    let report = exchange.settle_market(m, Outcome::Yes).unwrap();

    assert_eq!(usd(&exchange, "A"), dec!(105.00));
    assert_eq!(usd(&exchange, "B"), dec!(97.40));
    assert_eq!(usd(&exchange, "C"), dec!(100.00));
    assert_eq!(usd(&exchange, "D"), dec!(100.00));
    assert_eq!(usd(&exchange, "E"), dec!(97.60));

    // The 10 B locked funds A's redemption; E's NO pays zero
    assert_eq!(report.winnings_paid, dec!(10));
    assert_eq!(report.collateral_forfeited, dec!(10));
    assert_eq!(report.collateral_returned, dec!(0));

    for user in USERS {
        assert!(position(&exchange, m, user).is_zero());
    }
    let market = exchange.market(m).unwrap();
    assert!(market.settled);
    assert_eq!(market.outcome, Some(Outcome::Yes));
    exchange.audit_market(m).unwrap();

    // Money is conserved end to end
    let total: rust_decimal::Decimal = USERS.iter().map(|u| usd(&exchange, u)).sum();
    assert_eq!(total, dec!(500));
}

// ============================================================================
// Boundary behaviors
// ============================================================================

#[test]
fn price_boundaries() {
    let (exchange, m) = fresh_market();

    // Both bounds are admitted
    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0", 5);
    place(&exchange, m, "B", Side::Buy, Outcome::Yes, "1", 5);

    for bad in ["-0.01", "1.01", "2"] {
        let err = exchange
            .submit_order(
                &predex::SubmitOrderRequest {
                    market_id: m,
                    user_id: "C".into(),
                    chain_id: CHAIN.into(),
                    wallet_address: "C".into(),
                    side: Side::Buy,
                    outcome: Outcome::Yes,
                    price: bad.into(),
                    quantity: 5,
                    signature: String::new(),
                    session_public_key: None,
                    session_address: None,
                },
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidPrice(_)), "price {bad}");
    }
}

#[test]
fn free_buy_at_price_zero() {
    let (exchange, m) = fresh_market();

    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0", 10);
    assert_eq!(usd(&exchange, "A"), dec!(100));

    // A zero-priced ask crosses it; the buyer pays nothing
    place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0", 10);

    assert_eq!(exchange.trades(m, None).len(), 1);
    assert_eq!(usd(&exchange, "A"), dec!(100));
    assert_eq!(position(&exchange, m, "A").yes_tokens, 10);
    assert_eq!(usd(&exchange, "B"), dec!(90));
    assert_conserved(&exchange, m);

    exchange.settle_market(m, Outcome::Yes).unwrap();
    assert_eq!(usd(&exchange, "A"), dec!(110));
    assert_eq!(usd(&exchange, "B"), dec!(90));
}

#[test]
fn sell_taker_below_every_bid_rests_open() {
    let (exchange, m) = fresh_market();

    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.30", 10);
    let response = place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.45", 10);

    assert_eq!(response.status, OrderStatus::Open);
    assert!(exchange.trades(m, None).is_empty());
    assert_conserved(&exchange, m);
}

#[test]
fn insufficient_funds_rejected_atomically() {
    let (exchange, m) = fresh_market();

    let err = exchange
        .submit_order(
            &predex::SubmitOrderRequest {
                market_id: m,
                user_id: "A".into(),
                chain_id: CHAIN.into(),
                wallet_address: "A".into(),
                side: Side::Sell,
                outcome: Outcome::Yes,
                price: "0.50".into(),
                quantity: 500,
                signature: String::new(),
                session_public_key: None,
                session_address: None,
            },
            None,
        )
        .unwrap_err();

    assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
    assert_eq!(usd(&exchange, "A"), dec!(100));
    assert!(exchange.open_orders(m).is_empty());
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn deposit_replay_is_ignored() {
    let (exchange, _) = fresh_market();

    // The fixture seeded A at height 1; replaying it changes nothing
    let credited = exchange.credit_deposit("A", CHAIN, dec!(100), "seed-A", 1).unwrap();
    assert!(!credited);
    assert_eq!(usd(&exchange, "A"), dec!(100));
}

#[test]
fn settle_twice_fails_cleanly() {
    let (exchange, m) = fresh_market();

    place(&exchange, m, "A", Side::Buy, Outcome::Yes, "0.50", 10);
    place(&exchange, m, "B", Side::Sell, Outcome::Yes, "0.50", 10);

    exchange.settle_market(m, Outcome::Yes).unwrap();
    let balances: Vec<_> = USERS.iter().map(|u| usd(&exchange, u)).collect();

    let err = exchange.settle_market(m, Outcome::No).unwrap_err();
    assert_eq!(err, ExchangeError::AlreadySettled(m));

    let after: Vec<_> = USERS.iter().map(|u| usd(&exchange, u)).collect();
    assert_eq!(balances, after);
    assert_eq!(exchange.market(m).unwrap().outcome, Some(Outcome::Yes));
}

#[test]
fn settled_market_rejects_orders() {
    let (exchange, m) = fresh_market();
    exchange.settle_market(m, Outcome::No).unwrap();

    let err = exchange
        .submit_order(
            &predex::SubmitOrderRequest {
                market_id: m,
                user_id: "A".into(),
                chain_id: CHAIN.into(),
                wallet_address: "A".into(),
                side: Side::Buy,
                outcome: Outcome::Yes,
                price: "0.50".into(),
                quantity: 1,
                signature: String::new(),
                session_public_key: None,
                session_address: None,
            },
            None,
        )
        .unwrap_err();
    assert_eq!(err, ExchangeError::MarketClosed(m));
}
