//! User ledger entries: account balances and per-market positions.
//!
//! ## Position Model
//!
//! A position holds exactly six numeric fields per token side:
//!
//! - free token inventory (`yes_tokens`, `no_tokens`)
//! - inventory reserved against open SELL orders (`locked_yes_tokens`,
//!   `locked_no_tokens`)
//! - monetary collateral reserved against short SELL orders
//!   (`locked_collateral_yes`, `locked_collateral_no`), one unit per
//!   shorted token, held until settlement
//!
//! All six are non-negative after every committed mutation, and
//! `available_usd >= 0` at all times.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MarketId, Outcome};

// ============================================================================
// Position struct
// ============================================================================

/// Per-market holdings of one user ledger entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Free YES inventory
    pub yes_tokens: u64,

    /// Free NO inventory
    pub no_tokens: u64,

    /// YES inventory reserved against open SELL orders
    pub locked_yes_tokens: u64,

    /// NO inventory reserved against open SELL orders
    pub locked_no_tokens: u64,

    /// Collateral behind short SELL YES orders (one unit per token)
    pub locked_collateral_yes: Decimal,

    /// Collateral behind short SELL NO orders (one unit per token)
    pub locked_collateral_no: Decimal,
}

impl Position {
    /// Free inventory for one token type.
    #[inline]
    pub fn tokens(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes_tokens,
            Outcome::No => self.no_tokens,
        }
    }

    /// Mutable free inventory for one token type.
    #[inline]
    pub fn tokens_mut(&mut self, outcome: Outcome) -> &mut u64 {
        match outcome {
            Outcome::Yes => &mut self.yes_tokens,
            Outcome::No => &mut self.no_tokens,
        }
    }

    /// Reserved inventory for one token type.
    #[inline]
    pub fn locked_tokens(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.locked_yes_tokens,
            Outcome::No => self.locked_no_tokens,
        }
    }

    /// Mutable reserved inventory for one token type.
    #[inline]
    pub fn locked_tokens_mut(&mut self, outcome: Outcome) -> &mut u64 {
        match outcome {
            Outcome::Yes => &mut self.locked_yes_tokens,
            Outcome::No => &mut self.locked_no_tokens,
        }
    }

    /// Locked collateral for one token type.
    #[inline]
    pub fn locked_collateral(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::Yes => self.locked_collateral_yes,
            Outcome::No => self.locked_collateral_no,
        }
    }

    /// Mutable locked collateral for one token type.
    #[inline]
    pub fn locked_collateral_mut(&mut self, outcome: Outcome) -> &mut Decimal {
        match outcome {
            Outcome::Yes => &mut self.locked_collateral_yes,
            Outcome::No => &mut self.locked_collateral_no,
        }
    }

    /// True when every field is zero (the state settlement leaves behind).
    pub fn is_zero(&self) -> bool {
        self.yes_tokens == 0
            && self.no_tokens == 0
            && self.locked_yes_tokens == 0
            && self.locked_no_tokens == 0
            && self.locked_collateral_yes.is_zero()
            && self.locked_collateral_no.is_zero()
    }

    /// Zero every field.
    pub fn clear(&mut self) {
        *self = Position::default();
    }
}

// ============================================================================
// Account struct
// ============================================================================

/// One user ledger entry, keyed by (user id, chain id).
///
/// Created with a zero balance on first reference (deposit credit or order
/// admission). `deposit_height` is the last external block height credited
/// for this key; deposit events at or below it are ignored so the indexer
/// can replay safely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Free monetary balance
    pub available_usd: Decimal,

    /// Highest external block height credited so far
    pub deposit_height: u64,

    /// Per-market position records
    pub markets: HashMap<MarketId, Position>,
}

impl Account {
    /// Position record for a market, if any.
    pub fn position(&self, market_id: MarketId) -> Option<&Position> {
        self.markets.get(&market_id)
    }

    /// Position record for a market, created zero on first reference.
    pub fn position_mut(&mut self, market_id: MarketId) -> &mut Position {
        self.markets.entry(market_id).or_default()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_accessors_by_outcome() {
        let mut pos = Position::default();
        *pos.tokens_mut(Outcome::Yes) = 10;
        *pos.locked_tokens_mut(Outcome::No) = 4;
        *pos.locked_collateral_mut(Outcome::Yes) = dec!(6);

        assert_eq!(pos.tokens(Outcome::Yes), 10);
        assert_eq!(pos.tokens(Outcome::No), 0);
        assert_eq!(pos.locked_tokens(Outcome::No), 4);
        assert_eq!(pos.locked_collateral(Outcome::Yes), dec!(6));
        assert_eq!(pos.locked_collateral(Outcome::No), Decimal::ZERO);
    }

    #[test]
    fn test_position_is_zero_and_clear() {
        let mut pos = Position::default();
        assert!(pos.is_zero());

        pos.no_tokens = 3;
        pos.locked_collateral_no = dec!(1.5);
        assert!(!pos.is_zero());

        pos.clear();
        assert!(pos.is_zero());
    }

    #[test]
    fn test_account_position_created_on_first_reference() {
        let mut account = Account::default();
        assert!(account.position(9).is_none());

        account.position_mut(9).yes_tokens = 2;
        assert_eq!(account.position(9).unwrap().yes_tokens, 2);
        assert_eq!(account.markets.len(), 1);
    }
}
