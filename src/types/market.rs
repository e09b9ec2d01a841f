//! Market and outcome types.
//!
//! A market is a single binary question. It is created once, traded while
//! open, and mutated exactly once more by settlement, which records the final
//! outcome and freezes the market forever.

use serde::{Deserialize, Serialize};

/// Unique identifier for a market (assigned by the ledger).
pub type MarketId = u64;

// ============================================================================
// Outcome enum
// ============================================================================

/// One of the two sides of a binary market.
///
/// `Outcome` doubles as the token type: a YES token pays one unit if the
/// market resolves YES and zero otherwise; NO is symmetric. Each token type
/// has its own limit order book within a market.
///
/// ## Example
///
/// ```
/// use predex::types::Outcome;
///
/// assert_eq!(Outcome::Yes.complement(), Outcome::No);
/// assert_eq!(Outcome::Yes.as_str(), "YES");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    #[default]
    Yes,
    No,
}

impl Outcome {
    /// The paired token type. Every short sale mints one token of each side.
    pub fn complement(self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }

    /// Wire form used in the canonical signed message.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Yes => "YES",
            Outcome::No => "NO",
        }
    }
}

// ============================================================================
// Market struct
// ============================================================================

/// A binary prediction market.
///
/// Created by [`crate::Exchange::create_market`]; mutated only once, by
/// settlement; never destroyed. A settled market accepts no further order
/// admission or matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier
    pub id: MarketId,

    /// The question this market resolves
    pub question: String,

    /// User identifier of the creator
    pub creator: String,

    /// Resolution timestamp in Unix milliseconds
    pub resolves_at: u64,

    /// Final outcome; `None` until settlement
    pub outcome: Option<Outcome>,

    /// Set by settlement, never cleared
    pub settled: bool,
}

impl Market {
    /// Create a new unresolved market.
    pub fn new(id: MarketId, question: String, creator: String, resolves_at: u64) -> Self {
        Self {
            id,
            question,
            creator,
            resolves_at,
            outcome: None,
            settled: false,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
