//! Settlement report summarizing the terminal transition of a market.
//!
//! The report is produced once per market, by settlement, and is the
//! reconciliation artifact: every mint locked one unit of collateral and
//! produced one winning token, so `collateral_forfeited` must equal
//! `winnings_paid` exactly. The payout digest lets an operator compare two
//! replays of the same settlement without dumping every account.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{MarketId, Outcome};

/// Summary of one market settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// The settled market
    pub market_id: MarketId,

    /// Final outcome applied
    pub outcome: Outcome,

    /// OPEN/PARTIAL orders moved to CANCELLED
    pub orders_cancelled: u64,

    /// Pre-locked funds returned for unfilled BUY remainders
    pub buy_refunds: Decimal,

    /// Winning-token redemptions paid out (one unit per token)
    pub winnings_paid: Decimal,

    /// Collateral released to sellers: reservations that never backed a mint
    pub collateral_returned: Decimal,

    /// Retained collateral consumed funding the winning redemptions;
    /// equals `winnings_paid`
    pub collateral_forfeited: Decimal,

    /// SHA-256 over the sorted payout lines
    pub payout_digest: [u8; 32],

    /// Settlement timestamp in milliseconds
    pub settled_at: u64,
}

impl SettlementReport {
    /// Digest of settlement payouts.
    ///
    /// Each line is `user:chain:credited_amount`. Lines are sorted before
    /// hashing so the digest is independent of account iteration order.
    pub fn digest_payouts(lines: &mut Vec<String>) -> [u8; 32] {
        lines.sort();
        let mut hasher = Sha256::new();
        for line in lines.iter() {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().into()
    }

    /// Hex form of the payout digest.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.payout_digest)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
