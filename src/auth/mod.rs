//! Order signature verification.
//!
//! ## Canonical Message
//!
//! Every order is authorized by a signature over the fixed-format string
//!
//! ```text
//! order:{marketId}:{userId}:{side}:{price}:{quantity}:{tokenType}
//! ```
//!
//! encoded as UTF-8 with no trailing newline. The price appears in the
//! exact textual form the client transmitted, so callers pass the wire
//! string through untouched.
//!
//! ## Schemes
//!
//! - [`SignatureScheme::Ed25519`]: base58 wallet and detached signature,
//!   Solana-style ([`ed25519`])
//! - [`SignatureScheme::CosmosAdr36`]: base64 session key and signature,
//!   ADR-36 amino sign-doc, secp256k1 ([`adr36`])
//!
//! A chain configured with `verify_signatures = false` skips verification
//! entirely (development mode).

pub mod adr36;
pub mod ed25519;

use tracing::trace;

use crate::config::{ExchangeConfig, SignatureScheme};
use crate::error::ExchangeError;
use crate::types::{MarketId, Outcome, Side};

// ============================================================================
// Order intent
// ============================================================================

/// The order parameters covered by the client's signature.
#[derive(Debug, Clone, Copy)]
pub struct OrderIntent<'a> {
    pub market_id: MarketId,
    pub user_id: &'a str,
    pub side: Side,
    /// Price exactly as transmitted, preserved for reconstruction
    pub price_text: &'a str,
    pub quantity: u64,
    pub outcome: Outcome,
}

impl OrderIntent<'_> {
    /// Render the canonical signed message.
    pub fn canonical_message(&self) -> String {
        format!(
            "order:{}:{}:{}:{}:{}:{}",
            self.market_id,
            self.user_id,
            self.side.as_str(),
            self.price_text,
            self.quantity,
            self.outcome.as_str(),
        )
    }
}

/// Signature material supplied with an order request.
#[derive(Debug, Clone, Copy)]
pub struct SignatureBundle<'a> {
    pub wallet_address: &'a str,
    pub signature: &'a str,
    /// Cosmos-family only
    pub session_public_key: Option<&'a str>,
    /// Cosmos-family only
    pub session_address: Option<&'a str>,
}

// ============================================================================
// Verification entry point
// ============================================================================

/// Verify that `intent` was authorized by the claimed wallet on `chain_id`.
///
/// Fails with [`ExchangeError::InvalidChain`] for a blank chain,
/// [`ExchangeError::UnsupportedChain`] for an unconfigured one,
/// [`ExchangeError::MalformedSignature`] for undecodable material,
/// [`ExchangeError::MissingField`] for absent Cosmos session fields, and
/// [`ExchangeError::Unauthorized`] on signature mismatch.
pub fn verify_order(
    config: &ExchangeConfig,
    chain_id: &str,
    intent: &OrderIntent<'_>,
    bundle: &SignatureBundle<'_>,
) -> Result<(), ExchangeError> {
    if chain_id.trim().is_empty() {
        return Err(ExchangeError::InvalidChain(chain_id.to_string()));
    }
    let chain = config
        .chain(chain_id)
        .ok_or_else(|| ExchangeError::UnsupportedChain(chain_id.to_string()))?;

    if !chain.verify_signatures {
        trace!(chain_id, "signature verification disabled for chain");
        return Ok(());
    }

    let message = intent.canonical_message();
    match chain.scheme {
        SignatureScheme::Ed25519 => {
            ed25519::verify(message.as_bytes(), bundle.wallet_address, bundle.signature)
        }
        SignatureScheme::CosmosAdr36 => {
            let pubkey = bundle
                .session_public_key
                .ok_or(ExchangeError::MissingField("session_public_key"))?;
            let signer = bundle
                .session_address
                .ok_or(ExchangeError::MissingField("session_address"))?;
            adr36::verify(message.as_bytes(), signer, pubkey, bundle.signature)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
