//! Solana-style ED25519 verification.
//!
//! The wallet address is the base58-encoded 32-byte public key; the
//! signature is a base58-encoded 64-byte detached signature over the raw
//! message bytes.

use ed25519_dalek::{Signature, VerifyingKey};

use crate::error::ExchangeError;

/// Verify a detached ED25519 signature over `message`.
pub fn verify(message: &[u8], wallet_b58: &str, signature_b58: &str) -> Result<(), ExchangeError> {
    let key_bytes = bs58::decode(wallet_b58)
        .into_vec()
        .map_err(|e| ExchangeError::MalformedSignature(format!("wallet is not base58: {e}")))?;
    let key_bytes: [u8; 32] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| ExchangeError::MalformedSignature("wallet key must be 32 bytes".into()))?;
    let key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|_| ExchangeError::MalformedSignature("wallet is not a valid ED25519 key".into()))?;

    let sig_bytes = bs58::decode(signature_b58)
        .into_vec()
        .map_err(|e| ExchangeError::MalformedSignature(format!("signature is not base58: {e}")))?;
    let sig_bytes: [u8; 64] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| ExchangeError::MalformedSignature("signature must be 64 bytes".into()))?;
    let signature = Signature::from_bytes(&sig_bytes);

    key.verify_strict(message, &signature)
        .map_err(|_| ExchangeError::Unauthorized)
}

// ============================================================================
// Unit Tests
// ============================================================================
