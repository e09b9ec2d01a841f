//! Cosmos ADR-36 secp256k1 verification.
//!
//! ## Sign-Doc Shape
//!
//! ADR-36 wraps arbitrary bytes in a fixed amino `StdSignDoc` with zeroed
//! transaction fields and a single `sign/MsgSignData` message:
//!
//! ```json
//! {"account_number":"0","chain_id":"","fee":{"amount":[],"gas":"0"},
//!  "memo":"","msgs":[{"type":"sign/MsgSignData",
//!  "value":{"data":"<base64 message>","signer":"<address>"}}],
//!  "sequence":"0"}
//! ```
//!
//! Keys must appear in lexicographic order with no whitespace; the struct
//! fields below are declared in that order and serialized with
//! `serde_json`, which preserves declaration order. The serialized doc is
//! hashed with SHA-256 and the (r, s) signature is checked against the
//! session public key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::ecdsa::signature::DigestVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ExchangeError;

// ============================================================================
// Amino sign-doc
// ============================================================================

// Field declaration order is the amino canonical (lexicographic) order.
#[derive(Serialize)]
struct SignDoc {
    account_number: &'static str,
    chain_id: &'static str,
    fee: Fee,
    memo: &'static str,
    msgs: [MsgSignData; 1],
    sequence: &'static str,
}

#[derive(Serialize)]
struct Fee {
    amount: [&'static str; 0],
    gas: &'static str,
}

#[derive(Serialize)]
struct MsgSignData {
    #[serde(rename = "type")]
    kind: &'static str,
    value: MsgSignDataValue,
}

#[derive(Serialize)]
struct MsgSignDataValue {
    data: String,
    signer: String,
}

/// Serialize the ADR-36 sign-doc wrapping `message` for `signer`.
pub fn sign_doc_bytes(message: &[u8], signer: &str) -> Vec<u8> {
    let doc = SignDoc {
        account_number: "0",
        chain_id: "",
        fee: Fee { amount: [], gas: "0" },
        memo: "",
        msgs: [MsgSignData {
            kind: "sign/MsgSignData",
            value: MsgSignDataValue {
                data: BASE64.encode(message),
                signer: signer.to_string(),
            },
        }],
        sequence: "0",
    };
    serde_json::to_vec(&doc).expect("sign-doc serialization is infallible")
}

// ============================================================================
// Verification
// ============================================================================

/// Verify an ADR-36 signature over `message`.
///
/// `session_pubkey_b64` is the base64 SEC1 compressed secp256k1 key;
/// `signature_b64` is the base64 64-byte (r, s) pair.
pub fn verify(
    message: &[u8],
    session_address: &str,
    session_pubkey_b64: &str,
    signature_b64: &str,
) -> Result<(), ExchangeError> {
    let key_bytes = BASE64
        .decode(session_pubkey_b64)
        .map_err(|e| ExchangeError::MalformedSignature(format!("session key is not base64: {e}")))?;
    let key = VerifyingKey::from_sec1_bytes(&key_bytes).map_err(|_| {
        ExchangeError::MalformedSignature("session key is not a valid secp256k1 point".into())
    })?;

    let sig_bytes = BASE64
        .decode(signature_b64)
        .map_err(|e| ExchangeError::MalformedSignature(format!("signature is not base64: {e}")))?;
    let signature = Signature::from_slice(&sig_bytes)
        .map_err(|_| ExchangeError::MalformedSignature("signature must be a 64-byte r||s pair".into()))?;

    let doc = sign_doc_bytes(message, session_address);
    key.verify_digest(Sha256::new_with_prefix(&doc), &signature)
        .map_err(|_| ExchangeError::Unauthorized)
}

// ============================================================================
// Unit Tests
// ============================================================================
