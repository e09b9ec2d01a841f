//! Exchange configuration.
//!
//! Each supported chain maps to a signature scheme and a verification flag.
//! A chain configured with `verify_signatures = false` is trusted without
//! verification, for development only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ChainId;

/// Signature scheme recognized for a chain family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureScheme {
    /// Solana-style: base58 wallet and detached ED25519 signature
    Ed25519,
    /// Cosmos-family: base64 session key, ADR-36 amino sign-doc, secp256k1
    CosmosAdr36,
}

/// Per-chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub scheme: SignatureScheme,
    pub verify_signatures: bool,
}

/// Top-level exchange configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Chains accepted for deposits and order signatures
    pub chains: HashMap<ChainId, ChainConfig>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        let mut chains = HashMap::new();
        chains.insert(
            "solana".to_string(),
            ChainConfig { scheme: SignatureScheme::Ed25519, verify_signatures: true },
        );
        chains.insert(
            "cosmoshub-4".to_string(),
            ChainConfig { scheme: SignatureScheme::CosmosAdr36, verify_signatures: true },
        );
        Self { chains }
    }
}

impl ExchangeConfig {
    /// Configuration with every chain trusted without verification.
    /// Development use only.
    pub fn trust_all() -> Self {
        let mut config = Self::default();
        for chain in config.chains.values_mut() {
            chain.verify_signatures = false;
        }
        config
    }

    /// Settings for one chain, if configured.
    pub fn chain(&self, chain_id: &str) -> Option<&ChainConfig> {
        self.chains.get(chain_id)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
