//! Error taxonomy surfaced to callers.
//!
//! Validation and authorization errors fail a request before any locking.
//! Business errors fail inside the admission transaction with rollback.
//! [`ExchangeError::LedgerInconsistency`] aborts the enclosing transaction
//! and is logged with diagnostic context; it should never reach a client in
//! normal operation. Transient errors may be retried by the caller.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::MarketId;

/// All errors produced by the exchange core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExchangeError {
    // --- Validation ---
    #[error("price must lie in [0, 1]: {0}")]
    InvalidPrice(String),

    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    #[error("invalid chain identifier: {0:?}")]
    InvalidChain(String),

    #[error("malformed signature payload: {0}")]
    MalformedSignature(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    // --- Authorization ---
    #[error("signature does not match the claimed wallet")]
    Unauthorized,

    #[error("no signature scheme configured for chain {0:?}")]
    UnsupportedChain(String),

    // --- Business ---
    #[error("user {user} not found on chain {chain}")]
    UserNotFound { user: String, chain: String },

    #[error("market {0} not found")]
    MarketNotFound(MarketId),

    #[error("market {0} is settled and closed to trading")]
    MarketClosed(MarketId),

    #[error("market {0} is already settled")]
    AlreadySettled(MarketId),

    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("insufficient tokens: need {required}, have {available}")]
    InsufficientTokens { required: u64, available: u64 },

    // --- Integrity ---
    #[error("ledger inconsistency: {0}")]
    LedgerInconsistency(String),

    // --- Transient ---
    #[error("ledger temporarily unavailable")]
    Unavailable,

    #[error("deadline expired before the operation committed")]
    DeadlineExceeded,
}

impl ExchangeError {
    /// Stable code name for transport adapters.
    pub fn code(&self) -> &'static str {
        match self {
            ExchangeError::InvalidPrice(_) => "InvalidPrice",
            ExchangeError::InvalidQuantity => "InvalidQuantity",
            ExchangeError::InvalidChain(_) => "InvalidChain",
            ExchangeError::MalformedSignature(_) => "MalformedSignature",
            ExchangeError::MissingField(_) => "MissingField",
            ExchangeError::Unauthorized => "Unauthorized",
            ExchangeError::UnsupportedChain(_) => "UnsupportedChain",
            ExchangeError::UserNotFound { .. } => "UserNotFound",
            ExchangeError::MarketNotFound(_) => "MarketNotFound",
            ExchangeError::MarketClosed(_) => "MarketClosed",
            ExchangeError::AlreadySettled(_) => "AlreadySettled",
            ExchangeError::InsufficientFunds { .. } => "InsufficientFunds",
            ExchangeError::InsufficientTokens { .. } => "InsufficientTokens",
            ExchangeError::LedgerInconsistency(_) => "LedgerInconsistency",
            ExchangeError::Unavailable => "Unavailable",
            ExchangeError::DeadlineExceeded => "DeadlineExceeded",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExchangeError::Unavailable | ExchangeError::DeadlineExceeded)
    }
}

/// Structured error shape handed to transport adapters.
///
/// Adapters map [`ErrorBody::error`] to their native status codes; the
/// detail string is human-readable only.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub detail: String,
}

impl From<&ExchangeError> for ErrorBody {
    fn from(err: &ExchangeError) -> Self {
        Self {
            success: false,
            error: err.code(),
            detail: err.to_string(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
