//! Trading engine: admission, matching, execution, settlement.
//!
//! ## Design Principles
//!
//! 1. **One writer per market**: every entry point runs under the market's
//!    serialization guard.
//! 2. **Exact arithmetic**: prices and money are `Decimal`, quantities are
//!    integers; no floating point anywhere in the engine.
//! 3. **Transactional steps**: admission is one ledger transaction, each
//!    fill is one, settlement is one. An abort leaves no partial effect.
//! 4. **Price-time priority**: best price first, then earliest admission.
//!
//! ## Control Flow
//!
//! ```text
//! admission (lock assets, insert OPEN)
//!     -> matcher (walk opposite book, one txn per fill)
//!         -> executor (pay, refund, deliver, mint)
//! settlement (cancel, refund, release, pay out, forfeit)
//! ```

pub mod admission;
pub mod executor;
pub mod matcher;
pub mod settlement;

pub use admission::{admit, NewOrder};
pub use matcher::MatchResult;
pub use settlement::settle;
