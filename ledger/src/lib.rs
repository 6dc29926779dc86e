//! Versioned balance store
//!
//! Tracks current account balances and total supply, and answers
//! point-in-time queries ("balance of A at snapshot S") for any sealed
//! snapshot without copying the balance table per snapshot. History is
//! kept as per-value checkpoint logs written lazily on mutation.

pub mod balances;
pub mod error;

pub use balances::{Checkpoint, VersionedBalances};
pub use error::{LedgerError, Result};
