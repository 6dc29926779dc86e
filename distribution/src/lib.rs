//! Snapshot creation and proportional fund distribution
//!
//! Ties the versioned balance store and the access gate together into a
//! single owned aggregate: whitelisted principals freeze the current
//! balance distribution into numbered snapshots with a fund bound at
//! creation, and anyone may then trigger payout of an account's
//! proportional share of that fund, at most once per (snapshot, account).

pub mod error;
pub mod payout;
pub mod pool;
pub mod shared;
pub mod snapshot;

pub use error::{DistributionError, Result};
pub use payout::{MemoryVault, PayoutError, PayoutSink};
pub use pool::{DistributionStats, SnapshotLedger};
pub use shared::SharedSnapshotLedger;
pub use snapshot::SnapshotMeta;

/// Current unix time in seconds, for callers without their own clock.
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
