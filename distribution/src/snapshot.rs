//! Snapshot metadata

use serde::{Deserialize, Serialize};

/// Immutable record of one snapshot. `id` and `created_at` and
/// `fund_amount` are fixed at creation; only the `total_claimed` audit
/// counter advances as claims are paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Dense, strictly increasing, starts at 1.
    pub id: u64,
    /// Unix seconds, as supplied by the creating caller.
    pub created_at: u64,
    /// Fund bound at creation and distributed proportionally to
    /// balance-at-snapshot across claims.
    pub fund_amount: u64,
    /// Sum of all payouts served for this snapshot so far. Floor rounding
    /// keeps this at or below `fund_amount`.
    pub total_claimed: u64,
}

impl SnapshotMeta {
    /// Fund still undistributed: unclaimed shares plus rounding residue.
    pub fn remaining_fund(&self) -> u64 {
        self.fund_amount - self.total_claimed
    }
}
