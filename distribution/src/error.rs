//! Distribution error types

use crate::payout::PayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("caller not whitelisted: {0}")]
    NotWhitelisted(String),

    #[error("snapshot interval not elapsed: now {now}, next allowed at {allowed_at}")]
    TooSoon { now: u64, allowed_at: u64 },

    #[error("snapshot {snapshot_id} already claimed by {account}")]
    AlreadyClaimed { snapshot_id: u64, account: String },

    #[error("{account} held no balance at snapshot {snapshot_id}")]
    NoBalanceAtSnapshot { snapshot_id: u64, account: String },

    #[error("zero total supply at snapshot {0}")]
    NoSupplyAtSnapshot(u64),

    #[error("no fund allocated to snapshot {0}")]
    NoFundAllocated(u64),

    #[error("payout transfer failed: {0}")]
    TransferFailed(#[from] PayoutError),

    #[error(transparent)]
    Ledger(#[from] ledger::LedgerError),

    #[error(transparent)]
    Access(#[from] access::AccessError),
}

pub type Result<T> = std::result::Result<T, DistributionError>;
