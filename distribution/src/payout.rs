//! Outbound payout capability
//!
//! The claim engine never moves funds itself; it pays through an injected
//! [`PayoutSink`]. Delivering to an arbitrary recipient may run
//! recipient-controlled code, so the engine marks the claim record before
//! calling [`PayoutSink::pay`], and a sink failure does not unmark it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayoutError {
    #[error("recipient {account} rejected payment of {amount}: {reason}")]
    Rejected {
        account: String,
        amount: u64,
        reason: String,
    },
}

/// Capability to deliver funds to an account.
pub trait PayoutSink {
    fn pay(&mut self, account: &str, amount: u64) -> Result<(), PayoutError>;
}

/// In-memory sink that accumulates payouts per account. Suitable for
/// embedders that settle balances elsewhere, and for tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryVault {
    credits: HashMap<String, u64>,
    total_paid: u64,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credited(&self, account: &str) -> u64 {
        self.credits.get(account).copied().unwrap_or(0)
    }

    pub fn total_paid(&self) -> u64 {
        self.total_paid
    }
}

impl PayoutSink for MemoryVault {
    fn pay(&mut self, account: &str, amount: u64) -> Result<(), PayoutError> {
        *self.credits.entry(account.to_string()).or_default() += amount;
        self.total_paid += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_vault_accumulates() {
        let mut vault = MemoryVault::new();
        vault.pay("alice", 10).unwrap();
        vault.pay("alice", 5).unwrap();
        vault.pay("bob", 7).unwrap();
        assert_eq!(vault.credited("alice"), 15);
        assert_eq!(vault.credited("bob"), 7);
        assert_eq!(vault.credited("carol"), 0);
        assert_eq!(vault.total_paid(), 22);
    }
}
