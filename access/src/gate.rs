//! Owner and whitelist management

use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Single-owner gate with a whitelist of snapshot-creation principals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    owner: String,
    whitelist: HashSet<String>,
}

impl AccessControl {
    /// New gate owned by `owner`, with `owner` pre-whitelisted.
    pub fn new(owner: impl Into<String>) -> Self {
        let owner = owner.into();
        let mut whitelist = HashSet::new();
        whitelist.insert(owner.clone());
        Self { owner, whitelist }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn is_owner(&self, principal: &str) -> bool {
        self.owner == principal
    }

    pub fn require_owner(&self, principal: &str) -> Result<()> {
        if !self.is_owner(principal) {
            return Err(AccessError::Unauthorized(principal.to_string()));
        }
        Ok(())
    }

    /// One-step ownership transfer. The new owner is not implicitly
    /// whitelisted, and the old owner keeps any whitelist entry it had.
    pub fn transfer_ownership(&mut self, caller: &str, new_owner: impl Into<String>) -> Result<()> {
        self.require_owner(caller)?;
        self.owner = new_owner.into();
        log::info!("ownership transferred from {} to {}", caller, self.owner);
        Ok(())
    }

    /// Owner-only. Adding an already-listed principal is a no-op.
    pub fn whitelist_add(&mut self, caller: &str, principal: &str) -> Result<()> {
        self.require_owner(caller)?;
        if self.whitelist.insert(principal.to_string()) {
            log::info!("whitelisted {}", principal);
        }
        Ok(())
    }

    /// Owner-only. Removing an absent principal is a no-op.
    pub fn whitelist_remove(&mut self, caller: &str, principal: &str) -> Result<()> {
        self.require_owner(caller)?;
        if self.whitelist.remove(principal) {
            log::info!("removed {} from whitelist", principal);
        }
        Ok(())
    }

    pub fn is_whitelisted(&self, principal: &str) -> bool {
        self.whitelist.contains(principal)
    }

    pub fn whitelist_len(&self) -> usize {
        self.whitelist.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_gate() {
        let gate = AccessControl::new("owner");
        assert!(gate.is_owner("owner"));
        assert!(!gate.is_owner("mallory"));
        assert!(gate.require_owner("owner").is_ok());
        assert_eq!(
            gate.require_owner("mallory").unwrap_err(),
            AccessError::Unauthorized("mallory".to_string())
        );
    }

    #[test]
    fn test_whitelist_is_idempotent() {
        let mut gate = AccessControl::new("owner");
        gate.whitelist_add("owner", "alice").unwrap();
        gate.whitelist_add("owner", "alice").unwrap();
        assert!(gate.is_whitelisted("alice"));
        assert_eq!(gate.whitelist_len(), 2); // owner + alice

        gate.whitelist_remove("owner", "alice").unwrap();
        gate.whitelist_remove("owner", "alice").unwrap();
        assert!(!gate.is_whitelisted("alice"));
    }

    #[test]
    fn test_whitelist_requires_owner() {
        let mut gate = AccessControl::new("owner");
        assert!(gate.whitelist_add("alice", "alice").is_err());
        assert!(!gate.is_whitelisted("alice"));
        assert!(gate.whitelist_remove("alice", "owner").is_err());
        assert!(gate.is_whitelisted("owner"));
    }

    #[test]
    fn test_transfer_ownership() {
        let mut gate = AccessControl::new("owner");
        assert!(gate.transfer_ownership("mallory", "mallory").is_err());

        gate.transfer_ownership("owner", "new-owner").unwrap();
        assert!(gate.is_owner("new-owner"));
        assert!(!gate.is_owner("owner"));

        // Old owner loses admin rights but keeps its whitelist entry.
        assert!(gate.whitelist_add("owner", "bob").is_err());
        assert!(gate.is_whitelisted("owner"));
        gate.whitelist_add("new-owner", "bob").unwrap();
        assert!(gate.is_whitelisted("bob"));
    }
}
