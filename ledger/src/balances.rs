//! Checkpoint-based balance versioning
//!
//! Every tracked value (each account balance, plus the aggregate total
//! supply) is a live `u64` together with an ordered checkpoint log.
//! Sealing a snapshot only bumps a counter; the first mutation of a value
//! after a seal pushes one checkpoint recording the pre-mutation value
//! under the snapshot id just crossed. Historical reads binary-search the
//! log, falling back to the live value when no later checkpoint exists.
//! Storage is O(changes), not O(accounts x snapshots).

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recorded (snapshot id, value) pair: the value a balance held at the
/// moment the given snapshot was sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub snapshot_id: u64,
    pub value: u64,
}

/// One versioned value: live state plus its checkpoint log, ordered by
/// strictly increasing snapshot id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ValueHistory {
    checkpoints: Vec<Checkpoint>,
    live: u64,
}

impl ValueHistory {
    /// Record the pre-mutation value for `sealed` if no checkpoint covers
    /// it yet. Must run before every mutation of `live`.
    fn checkpoint(&mut self, sealed: u64) {
        if sealed == 0 {
            return;
        }
        let covered = self
            .checkpoints
            .last()
            .is_some_and(|c| c.snapshot_id >= sealed);
        if !covered {
            self.checkpoints.push(Checkpoint {
                snapshot_id: sealed,
                value: self.live,
            });
        }
    }

    fn set(&mut self, sealed: u64, value: u64) {
        self.checkpoint(sealed);
        self.live = value;
    }

    /// Value at the moment snapshot `id` was sealed. The caller has already
    /// validated `1 <= id <= sealed`.
    fn value_at(&self, id: u64) -> u64 {
        let idx = self.checkpoints.partition_point(|c| c.snapshot_id < id);
        match self.checkpoints.get(idx) {
            Some(c) => c.value,
            None => self.live,
        }
    }

    fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }
}

/// Account balances and total supply with snapshot history.
///
/// The external transfer collaborator routes every balance mutation through
/// [`mint`](Self::mint), [`burn`](Self::burn) or
/// [`transfer`](Self::transfer) so the lazy checkpointing hook fires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionedBalances {
    accounts: HashMap<String, ValueHistory>,
    supply: ValueHistory,
    sealed: u64,
}

impl VersionedBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance; zero for accounts the store has never seen.
    pub fn current_balance(&self, account: &str) -> u64 {
        self.accounts.get(account).map_or(0, |h| h.live)
    }

    pub fn current_total_supply(&self) -> u64 {
        self.supply.live
    }

    /// Id of the most recently sealed snapshot; zero if none yet.
    pub fn latest_snapshot(&self) -> u64 {
        self.sealed
    }

    /// Freeze the current balance distribution under the next id.
    ///
    /// O(1): no checkpoint is written here. The frozen view materializes
    /// lazily as values mutate afterwards, and stays queryable forever.
    pub fn seal_snapshot(&mut self) -> u64 {
        self.sealed += 1;
        log::debug!("sealed balance snapshot {}", self.sealed);
        self.sealed
    }

    fn check_sealed(&self, id: u64) -> Result<()> {
        if id == 0 || id > self.sealed {
            return Err(LedgerError::UnknownSnapshot {
                id,
                latest: self.sealed,
            });
        }
        Ok(())
    }

    /// Balance of `account` at the moment snapshot `id` was sealed.
    pub fn balance_at(&self, account: &str, id: u64) -> Result<u64> {
        self.check_sealed(id)?;
        Ok(self.accounts.get(account).map_or(0, |h| h.value_at(id)))
    }

    /// Total supply at the moment snapshot `id` was sealed.
    pub fn total_supply_at(&self, id: u64) -> Result<u64> {
        self.check_sealed(id)?;
        Ok(self.supply.value_at(id))
    }

    /// Create new units and credit them to `account`.
    pub fn mint(&mut self, account: &str, amount: u64) -> Result<()> {
        let new_supply = self
            .supply
            .live
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        let sealed = self.sealed;
        self.supply.set(sealed, new_supply);
        let holder = self.accounts.entry(account.to_string()).or_default();
        // Balance is bounded by total supply, which was checked above.
        let new_balance = holder.live + amount;
        holder.set(sealed, new_balance);
        Ok(())
    }

    /// Destroy units held by `account`, shrinking total supply.
    pub fn burn(&mut self, account: &str, amount: u64) -> Result<()> {
        let available = self.current_balance(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.to_string(),
                requested: amount,
                available,
            });
        }
        let sealed = self.sealed;
        if let Some(holder) = self.accounts.get_mut(account) {
            holder.set(sealed, available - amount);
        }
        let new_supply = self.supply.live - amount;
        self.supply.set(sealed, new_supply);
        Ok(())
    }

    /// Move units between accounts. Total supply is unchanged.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()> {
        let available = self.current_balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.to_string(),
                requested: amount,
                available,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let sealed = self.sealed;
        let sender = self.accounts.entry(from.to_string()).or_default();
        sender.set(sealed, available - amount);
        let recipient = self.accounts.entry(to.to_string()).or_default();
        let credited = recipient
            .live
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        recipient.set(sealed, credited);
        Ok(())
    }

    /// Every account the store has ever tracked, with its current balance.
    /// Includes accounts whose live balance has since dropped to zero.
    pub fn accounts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.accounts.iter().map(|(a, h)| (a.as_str(), h.live))
    }

    /// Checkpoints recorded for one account; zero for unknown accounts.
    pub fn checkpoint_count(&self, account: &str) -> usize {
        self.accounts
            .get(account)
            .map_or(0, |h| h.checkpoint_count())
    }
}
