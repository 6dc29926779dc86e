//! Snapshot ledger aggregate
//!
//! Owns the versioned balance store, the access gate, per-snapshot fund
//! records, the claim table and the interval configuration. Every
//! state-changing operation takes `&mut self`, so the host's exclusive
//! borrow serializes mutations; multi-threaded hosts wrap this in
//! [`SharedSnapshotLedger`](crate::shared::SharedSnapshotLedger).

use crate::error::{DistributionError, Result};
use crate::payout::PayoutSink;
use crate::snapshot::SnapshotMeta;
use access::AccessControl;
use ledger::VersionedBalances;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Aggregate report over all snapshots, for operator tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionStats {
    pub snapshots: u64,
    pub total_fund_bound: u64,
    pub total_paid: u64,
    pub claims_recorded: u64,
}

/// Versioned balance ledger with snapshot-bound fund distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotLedger {
    balances: VersionedBalances,
    gate: AccessControl,
    /// Ordered by strictly increasing id; looked up by id, never by
    /// position.
    snapshots: Vec<SnapshotMeta>,
    claims: HashSet<(u64, String)>,
    min_interval: u64,
    /// None until the first snapshot; only moves forward afterwards.
    last_snapshot_time: Option<u64>,
    total_paid: u64,
}

impl SnapshotLedger {
    /// New empty ledger owned by `owner`, who starts whitelisted.
    pub fn new(owner: impl Into<String>, min_interval: u64) -> Self {
        Self {
            balances: VersionedBalances::new(),
            gate: AccessControl::new(owner),
            snapshots: Vec::new(),
            claims: HashSet::new(),
            min_interval,
            last_snapshot_time: None,
            total_paid: 0,
        }
    }

    /// The balance store, for read-only queries.
    pub fn balances(&self) -> &VersionedBalances {
        &self.balances
    }

    /// Mutable balance store: the surface the external transfer
    /// collaborator mutates through, so historical checkpointing fires.
    /// Sealing must go through [`create_snapshot`](Self::create_snapshot)
    /// so snapshot metadata stays aligned with the store.
    pub fn balances_mut(&mut self) -> &mut VersionedBalances {
        &mut self.balances
    }

    pub fn gate(&self) -> &AccessControl {
        &self.gate
    }

    /// Freeze the current balance distribution under a new id and bind
    /// `fund_amount` to it. `fund_amount` is treated as already held by
    /// the system when this is called; all fallible checks run before the
    /// first mutation, so a failed call leaves no trace.
    pub fn create_snapshot(&mut self, caller: &str, fund_amount: u64, now: u64) -> Result<u64> {
        if !self.gate.is_whitelisted(caller) {
            return Err(DistributionError::NotWhitelisted(caller.to_string()));
        }
        if let Some(last) = self.last_snapshot_time {
            let allowed_at = last.saturating_add(self.min_interval);
            if now < allowed_at {
                return Err(DistributionError::TooSoon { now, allowed_at });
            }
        }

        self.last_snapshot_time = Some(now);
        let id = self.balances.seal_snapshot();
        self.snapshots.push(SnapshotMeta {
            id,
            created_at: now,
            fund_amount,
            total_claimed: 0,
        });
        log::info!(
            "snapshot {} created by {} at t={} with fund {}",
            id,
            caller,
            now,
            fund_amount
        );
        Ok(id)
    }

    /// Convenience wrapper over [`create_snapshot`](Self::create_snapshot)
    /// using the system clock.
    pub fn create_snapshot_now(&mut self, caller: &str, fund_amount: u64) -> Result<u64> {
        self.create_snapshot(caller, fund_amount, crate::now_secs())
    }

    /// Pay `beneficiary` its proportional share of the fund bound to
    /// `snapshot_id`, at most once per (snapshot, beneficiary).
    ///
    /// The share is `floor(fund * balance / supply)`; summed over all
    /// claimants this never exceeds the fund, and the rounding residue is
    /// retained, never redistributed.
    ///
    /// The claim record is set before `sink.pay` runs, so a re-entrant
    /// call observes `AlreadyClaimed` instead of paying twice. If the
    /// sink rejects the payment, the record stays set: the beneficiary
    /// cannot retry (no-double-pay is favored over guaranteed delivery).
    /// Every other failure leaves the ledger untouched.
    pub fn claim(
        &mut self,
        beneficiary: &str,
        snapshot_id: u64,
        sink: &mut dyn PayoutSink,
    ) -> Result<u64> {
        let key = (snapshot_id, beneficiary.to_string());
        if self.claims.contains(&key) {
            return Err(DistributionError::AlreadyClaimed {
                snapshot_id,
                account: beneficiary.to_string(),
            });
        }

        // UnknownSnapshot surfaces here, before anything is marked.
        let balance = self.balances.balance_at(beneficiary, snapshot_id)?;
        if balance == 0 {
            return Err(DistributionError::NoBalanceAtSnapshot {
                snapshot_id,
                account: beneficiary.to_string(),
            });
        }
        let supply = self.balances.total_supply_at(snapshot_id)?;
        if supply == 0 {
            return Err(DistributionError::NoSupplyAtSnapshot(snapshot_id));
        }
        let meta_idx = self.snapshot_index(snapshot_id)?;
        let fund = self.snapshots[meta_idx].fund_amount;
        if fund == 0 {
            return Err(DistributionError::NoFundAllocated(snapshot_id));
        }

        // Widened so fund * balance cannot overflow; balance <= supply
        // keeps the quotient within u64.
        let paid = (fund as u128 * balance as u128 / supply as u128) as u64;

        // Marked before the outbound transfer, and kept on its failure.
        self.claims.insert(key);
        sink.pay(beneficiary, paid)?;

        let meta = &mut self.snapshots[meta_idx];
        meta.total_claimed = meta.total_claimed.saturating_add(paid);
        self.total_paid = self.total_paid.saturating_add(paid);
        log::info!(
            "claim served: snapshot {} paid {} to {}",
            snapshot_id,
            paid,
            beneficiary
        );
        Ok(paid)
    }

    /// Owner-only. Replaces the interval unconditionally; bounds are a
    /// policy decision left to the caller.
    pub fn set_min_interval(&mut self, caller: &str, new_interval: u64) -> Result<()> {
        self.gate.require_owner(caller)?;
        self.min_interval = new_interval;
        Ok(())
    }

    pub fn whitelist_add(&mut self, caller: &str, principal: &str) -> Result<()> {
        self.gate.whitelist_add(caller, principal)?;
        Ok(())
    }

    pub fn whitelist_remove(&mut self, caller: &str, principal: &str) -> Result<()> {
        self.gate.whitelist_remove(caller, principal)?;
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &str, new_owner: impl Into<String>) -> Result<()> {
        self.gate.transfer_ownership(caller, new_owner)?;
        Ok(())
    }

    pub fn is_whitelisted(&self, principal: &str) -> bool {
        self.gate.is_whitelisted(principal)
    }

    pub fn has_claimed(&self, snapshot_id: u64, account: &str) -> bool {
        self.claims.contains(&(snapshot_id, account.to_string()))
    }

    pub fn balance_at(&self, account: &str, snapshot_id: u64) -> Result<u64> {
        Ok(self.balances.balance_at(account, snapshot_id)?)
    }

    pub fn total_supply_at(&self, snapshot_id: u64) -> Result<u64> {
        Ok(self.balances.total_supply_at(snapshot_id)?)
    }

    /// Index of the meta recorded for `snapshot_id`. Metas are matched by
    /// their stored id: a seal driven through the balance store directly
    /// leaves an id with no meta, and that id must resolve to
    /// `UnknownSnapshot` rather than to a neighboring snapshot's fund.
    fn snapshot_index(&self, snapshot_id: u64) -> Result<usize> {
        self.snapshots
            .binary_search_by_key(&snapshot_id, |meta| meta.id)
            .map_err(|_| {
                ledger::LedgerError::UnknownSnapshot {
                    id: snapshot_id,
                    latest: self.snapshots.last().map_or(0, |meta| meta.id),
                }
                .into()
            })
    }

    pub fn snapshot(&self, snapshot_id: u64) -> Result<&SnapshotMeta> {
        let idx = self.snapshot_index(snapshot_id)?;
        Ok(&self.snapshots[idx])
    }

    pub fn fund_amount_of(&self, snapshot_id: u64) -> Result<u64> {
        Ok(self.snapshot(snapshot_id)?.fund_amount)
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshots.len() as u64
    }

    pub fn min_interval(&self) -> u64 {
        self.min_interval
    }

    pub fn last_snapshot_time(&self) -> Option<u64> {
        self.last_snapshot_time
    }

    pub fn stats(&self) -> DistributionStats {
        DistributionStats {
            snapshots: self.snapshots.len() as u64,
            total_fund_bound: self
                .snapshots
                .iter()
                .fold(0u64, |acc, s| acc.saturating_add(s.fund_amount)),
            total_paid: self.total_paid,
            claims_recorded: self.claims.len() as u64,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
