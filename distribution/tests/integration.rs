use distribution::{
    DistributionError, MemoryVault, PayoutSink, SharedSnapshotLedger, SnapshotLedger,
};
use std::thread;

const MIN_INTERVAL: u64 = 86400;

/// Owner deploys with zero balances, mints 300 units split equally across
/// three accounts, snapshots with a bound fund of 1000, and everyone
/// claims their third.
#[test]
fn test_full_distribution_flow() {
    let mut pool = SnapshotLedger::new("owner", MIN_INTERVAL);
    for account in ["alice", "bob", "carol"] {
        pool.balances_mut().mint(account, 100).unwrap();
    }
    assert_eq!(pool.balances().current_total_supply(), 300);

    let id = pool.create_snapshot("owner", 1000, 0).unwrap();
    assert_eq!(id, 1);
    assert_eq!(pool.fund_amount_of(1).unwrap(), 1000);

    let mut vault = MemoryVault::new();
    for account in ["alice", "bob", "carol"] {
        assert_eq!(pool.claim(account, 1, &mut vault).unwrap(), 333);
    }

    // Floor rounding: 999 paid, 1 unit of residue retained by design.
    assert_eq!(vault.total_paid(), 999);
    assert_eq!(pool.snapshot(1).unwrap().remaining_fund(), 1);

    let err = pool.claim("alice", 1, &mut vault).unwrap_err();
    assert!(matches!(err, DistributionError::AlreadyClaimed { .. }));

    // Interval gate around the second snapshot.
    let err = pool
        .create_snapshot("owner", 500, MIN_INTERVAL - 1)
        .unwrap_err();
    assert!(matches!(err, DistributionError::TooSoon { .. }));
    assert_eq!(pool.create_snapshot("owner", 500, MIN_INTERVAL).unwrap(), 2);
}

#[test]
fn test_snapshot_ids_are_dense_from_one() {
    let mut pool = SnapshotLedger::new("owner", 10);
    pool.balances_mut().mint("alice", 1).unwrap();
    for expect in 1..=5 {
        let id = pool.create_snapshot("owner", 0, expect * 10).unwrap();
        assert_eq!(id, expect);
    }
    assert_eq!(pool.snapshot_count(), 5);
}

#[test]
fn test_conservation_across_history() {
    let mut pool = SnapshotLedger::new("owner", 0);
    pool.balances_mut().mint("alice", 1000).unwrap();
    pool.create_snapshot("owner", 0, 0).unwrap();
    pool.balances_mut().transfer("alice", "bob", 400).unwrap();
    pool.create_snapshot("owner", 0, 1).unwrap();
    pool.balances_mut().transfer("bob", "carol", 150).unwrap();
    pool.balances_mut().mint("dave", 500).unwrap();
    pool.create_snapshot("owner", 0, 2).unwrap();
    pool.balances_mut().burn("alice", 100).unwrap();

    for s in 1..=3 {
        let accounts: Vec<String> = pool
            .balances()
            .accounts()
            .map(|(a, _)| a.to_string())
            .collect();
        let sum: u64 = accounts
            .iter()
            .map(|a| pool.balance_at(a, s).unwrap())
            .sum();
        assert_eq!(sum, pool.total_supply_at(s).unwrap());
    }
}

#[test]
fn test_whitelist_gate_and_grant() {
    let mut pool = SnapshotLedger::new("owner", 100);
    pool.balances_mut().mint("alice", 10).unwrap();

    let err = pool.create_snapshot("alice", 50, 0).unwrap_err();
    assert!(matches!(err, DistributionError::NotWhitelisted(_)));

    // Identical call succeeds once whitelisted.
    pool.whitelist_add("owner", "alice").unwrap();
    assert_eq!(pool.create_snapshot("alice", 50, 0).unwrap(), 1);

    pool.whitelist_remove("owner", "alice").unwrap();
    let err = pool.create_snapshot("alice", 50, 1000).unwrap_err();
    assert!(matches!(err, DistributionError::NotWhitelisted(_)));
}

#[test]
fn test_historical_shares_ignore_later_transfers() {
    let mut pool = SnapshotLedger::new("owner", 0);
    pool.balances_mut().mint("alice", 200).unwrap();
    pool.balances_mut().mint("bob", 200).unwrap();
    pool.create_snapshot("owner", 100, 0).unwrap();

    // Alice empties her account after the snapshot; her share is frozen.
    pool.balances_mut().transfer("alice", "bob", 200).unwrap();
    assert_eq!(pool.balances().current_balance("alice"), 0);

    let mut vault = MemoryVault::new();
    assert_eq!(pool.claim("alice", 1, &mut vault).unwrap(), 50);
    assert_eq!(pool.claim("bob", 1, &mut vault).unwrap(), 50);
}

#[test]
fn test_concurrent_claims_pay_once() {
    let shared = SharedSnapshotLedger::new(SnapshotLedger::new("owner", 0));
    shared.write(|pool| {
        pool.balances_mut().mint("alice", 100).unwrap();
        pool.balances_mut().mint("bob", 200).unwrap();
    });
    shared.create_snapshot("owner", 900, 0).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut vault = MemoryVault::new();
                let outcome = shared.claim("alice", 1, &mut vault);
                (outcome.is_ok(), vault.total_paid())
            })
        })
        .collect();

    let results: Vec<(bool, u64)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|(ok, _)| *ok).count();
    let paid: u64 = results.iter().map(|(_, amount)| amount).sum();

    // Exactly one thread wins; everyone else sees AlreadyClaimed.
    assert_eq!(successes, 1);
    assert_eq!(paid, 900 * 100 / 300);
    assert!(shared.has_claimed(1, "alice"));
}

#[test]
fn test_aggregate_serde_round_trip() {
    let mut pool = SnapshotLedger::new("owner", 60);
    pool.balances_mut().mint("alice", 100).unwrap();
    pool.balances_mut().mint("bob", 300).unwrap();
    pool.create_snapshot("owner", 1000, 5).unwrap();
    let mut vault = MemoryVault::new();
    pool.claim("alice", 1, &mut vault).unwrap();

    let json = pool.to_json().unwrap();
    let mut restored = SnapshotLedger::from_json(&json).unwrap();

    assert!(restored.has_claimed(1, "alice"));
    assert!(!restored.has_claimed(1, "bob"));
    assert_eq!(restored.fund_amount_of(1).unwrap(), 1000);
    assert_eq!(restored.last_snapshot_time(), Some(5));
    assert_eq!(restored.claim("bob", 1, &mut vault).unwrap(), 750);
}

/// A sink whose delivery fails, mimicking recipient-controlled code
/// rejecting the transfer. The claim record must already be set by then
/// and must survive the failure.
struct RejectingSink;

impl PayoutSink for RejectingSink {
    fn pay(
        &mut self,
        account: &str,
        amount: u64,
    ) -> std::result::Result<(), distribution::PayoutError> {
        Err(distribution::PayoutError::Rejected {
            account: account.to_string(),
            amount,
            reason: "no deposit address".to_string(),
        })
    }
}

#[test]
fn test_rejected_payout_burns_the_claim() {
    let mut pool = SnapshotLedger::new("owner", 0);
    pool.balances_mut().mint("alice", 100).unwrap();
    pool.create_snapshot("owner", 1000, 0).unwrap();

    let err = pool.claim("alice", 1, &mut RejectingSink).unwrap_err();
    assert!(matches!(err, DistributionError::TransferFailed(_)));

    // No retry: the at-most-once guarantee outranks eventual delivery.
    let mut vault = MemoryVault::new();
    let err = pool.claim("alice", 1, &mut vault).unwrap_err();
    assert!(matches!(err, DistributionError::AlreadyClaimed { .. }));
    assert_eq!(vault.total_paid(), 0);
}
