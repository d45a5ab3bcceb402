//! Concurrency tests — per-account serialization under parallel load.
//!
//! The engine promises that concurrent operations on the same account
//! never lose updates and that two-account operations cannot deadlock.

use chrono::{TimeZone, Utc};
use guildbank_core::{
    clock::ManualClock,
    config::EconConfig,
    economy::Economy,
    rng::EconRng,
    store::EconStore,
};
use std::sync::Arc;
use std::thread;

fn build_with(config: EconConfig) -> Arc<Economy> {
    let store = EconStore::in_memory().expect("in-memory store");
    store.migrate().expect("migrate");
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ));
    Arc::new(Economy::new(
        store,
        config,
        clock,
        EconRng::seeded(0x5EED_0007),
    ))
}

/// Parallel credits to one account must all land: no read-then-write
/// pair may observe a stale balance.
#[test]
fn concurrent_credits_sum_exactly() {
    let economy = build_with(EconConfig::default_test());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let economy = Arc::clone(&economy);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                economy.credit("alice", 10, "parallel").unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(
        economy.peek_account("alice").unwrap().unwrap().wallet,
        8 * 25 * 10
    );
}

/// Opposing transfers between the same two accounts finish without
/// deadlock (lock order is sorted) and conserve total value. XP is
/// disabled so level-up bonuses don't inject new value.
#[test]
fn opposing_transfers_conserve_and_complete() {
    let mut config = EconConfig::default_test();
    config.transfer.xp_award = 0;
    let economy = build_with(config);

    economy.credit("alice", 1_000, "seed").unwrap();
    economy.credit("bob", 1_000, "seed").unwrap();

    let a_to_b = {
        let economy = Arc::clone(&economy);
        thread::spawn(move || {
            for _ in 0..100 {
                // Either side may be momentarily broke; only the funds
                // error is acceptable.
                match economy.transfer("alice", "bob", 7) {
                    Ok(_) => {}
                    Err(err) => assert!(err.is_user_error(), "unexpected: {err}"),
                }
            }
        })
    };
    let b_to_a = {
        let economy = Arc::clone(&economy);
        thread::spawn(move || {
            for _ in 0..100 {
                match economy.transfer("bob", "alice", 11) {
                    Ok(_) => {}
                    Err(err) => assert!(err.is_user_error(), "unexpected: {err}"),
                }
            }
        })
    };
    a_to_b.join().expect("a->b thread panicked");
    b_to_a.join().expect("b->a thread panicked");

    let alice = economy.peek_account("alice").unwrap().unwrap();
    let bob = economy.peek_account("bob").unwrap().unwrap();
    assert_eq!(alice.wallet + bob.wallet, 2_000);
    assert!(alice.wallet >= 0 && bob.wallet >= 0);
}

/// A mixed parallel workload never breaks the balance invariants.
#[test]
fn mixed_operations_keep_invariants() {
    let economy = build_with(EconConfig::default_test());
    economy.credit("carol", 10_000, "seed").unwrap();

    let mut handles = Vec::new();
    for worker in 0..4 {
        let economy = Arc::clone(&economy);
        handles.push(thread::spawn(move || {
            for round in 0..50 {
                let result = match (worker + round) % 4 {
                    0 => economy.credit("carol", 25, "mix").map(|_| ()),
                    1 => economy.debit("carol", 40, "mix").map(|_| ()),
                    2 => economy.deposit("carol", 15).map(|_| ()),
                    _ => economy.withdraw("carol", 10).map(|_| ()),
                };
                if let Err(err) = result {
                    assert!(err.is_user_error(), "unexpected: {err}");
                }
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let account = economy.peek_account("carol").unwrap().unwrap();
    assert!(account.wallet >= 0);
    assert!(account.safe_balance >= 0);
    assert!(account.safe_balance <= account.safe_capacity);
}
