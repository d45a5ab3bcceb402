//! Safe sub-account tests — deposit, withdraw, tier upgrades.

use chrono::{TimeZone, Utc};
use guildbank_core::{
    clock::ManualClock,
    config::EconConfig,
    economy::Economy,
    error::EconError,
    rng::EconRng,
    safe::{capacity_for, upgrade_cost},
    store::EconStore,
};
use std::sync::Arc;

fn build() -> Economy {
    build_with(EconConfig::default_test())
}

fn build_with(config: EconConfig) -> Economy {
    let store = EconStore::in_memory().expect("in-memory store");
    store.migrate().expect("migrate");
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ));
    Economy::new(store, config, clock, EconRng::seeded(0x5EED_0002))
}

/// Deposits move value; wallet + safe is conserved.
#[test]
fn deposit_moves_value_conserving_total() {
    let economy = build();
    economy.credit("alice", 3000, "seed").unwrap();

    let moved = economy.deposit("alice", 1200).unwrap();
    assert_eq!(moved.wallet, 1800);
    assert_eq!(moved.safe_balance, 1200);
    assert_eq!(moved.wallet + moved.safe_balance, 3000);
}

#[test]
fn deposit_requires_wallet_funds() {
    let economy = build();
    economy.credit("alice", 100, "seed").unwrap();
    assert!(matches!(
        economy.deposit("alice", 500),
        Err(EconError::InsufficientFunds { .. })
    ));
}

/// A deposit that would overflow the safe fails SafeFull and changes
/// neither balance. Capacity 10000, safe at 9000, deposit 2000.
#[test]
fn deposit_over_capacity_fails_safe_full() {
    let mut config = EconConfig::default_test();
    config.safe.base_capacity = 10_000;
    let economy = build_with(config);

    economy.credit("alice", 20_000, "seed").unwrap();
    economy.deposit("alice", 9_000).unwrap();

    let err = economy.deposit("alice", 2_000).unwrap_err();
    assert!(matches!(err, EconError::SafeFull { space: 1_000 }));

    let account = economy.peek_account("alice").unwrap().unwrap();
    assert_eq!(account.safe_balance, 9_000);
    assert_eq!(account.wallet, 11_000);
}

#[test]
fn withdraw_requires_safe_funds() {
    let economy = build();
    economy.credit("alice", 1000, "seed").unwrap();
    economy.deposit("alice", 400).unwrap();
    assert!(matches!(
        economy.withdraw("alice", 500),
        Err(EconError::InsufficientSafeFunds {
            needed: 500,
            available: 400
        })
    ));
}

/// Withdrawing into a capped wallet fails when the cap would be crossed.
#[test]
fn withdraw_respects_wallet_cap() {
    let mut config = EconConfig::default_test();
    config.wallet.max_wallet = Some(1000);
    let economy = build_with(config);

    economy.credit("alice", 900, "seed").unwrap();
    economy.deposit("alice", 500).unwrap(); // wallet 400, safe 500

    let err = economy.withdraw("alice", 700).unwrap_err();
    assert!(matches!(err, EconError::WalletLimitExceeded { limit: 1000 }));

    let account = economy.peek_account("alice").unwrap().unwrap();
    assert_eq!(account.wallet, 400);
    assert_eq!(account.safe_balance, 500);

    // Withdrawing an amount that fits under the cap is fine.
    let moved = economy.withdraw("alice", 500).unwrap();
    assert_eq!(moved.wallet, 900);
    assert_eq!(moved.safe_balance, 0);
}

/// Upgrade cost grows exponentially with the current tier.
#[test]
fn upgrade_cost_is_exponential_in_tier() {
    let config = EconConfig::default_test();
    // base 10000, multiplier 1.75
    assert_eq!(upgrade_cost(&config.safe, 1), 10_000);
    assert_eq!(upgrade_cost(&config.safe, 2), 17_500);
    assert_eq!(upgrade_cost(&config.safe, 3), 30_625);
}

/// Each upgrade bumps the tier by one and recomputes capacity from it.
#[test]
fn upgrade_increments_tier_and_recomputes_capacity() {
    let economy = build();
    let safe_config = economy.config().safe.clone();
    economy.credit("alice", 100_000, "seed").unwrap();

    let first = economy.upgrade_safe("alice").unwrap();
    assert_eq!(first.tier, 2);
    assert_eq!(first.capacity, capacity_for(&safe_config, 2));
    assert_eq!(first.cost, upgrade_cost(&safe_config, 1));

    let second = economy.upgrade_safe("alice").unwrap();
    assert_eq!(second.tier, 3);
    assert_eq!(second.capacity, capacity_for(&safe_config, 3));
    assert_eq!(second.cost, upgrade_cost(&safe_config, 2));

    // The fees were destroyed, not moved anywhere.
    let account = economy.peek_account("alice").unwrap().unwrap();
    assert_eq!(account.wallet, 100_000 - first.cost - second.cost);
    assert_eq!(account.safe_balance, 0);
}

#[test]
fn upgrade_requires_wallet_funds() {
    let economy = build();
    economy.credit("alice", 100, "seed").unwrap();
    let err = economy.upgrade_safe("alice").unwrap_err();
    assert!(matches!(err, EconError::InsufficientFunds { .. }));
    let account = economy.peek_account("alice").unwrap().unwrap();
    assert_eq!(account.safe_tier, 1);
    assert_eq!(account.wallet, 100);
}
