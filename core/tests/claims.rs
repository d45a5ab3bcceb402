//! Claim scheduler tests — windows, streaks, grace periods.

use chrono::{Duration, TimeZone, Utc};
use guildbank_core::{
    clock::ManualClock,
    config::EconConfig,
    economy::Economy,
    error::EconError,
    rng::EconRng,
    store::{ClaimKind, EconStore},
};
use std::sync::Arc;

fn build() -> (Economy, Arc<ManualClock>) {
    let store = EconStore::in_memory().expect("in-memory store");
    store.migrate().expect("migrate");
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ));
    let economy = Economy::new(
        store,
        EconConfig::default_test(),
        clock.clone(),
        EconRng::seeded(0x5EED_0004),
    );
    (economy, clock)
}

/// The first daily claim pays the base amount and opens the streak at 1.
#[test]
fn first_daily_claim_opens_streak() {
    let (economy, _clock) = build();
    let daily = economy.config().claims.daily.clone();

    let outcome = economy.claim("alice", ClaimKind::Daily).unwrap();
    assert_eq!(outcome.amount, daily.amount);
    assert_eq!(outcome.streak, Some(1));
    assert_eq!(outcome.wallet, daily.amount);
}

/// Claiming twice inside the window fails TooSoon with time left; after
/// the window elapses the claim succeeds again.
#[test]
fn second_claim_inside_window_is_too_soon() {
    let (economy, clock) = build();

    economy.claim("alice", ClaimKind::Daily).unwrap();
    clock.advance(Duration::hours(6));

    let err = economy.claim("alice", ClaimKind::Daily).unwrap_err();
    match err {
        EconError::TooSoon { remaining_secs } => {
            assert!(remaining_secs > 0);
            assert_eq!(remaining_secs, 18 * 3600);
        }
        other => panic!("expected TooSoon, got {other:?}"),
    }

    clock.advance(Duration::hours(18));
    economy.claim("alice", ClaimKind::Daily).unwrap();
}

/// Claiming again at +30h (past the 24h window, inside the 48h grace)
/// bumps the streak to 2 and pays the streak bonus.
#[test]
fn streak_continues_inside_grace_window() {
    let (economy, clock) = build();
    let daily = economy.config().claims.daily.clone();

    economy.claim("alice", ClaimKind::Daily).unwrap();
    clock.advance(Duration::hours(30));

    let outcome = economy.claim("alice", ClaimKind::Daily).unwrap();
    assert_eq!(outcome.streak, Some(2));
    let bonus = (2.0 * daily.per_streak_bonus).min(daily.max_bonus);
    let expected = (daily.amount as f64 * (1.0 + bonus)).floor() as i64;
    assert_eq!(outcome.amount, expected);
}

/// Claiming at +50h (past the grace window) resets the streak to 1.
#[test]
fn streak_resets_past_grace_window() {
    let (economy, clock) = build();
    let daily = economy.config().claims.daily.clone();

    economy.claim("alice", ClaimKind::Daily).unwrap();
    clock.advance(Duration::hours(30));
    economy.claim("alice", ClaimKind::Daily).unwrap(); // streak 2
    clock.advance(Duration::hours(50));

    let outcome = economy.claim("alice", ClaimKind::Daily).unwrap();
    assert_eq!(outcome.streak, Some(1));
    let bonus = (1.0 * daily.per_streak_bonus).min(daily.max_bonus);
    let expected = (daily.amount as f64 * (1.0 + bonus)).floor() as i64;
    assert_eq!(outcome.amount, expected);
}

/// A claim made exactly when the window elapses keeps the streak: the
/// grace window is strictly longer than the claim window.
#[test]
fn on_time_claim_keeps_streak() {
    let (economy, clock) = build();

    economy.claim("alice", ClaimKind::Daily).unwrap();
    clock.advance(Duration::hours(24));

    let outcome = economy.claim("alice", ClaimKind::Daily).unwrap();
    assert_eq!(outcome.streak, Some(2));
}

/// The streak bonus is capped at the configured maximum.
#[test]
fn streak_bonus_is_capped() {
    let (economy, clock) = build();
    let daily = economy.config().claims.daily.clone();

    economy.claim("alice", ClaimKind::Daily).unwrap();
    // max_bonus 1.0 at +10% per streak day is reached at streak 10.
    for _ in 0..15 {
        clock.advance(Duration::hours(24));
        economy.claim("alice", ClaimKind::Daily).unwrap();
    }
    clock.advance(Duration::hours(24));
    let outcome = economy.claim("alice", ClaimKind::Daily).unwrap();
    assert_eq!(outcome.streak, Some(17));
    let expected = (daily.amount as f64 * (1.0 + daily.max_bonus)).floor() as i64;
    assert_eq!(outcome.amount, expected);
}

/// Weekly claims pay a fixed amount with no streak, on their own window.
#[test]
fn weekly_claim_is_fixed_amount() {
    let (economy, clock) = build();
    let weekly = economy.config().claims.weekly.clone();

    let outcome = economy.claim("alice", ClaimKind::Weekly).unwrap();
    assert_eq!(outcome.amount, weekly.amount);
    assert_eq!(outcome.streak, None);

    clock.advance(Duration::days(3));
    assert!(matches!(
        economy.claim("alice", ClaimKind::Weekly),
        Err(EconError::TooSoon { .. })
    ));

    clock.advance(Duration::days(4));
    let again = economy.claim("alice", ClaimKind::Weekly).unwrap();
    assert_eq!(again.amount, weekly.amount);
}

/// The four claim tracks are independent state machines.
#[test]
fn claim_kinds_are_independent() {
    let (economy, _clock) = build();

    economy.claim("alice", ClaimKind::Daily).unwrap();
    economy.claim("alice", ClaimKind::Weekly).unwrap();
    economy.claim("alice", ClaimKind::Monthly).unwrap();
    economy.claim("alice", ClaimKind::Yearly).unwrap();

    let claims = economy.config().claims.clone();
    let account = economy.peek_account("alice").unwrap().unwrap();
    let expected_coins =
        claims.daily.amount + claims.weekly.amount + claims.monthly.amount + claims.yearly.amount;
    // XP awards may have cascaded into level-up bonuses.
    assert!(account.wallet >= expected_coins);
}

/// Status is a pure read: it reports the window without creating state.
#[test]
fn status_reads_without_mutating() {
    let (economy, clock) = build();

    let fresh = economy.claim_status("alice", ClaimKind::Daily).unwrap();
    assert!(!fresh.claimed);
    assert_eq!(fresh.remaining_secs, 0);
    assert!(economy.peek_account("alice").unwrap().is_none());

    economy.claim("alice", ClaimKind::Daily).unwrap();
    clock.advance(Duration::hours(6));

    let status = economy.claim_status("alice", ClaimKind::Daily).unwrap();
    assert!(status.claimed);
    assert_eq!(status.remaining_secs, 18 * 3600);
    assert_eq!(status.streak, Some(1));

    clock.advance(Duration::hours(18));
    let ready = economy.claim_status("alice", ClaimKind::Daily).unwrap();
    assert!(!ready.claimed);
    assert_eq!(ready.remaining_secs, 0);
}

/// Each claim grants its kind's XP award in the same transaction.
#[test]
fn claims_grant_xp() {
    let (economy, _clock) = build();
    let daily_xp = economy.config().claims.daily.xp_award;

    economy.claim("alice", ClaimKind::Daily).unwrap();
    let account = economy.peek_account("alice").unwrap().unwrap();
    assert_eq!(account.xp, daily_xp);
}
