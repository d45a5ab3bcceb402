//! Shared primitive types used across the engine.

/// A stable, platform-assigned user identifier.
pub type AccountId = String;

/// A currency amount. All balances and payouts are whole units.
pub type Coins = i64;

/// Unix timestamp in whole seconds, UTC.
pub type UnixTime = i64;
