//! Ledger & progression engine for a multi-user virtual economy.
//!
//! Every user owns a wallet, a capacity-bounded safe, and an XP/level
//! track. All mutations run as single atomic store transactions behind
//! per-account locks: balance moves, safe tiers, cascading level-ups,
//! time-gated claims with streaks, the work cooldown, and the RNG wager
//! games. The command-dispatch and presentation layers live outside this
//! crate and only ever see typed results and typed failures.

pub mod claims;
pub mod clock;
pub mod config;
pub mod economy;
pub mod error;
pub mod games;
pub mod ledger;
mod locks;
pub mod progression;
pub mod rng;
pub mod safe;
pub mod store;
pub mod types;
pub mod work;
