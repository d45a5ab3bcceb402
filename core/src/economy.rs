//! The engine facade — owns the store, ruleset, clock, locks, and RNG.
//!
//! Every public operation is one atomic unit: take the per-account
//! lock(s), open one store transaction, read state, compute, write state,
//! append the audit entry, commit. A failure anywhere rolls the whole
//! unit back; nothing partial is ever observable. Operations never retry —
//! one attempt per call, the dispatch layer may re-invoke.

use crate::{
    clock::{Clock, SystemClock},
    config::EconConfig,
    error::EconResult,
    locks::AccountLocks,
    rng::EconRng,
    store::{Account, EconStore, StoreTx},
    types::UnixTime,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};

pub struct Economy {
    store: Mutex<EconStore>,
    config: EconConfig,
    clock: Arc<dyn Clock>,
    rng: Mutex<EconRng>,
    locks: AccountLocks,
}

impl Economy {
    pub fn new(store: EconStore, config: EconConfig, clock: Arc<dyn Clock>, rng: EconRng) -> Self {
        Self {
            store: Mutex::new(store),
            config,
            clock,
            rng: Mutex::new(rng),
            locks: AccountLocks::default(),
        }
    }

    /// Open (and migrate) a database file and wire the production clock
    /// and an entropy-seeded RNG around it.
    pub fn open(path: &str, config: EconConfig) -> EconResult<Self> {
        let store = EconStore::open(path)?;
        store.migrate()?;
        Ok(Self::new(
            store,
            config,
            Arc::new(SystemClock),
            EconRng::from_entropy(),
        ))
    }

    /// In-memory engine for tests and tooling.
    pub fn in_memory(config: EconConfig) -> EconResult<Self> {
        let store = EconStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(
            store,
            config,
            Arc::new(SystemClock),
            EconRng::from_entropy(),
        ))
    }

    pub fn config(&self) -> &EconConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn now_ts(&self) -> UnixTime {
        self.clock.now().timestamp()
    }

    pub(crate) fn draw<T>(&self, f: impl FnOnce(&mut EconRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Shared read access to the store for operations that mutate nothing.
    pub(crate) fn store_read(&self) -> std::sync::MutexGuard<'_, EconStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One atomic operation on one account: lock it, run `f` inside a
    /// fresh store transaction.
    pub(crate) fn with_account<T>(
        &self,
        id: &str,
        f: impl FnOnce(&StoreTx<'_>) -> EconResult<T>,
    ) -> EconResult<T> {
        let handle = self.locks.handle(id);
        let _held = handle.lock().unwrap_or_else(PoisonError::into_inner);
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.transaction(f)
    }

    /// Two-account variant; locks are taken in sorted id order. The ids
    /// must differ — callers reject self-targeting before getting here.
    pub(crate) fn with_account_pair<T>(
        &self,
        a: &str,
        b: &str,
        f: impl FnOnce(&StoreTx<'_>) -> EconResult<T>,
    ) -> EconResult<T> {
        debug_assert_ne!(a, b, "pair operations need two distinct accounts");
        let (first, second) = self.locks.handle_pair(a, b);
        let _held_first = first.lock().unwrap_or_else(PoisonError::into_inner);
        let _held_second = second.lock().unwrap_or_else(PoisonError::into_inner);
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.transaction(f)
    }

    /// Fetch an account inside a transaction, provisioning it lazily with
    /// the ruleset's starting safe capacity.
    pub(crate) fn fetch(&self, tx: &StoreTx<'_>, id: &str) -> EconResult<Account> {
        tx.get_or_create_account(id, self.config.safe.base_capacity, self.now_ts())
    }

    // ── Account surface for the dispatch layer ─────────────────

    /// Get-or-create view of an account. Viewing a profile provisions it.
    pub fn profile(&self, id: &str) -> EconResult<Account> {
        self.with_account(id, |tx| self.fetch(tx, id))
    }

    /// Read-only peek: no lock, no provisioning.
    pub fn peek_account(&self, id: &str) -> EconResult<Option<Account>> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.account(id)
    }

    /// Called by the dispatch layer once per executed command. Returns the
    /// new counter value.
    pub fn record_command(&self, id: &str) -> EconResult<i64> {
        self.with_account(id, |tx| {
            let account = self.fetch(tx, id)?;
            tx.bump_command_count(id)?;
            Ok(account.total_commands + 1)
        })
    }

    /// Housekeeping: drop expired cooldown rows. Returns how many went.
    pub fn reap_expired_cooldowns(&self) -> EconResult<usize> {
        let now = self.now_ts();
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.transaction(|tx| tx.reap_cooldowns(now))
    }

    /// Audit log for one account, oldest first. Tooling and tests.
    pub fn ledger_entries(&self, id: &str) -> EconResult<Vec<crate::store::LedgerEntry>> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.entries_for(id)
    }
}
