//! Per-account serialization.
//!
//! The store transaction alone does not order two operations that both
//! read an account before either writes it back. Every mutating operation
//! therefore holds that account's mutex for its whole read-compute-write
//! span. Two-account operations take both locks in sorted id order so
//! opposing transfers cannot deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
pub(crate) struct AccountLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    /// The mutex for one account id, created on first use. Entries live
    /// for the process lifetime, like the account rows they mirror.
    pub fn handle(&self, id: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(id.to_string()).or_default().clone()
    }

    /// Handles for a pair of accounts, ordered so every caller locks the
    /// lexicographically smaller id first.
    pub fn handle_pair(&self, a: &str, b: &str) -> (Arc<Mutex<()>>, Arc<Mutex<()>>) {
        if a <= b {
            (self.handle(a), self.handle(b))
        } else {
            let (second, first) = (self.handle(a), self.handle(b));
            (first, second)
        }
    }
}
