//! XP accrual and cascading level-ups.
//!
//! A single grant can cross several thresholds at once (bulk XP boosts),
//! so settling loops: consume the requirement, bump the level, pay the
//! bonus, repeat until XP sits below the next threshold or the level cap
//! is reached. An account is never left holding more XP than the next
//! threshold unless it is at max level.

use crate::{
    config::ProgressionConfig,
    economy::Economy,
    error::{EconError, EconResult},
    store::{Account, EntryKind, StoreTx},
    types::UnixTime,
};
use serde::Serialize;

/// What one XP grant did to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpGrant {
    pub level: u32,
    pub xp: i64,
    pub leveled_up: bool,
    pub new_level: Option<u32>,
    pub levels_gained: u32,
    /// Total level-up bonus credited to the wallet by this grant.
    pub bonus_paid: i64,
}

impl XpGrant {
    fn unchanged(account: &Account) -> Self {
        Self {
            level: account.level,
            xp: account.xp,
            leveled_up: false,
            new_level: None,
            levels_gained: 0,
            bonus_paid: 0,
        }
    }
}

/// XP required to advance from `level` to `level + 1`.
pub fn required_xp(config: &ProgressionConfig, level: u32) -> i64 {
    (config.base_xp as f64 * config.xp_multiplier.powi(level as i32 - 1)).floor() as i64
}

impl Economy {
    /// Standalone XP grant: opens its own transaction.
    pub fn grant_xp(&self, id: &str, amount: i64, source: &str) -> EconResult<XpGrant> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            let grant = grant_xp_tx(
                tx,
                &mut account,
                amount,
                source,
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(grant)
        })
    }
}

/// In-transaction XP grant, for composing inside an already-open
/// operation (transfers, claims, wagers) so the whole unit commits or
/// rolls back together. Mutates `account` and appends audit entries; the
/// caller saves the account once at the end of its operation.
///
/// A zero or negative amount is a no-op returning current state.
pub(crate) fn grant_xp_tx(
    tx: &StoreTx<'_>,
    account: &mut Account,
    amount: i64,
    source: &str,
    config: &ProgressionConfig,
    now: UnixTime,
) -> EconResult<XpGrant> {
    if amount <= 0 {
        return Ok(XpGrant::unchanged(account));
    }

    account.xp += amount;
    tx.append_entry(&account.account_id, EntryKind::Xp, amount, source, now)?;

    let start_level = account.level;
    let mut bonus_paid = 0i64;
    while account.level < config.max_level && account.xp >= required_xp(config, account.level) {
        account.xp -= required_xp(config, account.level);
        account.level += 1;
        bonus_paid += config.level_up_bonus;
    }

    if bonus_paid > 0 {
        // Level-up bonuses are a new-value source, not subject to the
        // wallet cap.
        account.wallet = account
            .wallet
            .checked_add(bonus_paid)
            .ok_or(EconError::InvalidAmount { amount: bonus_paid })?;
        tx.append_entry(
            &account.account_id,
            EntryKind::Credit,
            bonus_paid,
            "level-up bonus",
            now,
        )?;
    }

    let levels_gained = account.level - start_level;
    if levels_gained > 0 {
        log::debug!(
            "{}: +{amount} xp ({source}) -> level {} (+{levels_gained}), bonus {bonus_paid}",
            account.account_id,
            account.level,
        );
    }

    Ok(XpGrant {
        level: account.level,
        xp: account.xp,
        leveled_up: levels_gained > 0,
        new_level: (levels_gained > 0).then_some(account.level),
        levels_gained,
        bonus_paid,
    })
}
