//! Time-gated claim scheduler — daily, weekly, monthly, yearly rewards.
//!
//! Each (account, kind) pair is its own little state machine: no record
//! yet, inside the window, or available again. Only the daily track keeps
//! a streak; it survives as long as the gap between claims stays inside a
//! grace window strictly longer than the claim window itself, so claiming
//! exactly on time never breaks it.

use crate::{
    economy::Economy,
    error::{EconError, EconResult},
    progression::{grant_xp_tx, XpGrant},
    store::{ClaimKind, ClaimRecord, EntryKind},
};

/// A successful claim: what was paid and where the streak stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub kind: ClaimKind,
    pub amount: i64,
    /// Daily only; None for the fixed-amount kinds.
    pub streak: Option<u32>,
    pub wallet: i64,
    pub progress: XpGrant,
}

/// Pure status read for UI display; mutates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimStatus {
    /// True while still inside the cooldown window.
    pub claimed: bool,
    /// Seconds until the next claim; 0 when available.
    pub remaining_secs: i64,
    pub streak: Option<u32>,
}

impl Economy {
    pub fn claim(&self, id: &str, kind: ClaimKind) -> EconResult<ClaimOutcome> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            let record = tx.claim_record(id, kind)?;

            let (amount, streak) = match &record {
                None => self.first_claim(kind),
                Some(existing) => self.repeat_claim(kind, existing, now)?,
            };

            // Claim payouts are a new-value source, exempt from the
            // wallet cap like level-up bonuses.
            account.wallet = account
                .wallet
                .checked_add(amount)
                .ok_or(EconError::InvalidAmount { amount })?;
            tx.append_entry(
                id,
                EntryKind::Credit,
                amount,
                &format!("{} claim", kind.as_str()),
                now,
            )?;

            let progress = grant_xp_tx(
                tx,
                &mut account,
                self.claim_xp(kind),
                &format!("claim:{}", kind.as_str()),
                &self.config().progression,
                now,
            )?;

            tx.save_account(&account)?;
            tx.upsert_claim(id, kind, now, streak.unwrap_or(1))?;

            log::debug!(
                "{id}: {} claim paid {amount}{}",
                kind.as_str(),
                streak.map(|s| format!(" (streak {s})")).unwrap_or_default()
            );
            Ok(ClaimOutcome {
                kind,
                amount,
                streak,
                wallet: account.wallet,
                progress,
            })
        })
    }

    /// Where a claim track stands right now. Pure read — an account that
    /// has never claimed reads as available with no record created.
    pub fn claim_status(&self, id: &str, kind: ClaimKind) -> EconResult<ClaimStatus> {
        let now = self.now_ts();
        let store = self.store_read();
        let record = store.claim_record(id, kind)?;
        Ok(match record {
            None => ClaimStatus {
                claimed: false,
                remaining_secs: 0,
                streak: None,
            },
            Some(existing) => {
                let elapsed = now - existing.last_claimed_at;
                let window = self.claim_window(kind);
                let streak = matches!(kind, ClaimKind::Daily).then_some(existing.streak);
                if elapsed < window {
                    ClaimStatus {
                        claimed: true,
                        remaining_secs: window - elapsed,
                        streak,
                    }
                } else {
                    ClaimStatus {
                        claimed: false,
                        remaining_secs: 0,
                        streak,
                    }
                }
            }
        })
    }

    // ── Internals ──────────────────────────────────────────────

    fn first_claim(&self, kind: ClaimKind) -> (i64, Option<u32>) {
        match kind {
            ClaimKind::Daily => (self.config().claims.daily.amount, Some(1)),
            _ => (self.claim_base_amount(kind), None),
        }
    }

    fn repeat_claim(
        &self,
        kind: ClaimKind,
        existing: &ClaimRecord,
        now: i64,
    ) -> EconResult<(i64, Option<u32>)> {
        let elapsed = now - existing.last_claimed_at;
        let window = self.claim_window(kind);
        if elapsed < window {
            return Err(EconError::TooSoon {
                remaining_secs: window - elapsed,
            });
        }
        Ok(match kind {
            ClaimKind::Daily => {
                let daily = &self.config().claims.daily;
                let streak = if elapsed < daily.grace_secs {
                    existing.streak + 1
                } else {
                    1
                };
                let bonus = (streak as f64 * daily.per_streak_bonus).min(daily.max_bonus);
                let amount = (daily.amount as f64 * (1.0 + bonus)).floor() as i64;
                (amount, Some(streak))
            }
            _ => (self.claim_base_amount(kind), None),
        })
    }

    fn claim_base_amount(&self, kind: ClaimKind) -> i64 {
        let claims = &self.config().claims;
        match kind {
            ClaimKind::Daily => claims.daily.amount,
            ClaimKind::Weekly => claims.weekly.amount,
            ClaimKind::Monthly => claims.monthly.amount,
            ClaimKind::Yearly => claims.yearly.amount,
        }
    }

    fn claim_window(&self, kind: ClaimKind) -> i64 {
        let claims = &self.config().claims;
        match kind {
            ClaimKind::Daily => claims.daily.window_secs,
            ClaimKind::Weekly => claims.weekly.window_secs,
            ClaimKind::Monthly => claims.monthly.window_secs,
            ClaimKind::Yearly => claims.yearly.window_secs,
        }
    }

    fn claim_xp(&self, kind: ClaimKind) -> i64 {
        let claims = &self.config().claims;
        match kind {
            ClaimKind::Daily => claims.daily.xp_award,
            ClaimKind::Weekly => claims.weekly.xp_award,
            ClaimKind::Monthly => claims.monthly.xp_award,
            ClaimKind::Yearly => claims.yearly.xp_award,
        }
    }
}
