//! The timed "work" earn — cooldown-gated wallet income.

use crate::{
    economy::Economy,
    error::{EconError, EconResult},
    progression::{grant_xp_tx, XpGrant},
    store::EntryKind,
};

pub const WORK_ACTION: &str = "work";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkOutcome {
    pub earned: i64,
    pub wallet: i64,
    pub progress: XpGrant,
}

impl Economy {
    /// Earn a random amount, gated by the work cooldown. The payout is
    /// engine-chosen, so a wallet cap clamps it rather than failing.
    pub fn work(&self, id: &str) -> EconResult<WorkOutcome> {
        let now = self.now_ts();
        let work = self.config().work.clone();
        let roll = self.draw(|rng| rng.range_i64(work.min_earn, work.max_earn));
        self.with_account(id, |tx| {
            if let Some(expires_at) = tx.cooldown_expiry(id, WORK_ACTION)? {
                if expires_at > now {
                    return Err(EconError::TooSoon {
                        remaining_secs: expires_at - now,
                    });
                }
            }
            let mut account = self.fetch(tx, id)?;
            let earned = match self.config().wallet.max_wallet {
                Some(limit) => roll.min(limit - account.wallet).max(0),
                None => roll,
            };
            if earned > 0 {
                account.wallet += earned;
                tx.append_entry(id, EntryKind::Credit, earned, "work", now)?;
            }
            let progress = grant_xp_tx(
                tx,
                &mut account,
                work.xp_award,
                "work",
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            tx.set_cooldown(id, WORK_ACTION, now + work.cooldown_secs)?;
            log::debug!("{id}: worked for {earned}");
            Ok(WorkOutcome {
                earned,
                wallet: account.wallet,
                progress,
            })
        })
    }

    /// Seconds until work is available again; 0 when ready. Pure read.
    pub fn work_cooldown_remaining(&self, id: &str) -> EconResult<i64> {
        let now = self.now_ts();
        let store = self.store_read();
        let expires_at = store.cooldown_expiry(id, WORK_ACTION)?;
        Ok(expires_at.map(|t| (t - now).max(0)).unwrap_or(0))
    }
}
