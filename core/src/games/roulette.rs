//! Russian roulette — all-in only. Two chambers are drawn; matching
//! chambers means the bullet was home. Losing zeroes the wallet and only
//! the wallet: the safe is untouched.

use super::{settle, Settlement};
use crate::{
    economy::Economy,
    error::{EconError, EconResult},
    progression::{grant_xp_tx, XpGrant},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouletteOutcome {
    pub survived: bool,
    pub hammer: u32,
    pub bullet: u32,
    pub settlement: Settlement,
    pub progress: XpGrant,
}

impl Economy {
    /// The bet is forced to the entire wallet; bet bounds do not apply.
    pub fn play_roulette(&self, id: &str) -> EconResult<RouletteOutcome> {
        let now = self.now_ts();
        let roulette = self.config().games.roulette.clone();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            if account.wallet == 0 {
                return Err(EconError::InsufficientFunds {
                    needed: 1,
                    available: 0,
                });
            }
            let bet = account.wallet;

            let chambers = roulette.chambers as u64;
            let (hammer, bullet) =
                self.draw(|rng| (rng.below(chambers) as u32, rng.below(chambers) as u32));
            let survived = hammer != bullet;
            let multiplier = survived.then_some(roulette.multiplier);

            // On a loss net is exactly -bet, which empties the wallet.
            let settlement = settle(tx, &mut account, bet, multiplier, "roulette", now)?;
            let progress = grant_xp_tx(
                tx,
                &mut account,
                self.config().games.xp_award,
                "gamble",
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(RouletteOutcome {
                survived,
                hammer,
                bullet,
                settlement,
                progress,
            })
        })
    }
}
