//! Number guess — pick a number in [1, range]; wider range, bigger payout.

use super::{check_bet, settle, Settlement};
use crate::{
    config::GuessConfig,
    economy::Economy,
    error::{EconError, EconResult},
    progression::{grant_xp_tx, XpGrant},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuessOutcome {
    pub drawn: i64,
    pub settlement: Settlement,
    pub progress: XpGrant,
}

/// Payout multiplier for a given range width — linear in the difficulty.
pub fn multiplier_for(config: &GuessConfig, range: u32) -> f64 {
    config.base_multiplier + (range as f64 - 2.0) * config.difficulty_bonus
}

impl Economy {
    pub fn play_guess(&self, id: &str, bet: i64, range: u32, guess: i64) -> EconResult<GuessOutcome> {
        let guess_config = self.config().games.guess.clone();
        if range < guess_config.min_range || range > guess_config.max_range {
            return Err(EconError::BetOutOfRange {
                min: guess_config.min_range as i64,
                max: guess_config.max_range as i64,
            });
        }
        if guess < 1 || guess > range as i64 {
            return Err(EconError::BetOutOfRange {
                min: 1,
                max: range as i64,
            });
        }
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            check_bet(&self.config().games, &account, bet)?;

            let drawn = self.draw(|rng| rng.range_i64(1, range as i64));
            let multiplier = (drawn == guess).then_some(multiplier_for(&guess_config, range));

            let settlement = settle(tx, &mut account, bet, multiplier, "guess", now)?;
            let progress = grant_xp_tx(
                tx,
                &mut account,
                self.config().games.xp_award,
                "gamble",
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(GuessOutcome {
                drawn,
                settlement,
                progress,
            })
        })
    }
}
