//! Dice roll — call the exact sum of N dice. Fixed multiplier
//! regardless of how many dice are thrown.

use super::{check_bet, settle, Settlement};
use crate::{
    economy::Economy,
    error::{EconError, EconResult},
    progression::{grant_xp_tx, XpGrant},
    rng::EconRng,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DiceOutcome {
    pub rolls: Vec<u8>,
    pub total: i64,
    pub settlement: Settlement,
    pub progress: XpGrant,
}

pub fn roll(rng: &mut EconRng, dice_count: u32) -> Vec<u8> {
    (0..dice_count).map(|_| rng.range_i64(1, 6) as u8).collect()
}

impl Economy {
    pub fn play_dice(
        &self,
        id: &str,
        bet: i64,
        dice_count: u32,
        guess: i64,
    ) -> EconResult<DiceOutcome> {
        let dice = self.config().games.dice.clone();
        if dice_count < 1 || dice_count > dice.max_dice {
            return Err(EconError::BetOutOfRange {
                min: 1,
                max: dice.max_dice as i64,
            });
        }
        // The guess must be a reachable sum, rejected before any draw.
        let (lo, hi) = (dice_count as i64, dice_count as i64 * 6);
        if guess < lo || guess > hi {
            return Err(EconError::BetOutOfRange { min: lo, max: hi });
        }
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            check_bet(&self.config().games, &account, bet)?;

            let rolls = self.draw(|rng| roll(rng, dice_count));
            let total: i64 = rolls.iter().map(|&r| r as i64).sum();
            let multiplier = (total == guess).then_some(dice.multiplier);

            let settlement = settle(tx, &mut account, bet, multiplier, "dice", now)?;
            let progress = grant_xp_tx(
                tx,
                &mut account,
                self.config().games.xp_award,
                "gamble",
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(DiceOutcome {
                rolls,
                total,
                settlement,
                progress,
            })
        })
    }
}
