//! Slots — three independent reels over a configured symbol set.

use super::{check_bet, settle, Settlement};
use crate::{
    config::SlotsConfig,
    economy::Economy,
    error::EconResult,
    progression::{grant_xp_tx, XpGrant},
    rng::EconRng,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SlotsOutcome {
    pub reels: [String; 3],
    pub settlement: Settlement,
    pub progress: XpGrant,
}

/// Draw three symbols, each an independent uniform pick.
pub fn spin(config: &SlotsConfig, rng: &mut EconRng) -> [String; 3] {
    let mut draw = || {
        let i = rng.below(config.symbols.len() as u64) as usize;
        config.symbols[i].clone()
    };
    [draw(), draw(), draw()]
}

/// Multiplier for a spin, or None when the reels pay nothing.
/// Three of a kind pays by symbol tier; any pair pays the pair rate.
pub fn resolve(config: &SlotsConfig, reels: &[String; 3]) -> Option<f64> {
    if reels[0] == reels[1] && reels[1] == reels[2] {
        Some(if reels[0] == config.jackpot_symbol {
            config.jackpot_multiplier
        } else if reels[0] == config.premium_symbol {
            config.premium_multiplier
        } else {
            config.triple_multiplier
        })
    } else if reels[0] == reels[1] || reels[1] == reels[2] || reels[0] == reels[2] {
        Some(config.pair_multiplier)
    } else {
        None
    }
}

impl Economy {
    pub fn play_slots(&self, id: &str, bet: i64) -> EconResult<SlotsOutcome> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            check_bet(&self.config().games, &account, bet)?;

            let reels = self.draw(|rng| spin(&self.config().games.slots, rng));
            let multiplier = resolve(&self.config().games.slots, &reels);

            let settlement = settle(tx, &mut account, bet, multiplier, "slots", now)?;
            let progress = grant_xp_tx(
                tx,
                &mut account,
                self.config().games.xp_award,
                "gamble",
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(SlotsOutcome {
                reels,
                settlement,
                progress,
            })
        })
    }
}
