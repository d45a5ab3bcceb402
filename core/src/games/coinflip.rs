//! Coinflip — call it, flip it, fixed multiplier.

use super::{check_bet, settle, Settlement};
use crate::{
    economy::Economy,
    error::EconResult,
    progression::{grant_xp_tx, XpGrant},
    rng::EconRng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "heads" => Some(Self::Heads),
            "tails" => Some(Self::Tails),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinflipOutcome {
    pub landed: CoinFace,
    pub settlement: Settlement,
    pub progress: XpGrant,
}

pub fn flip(rng: &mut EconRng) -> CoinFace {
    if rng.below(2) == 0 {
        CoinFace::Heads
    } else {
        CoinFace::Tails
    }
}

impl Economy {
    pub fn play_coinflip(&self, id: &str, bet: i64, call: CoinFace) -> EconResult<CoinflipOutcome> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            check_bet(&self.config().games, &account, bet)?;

            let landed = self.draw(flip);
            let multiplier = (landed == call).then_some(self.config().games.coinflip.multiplier);

            let settlement = settle(tx, &mut account, bet, multiplier, "coinflip", now)?;
            let progress = grant_xp_tx(
                tx,
                &mut account,
                self.config().games.xp_award,
                "gamble",
                &self.config().progression,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(CoinflipOutcome {
                landed,
                settlement,
                progress,
            })
        })
    }
}
