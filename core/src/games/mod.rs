//! RNG wager engine.
//!
//! Every game follows the same contract: validate (bet bounds, wallet
//! funds, game parameters — all before any RNG draw), draw, resolve,
//! settle. Resolution is a pure function of the drawn values, so payout
//! math is testable without touching the RNG. Settlement applies
//! `floor(bet * multiplier) - bet` on a win and `-bet` on a loss, logs
//! the play, and grants the flat gambling XP — one transaction per play.

pub mod coinflip;
pub mod dice;
pub mod guess;
pub mod roulette;
pub mod slots;

use crate::{
    config::GamesConfig,
    error::{EconError, EconResult},
    store::{Account, EntryKind, StoreTx},
    types::UnixTime,
};

/// The money side of a resolved play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub won: bool,
    pub bet: i64,
    /// floor(bet * multiplier) on a win, 0 on a loss.
    pub winnings: i64,
    /// Wallet delta: winnings - bet on a win, -bet on a loss.
    pub net: i64,
    /// Wallet after settlement.
    pub wallet: i64,
}

/// floor(bet * multiplier).
pub fn payout(bet: i64, multiplier: f64) -> i64 {
    (bet as f64 * multiplier).floor() as i64
}

/// Bet bounds and funds check, before any draw.
pub(crate) fn check_bet(config: &GamesConfig, account: &Account, bet: i64) -> EconResult<()> {
    if bet < config.min_bet || bet > config.max_bet {
        return Err(EconError::BetOutOfRange {
            min: config.min_bet,
            max: config.max_bet,
        });
    }
    if account.wallet < bet {
        return Err(EconError::InsufficientFunds {
            needed: bet,
            available: account.wallet,
        });
    }
    Ok(())
}

/// Apply a resolved play to the wallet and log it. `win_multiplier` is
/// Some on a win, None on a loss. Gambling payouts are a new-value
/// source and are not capped. Mutates the account; the caller saves it.
pub(crate) fn settle(
    tx: &StoreTx<'_>,
    account: &mut Account,
    bet: i64,
    win_multiplier: Option<f64>,
    game: &str,
    now: UnixTime,
) -> EconResult<Settlement> {
    let (won, winnings, net) = match win_multiplier {
        Some(multiplier) => {
            let winnings = payout(bet, multiplier);
            (true, winnings, winnings - bet)
        }
        None => (false, 0, -bet),
    };

    account.wallet = account
        .wallet
        .checked_add(net)
        .ok_or(EconError::InvalidAmount { amount: net })?;

    if won {
        if net >= 0 {
            tx.append_entry(
                &account.account_id,
                EntryKind::Credit,
                net,
                &format!("{game} win"),
                now,
            )?;
        } else {
            tx.append_entry(
                &account.account_id,
                EntryKind::Debit,
                -net,
                &format!("{game} win"),
                now,
            )?;
        }
    } else {
        tx.append_entry(
            &account.account_id,
            EntryKind::Debit,
            bet,
            &format!("{game} loss"),
            now,
        )?;
    }

    log::debug!(
        "{}: {game} bet {bet} -> {} (wallet {})",
        account.account_id,
        if won { "won" } else { "lost" },
        account.wallet
    );

    Ok(Settlement {
        won,
        bet,
        winnings,
        net,
        wallet: account.wallet,
    })
}
