//! Balance ledger — wallet credit, debit, and transfer.
//!
//! Credits and debits are the only entry points that touch the liquid
//! balance directly; everything else (safe moves, wagers, claims) goes
//! through the same in-transaction helpers so the wallet invariants are
//! checked in exactly one place.

use crate::{
    economy::Economy,
    error::{EconError, EconResult},
    progression::{grant_xp_tx, XpGrant},
    store::{Account, EntryKind, StoreTx},
    types::UnixTime,
};

/// Both wallets after a transfer, plus the sender's XP side-effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub from_wallet: i64,
    pub to_wallet: i64,
    pub sender_progress: XpGrant,
}

impl Economy {
    /// Add `amount` to a wallet. Fails `LimitExceeded` when a configured
    /// wallet cap would be crossed.
    pub fn credit(&self, id: &str, amount: i64, reason: &str) -> EconResult<i64> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            apply_credit(
                tx,
                &mut account,
                amount,
                reason,
                self.config().wallet.max_wallet,
                now,
            )?;
            tx.save_account(&account)?;
            Ok(account.wallet)
        })
    }

    /// Remove `amount` from a wallet. Never partially debits.
    pub fn debit(&self, id: &str, amount: i64, reason: &str) -> EconResult<i64> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            apply_debit(tx, &mut account, amount, reason, now)?;
            tx.save_account(&account)?;
            Ok(account.wallet)
        })
    }

    /// Move `amount` between two wallets as one atomic unit, then grant
    /// the fixed transfer XP to the sender inside the same transaction.
    /// No value is created or destroyed except the XP side-effect's
    /// level-up bonus.
    pub fn transfer(&self, from: &str, to: &str, amount: i64) -> EconResult<TransferOutcome> {
        if from == to {
            return Err(EconError::SelfTransfer);
        }
        let cap = self.config().transfer.per_transaction_cap;
        if amount <= 0 || amount > cap {
            return Err(EconError::InvalidAmount { amount });
        }
        let now = self.now_ts();
        self.with_account_pair(from, to, |tx| {
            let mut sender = self.fetch(tx, from)?;
            let mut receiver = self.fetch(tx, to)?;

            apply_debit(tx, &mut sender, amount, &format!("transfer to {to}"), now)?;
            apply_credit(
                tx,
                &mut receiver,
                amount,
                &format!("transfer from {from}"),
                self.config().wallet.max_wallet,
                now,
            )?;

            let sender_progress = grant_xp_tx(
                tx,
                &mut sender,
                self.config().transfer.xp_award,
                "transfer",
                &self.config().progression,
                now,
            )?;

            tx.save_account(&sender)?;
            tx.save_account(&receiver)?;

            log::debug!("{from} -> {to}: transfer {amount}");
            Ok(TransferOutcome {
                from_wallet: sender.wallet,
                to_wallet: receiver.wallet,
                sender_progress,
            })
        })
    }
}

/// In-transaction wallet credit: cap check, balance bump, audit entry.
/// Callers pass `None` for cap-exempt source payouts.
pub(crate) fn apply_credit(
    tx: &StoreTx<'_>,
    account: &mut Account,
    amount: i64,
    reason: &str,
    cap: Option<i64>,
    now: UnixTime,
) -> EconResult<()> {
    if amount <= 0 {
        return Err(EconError::InvalidAmount { amount });
    }
    let new_wallet = account
        .wallet
        .checked_add(amount)
        .ok_or(EconError::InvalidAmount { amount })?;
    if let Some(limit) = cap {
        if new_wallet > limit {
            return Err(EconError::LimitExceeded { limit });
        }
    }
    account.wallet = new_wallet;
    tx.append_entry(&account.account_id, EntryKind::Credit, amount, reason, now)?;
    log::debug!(
        "{}: credit {amount} ({reason}) -> wallet {new_wallet}",
        account.account_id
    );
    Ok(())
}

/// In-transaction wallet debit. All-or-nothing.
pub(crate) fn apply_debit(
    tx: &StoreTx<'_>,
    account: &mut Account,
    amount: i64,
    reason: &str,
    now: UnixTime,
) -> EconResult<()> {
    if amount <= 0 {
        return Err(EconError::InvalidAmount { amount });
    }
    if account.wallet < amount {
        return Err(EconError::InsufficientFunds {
            needed: amount,
            available: account.wallet,
        });
    }
    account.wallet -= amount;
    tx.append_entry(&account.account_id, EntryKind::Debit, amount, reason, now)?;
    log::debug!(
        "{}: debit {amount} ({reason}) -> wallet {}",
        account.account_id,
        account.wallet
    );
    Ok(())
}
