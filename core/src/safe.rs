//! Safe sub-account — capacity-bounded storage next to the wallet.
//!
//! Deposits and withdrawals move value between wallet and safe without
//! creating or destroying any; tier upgrades destroy the fee (a sink) and
//! recompute capacity deterministically from the new tier.

use crate::{
    config::SafeConfig,
    economy::Economy,
    error::{EconError, EconResult},
    store::EntryKind,
};

/// Wallet and safe after a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeMove {
    pub wallet: i64,
    pub safe_balance: i64,
}

/// The result of a tier upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeUpgrade {
    pub tier: u32,
    pub capacity: i64,
    pub cost: i64,
}

/// Cost of moving from `tier` to `tier + 1` — exponential in the
/// current tier.
pub fn upgrade_cost(config: &SafeConfig, tier: u32) -> i64 {
    (config.upgrade_base_cost as f64 * config.upgrade_multiplier.powi(tier as i32 - 1)).floor()
        as i64
}

/// Capacity at `tier`.
pub fn capacity_for(config: &SafeConfig, tier: u32) -> i64 {
    config.base_capacity + config.capacity_increment * (tier as i64 - 1)
}

impl Economy {
    /// Move `amount` from wallet into the safe.
    pub fn deposit(&self, id: &str, amount: i64) -> EconResult<SafeMove> {
        if amount <= 0 {
            return Err(EconError::InvalidAmount { amount });
        }
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            if account.wallet < amount {
                return Err(EconError::InsufficientFunds {
                    needed: amount,
                    available: account.wallet,
                });
            }
            let space = account.safe_capacity - account.safe_balance;
            if amount > space {
                return Err(EconError::SafeFull { space });
            }
            account.wallet -= amount;
            account.safe_balance += amount;
            tx.append_entry(id, EntryKind::Deposit, amount, "safe deposit", now)?;
            tx.save_account(&account)?;
            log::debug!(
                "{id}: deposit {amount} -> wallet {} safe {}/{}",
                account.wallet,
                account.safe_balance,
                account.safe_capacity
            );
            Ok(SafeMove {
                wallet: account.wallet,
                safe_balance: account.safe_balance,
            })
        })
    }

    /// Move `amount` from the safe back into the wallet.
    pub fn withdraw(&self, id: &str, amount: i64) -> EconResult<SafeMove> {
        if amount <= 0 {
            return Err(EconError::InvalidAmount { amount });
        }
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            if account.safe_balance < amount {
                return Err(EconError::InsufficientSafeFunds {
                    needed: amount,
                    available: account.safe_balance,
                });
            }
            if let Some(limit) = self.config().wallet.max_wallet {
                if account.wallet + amount > limit {
                    return Err(EconError::WalletLimitExceeded { limit });
                }
            }
            account.safe_balance -= amount;
            account.wallet += amount;
            tx.append_entry(id, EntryKind::Withdraw, amount, "safe withdrawal", now)?;
            tx.save_account(&account)?;
            log::debug!(
                "{id}: withdraw {amount} -> wallet {} safe {}/{}",
                account.wallet,
                account.safe_balance,
                account.safe_capacity
            );
            Ok(SafeMove {
                wallet: account.wallet,
                safe_balance: account.safe_balance,
            })
        })
    }

    /// Buy the next safe tier. The fee is destroyed, not moved.
    pub fn upgrade_safe(&self, id: &str) -> EconResult<SafeUpgrade> {
        let now = self.now_ts();
        self.with_account(id, |tx| {
            let mut account = self.fetch(tx, id)?;
            let cost = upgrade_cost(&self.config().safe, account.safe_tier);
            if account.wallet < cost {
                return Err(EconError::InsufficientFunds {
                    needed: cost,
                    available: account.wallet,
                });
            }
            account.wallet -= cost;
            account.safe_tier += 1;
            account.safe_capacity = capacity_for(&self.config().safe, account.safe_tier);
            tx.append_entry(id, EntryKind::Debit, cost, "safe tier upgrade", now)?;
            tx.save_account(&account)?;
            log::debug!(
                "{id}: safe upgraded to tier {} (capacity {}, cost {cost})",
                account.safe_tier,
                account.safe_capacity
            );
            Ok(SafeUpgrade {
                tier: account.safe_tier,
                capacity: account.safe_capacity,
                cost,
            })
        })
    }
}
