//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Services call store methods — they never execute SQL directly.
//!
//! Mutating operations go through `EconStore::transaction`, which hands the
//! caller a `StoreTx`: the typed read/write surface valid inside exactly one
//! open transaction. Point reads outside a transaction live on `EconStore`
//! itself. Both sides share the same row mappers (a `Transaction` derefs to
//! a `Connection`).

mod claims;

use crate::{
    error::{EconError, EconResult},
    types::{AccountId, UnixTime},
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's full persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub wallet: i64,
    pub safe_balance: i64,
    pub safe_tier: u32,
    pub safe_capacity: i64,
    pub level: u32,
    pub xp: i64,
    pub total_commands: i64,
    pub created_at: UnixTime,
}

/// Audit log entry kinds. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Credit,
    Debit,
    Deposit,
    Withdraw,
    Xp,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Xp => "xp",
        }
    }
}

/// A row of the append-only audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: String,
    pub account_id: AccountId,
    pub kind: String,
    pub amount: i64,
    pub reason: String,
    pub created_at: UnixTime,
}

/// The four periodic claim tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ClaimKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClaimRecord {
    pub account_id: AccountId,
    pub kind: ClaimKind,
    pub last_claimed_at: UnixTime,
    pub streak: u32,
}

pub struct EconStore {
    conn: Connection,
}

impl EconStore {
    pub fn open(path: &str) -> EconResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EconResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EconResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_accounts.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_ledger.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_claims.sql"))?;
        Ok(())
    }

    /// Run `f` as one atomic unit: commits on Ok, rolls back on Err, so a
    /// failure anywhere leaves stored state exactly as before. IMMEDIATE
    /// behavior takes the write lock at BEGIN, which serializes
    /// read-then-write pairs against other writers on the same rows.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&StoreTx<'_>) -> EconResult<T>,
    ) -> EconResult<T> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let stx = StoreTx { tx };
        match f(&stx) {
            Ok(value) => {
                stx.tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                stx.tx.rollback()?;
                Err(err)
            }
        }
    }

    // ── Point reads (no transaction) ───────────────────────────

    pub fn account(&self, id: &str) -> EconResult<Option<Account>> {
        read_account(&self.conn, id)
    }

    pub fn entries_for(&self, id: &str) -> EconResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, account_id, kind, amount, reason, created_at
             FROM ledger WHERE account_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok(LedgerEntry {
                entry_id: row.get(0)?,
                account_id: row.get(1)?,
                kind: row.get(2)?,
                amount: row.get(3)?,
                reason: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn entry_count(&self, id: &str, kind: EntryKind) -> EconResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM ledger WHERE account_id = ?1 AND kind = ?2",
                params![id, kind.as_str()],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

/// The typed read/write surface inside one open transaction.
pub struct StoreTx<'c> {
    tx: rusqlite::Transaction<'c>,
}

impl StoreTx<'_> {
    /// Fetch an account, provisioning it with default state on first
    /// reference. Idempotent inside the transaction.
    pub fn get_or_create_account(
        &self,
        id: &str,
        default_capacity: i64,
        now: UnixTime,
    ) -> EconResult<Account> {
        if let Some(account) = read_account(&self.tx, id)? {
            return Ok(account);
        }
        self.tx.execute(
            "INSERT INTO account (account_id, wallet, safe_balance, safe_tier,
                                  safe_capacity, level, xp, total_commands, created_at)
             VALUES (?1, 0, 0, 1, ?2, 1, 0, 0, ?3)",
            params![id, default_capacity, now],
        )?;
        log::debug!("{id}: account provisioned");
        read_account(&self.tx, id)?.ok_or_else(|| EconError::AccountNotFound { id: id.into() })
    }

    /// Write back every mutable field of an account row.
    pub fn save_account(&self, account: &Account) -> EconResult<()> {
        let changed = self.tx.execute(
            "UPDATE account
             SET wallet = ?1, safe_balance = ?2, safe_tier = ?3,
                 safe_capacity = ?4, level = ?5, xp = ?6
             WHERE account_id = ?7",
            params![
                account.wallet,
                account.safe_balance,
                account.safe_tier,
                account.safe_capacity,
                account.level,
                account.xp,
                account.account_id,
            ],
        )?;
        if changed == 0 {
            return Err(EconError::AccountNotFound {
                id: account.account_id.clone(),
            });
        }
        Ok(())
    }

    /// Append one audit log row. Write-once; nothing ever updates it.
    pub fn append_entry(
        &self,
        account_id: &str,
        kind: EntryKind,
        amount: i64,
        reason: &str,
        now: UnixTime,
    ) -> EconResult<()> {
        self.tx.execute(
            "INSERT INTO ledger (entry_id, account_id, kind, amount, reason, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Uuid::new_v4().to_string(),
                account_id,
                kind.as_str(),
                amount,
                reason,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn bump_command_count(&self, id: &str) -> EconResult<()> {
        self.tx.execute(
            "UPDATE account SET total_commands = total_commands + 1
             WHERE account_id = ?1",
            params![id],
        )?;
        Ok(())
    }
}

// ── Shared row mappers ─────────────────────────────────────────

fn read_account(conn: &Connection, id: &str) -> EconResult<Option<Account>> {
    conn.query_row(
        "SELECT account_id, wallet, safe_balance, safe_tier, safe_capacity,
                level, xp, total_commands, created_at
         FROM account WHERE account_id = ?1",
        params![id],
        |row| {
            Ok(Account {
                account_id: row.get(0)?,
                wallet: row.get(1)?,
                safe_balance: row.get(2)?,
                safe_tier: row.get(3)?,
                safe_capacity: row.get(4)?,
                level: row.get(5)?,
                xp: row.get(6)?,
                total_commands: row.get(7)?,
                created_at: row.get(8)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}
