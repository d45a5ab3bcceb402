use super::{ClaimKind, ClaimRecord, EconStore, StoreTx};
use crate::{error::EconResult, types::UnixTime};
use rusqlite::{params, Connection, OptionalExtension};

impl StoreTx<'_> {
    // ── Claim records ─────────────────────────────────────────────

    pub fn claim_record(&self, id: &str, kind: ClaimKind) -> EconResult<Option<ClaimRecord>> {
        read_claim(&self.tx, id, kind)
    }

    pub fn upsert_claim(
        &self,
        id: &str,
        kind: ClaimKind,
        last_claimed_at: UnixTime,
        streak: u32,
    ) -> EconResult<()> {
        self.tx.execute(
            "INSERT INTO claim (account_id, claim_kind, last_claimed_at, streak)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(account_id, claim_kind) DO UPDATE SET
                 last_claimed_at = excluded.last_claimed_at,
                 streak = excluded.streak",
            params![id, kind.as_str(), last_claimed_at, streak],
        )?;
        Ok(())
    }

    // ── Cooldowns ─────────────────────────────────────────────────

    pub fn cooldown_expiry(&self, id: &str, action: &str) -> EconResult<Option<UnixTime>> {
        read_cooldown(&self.tx, id, action)
    }

    pub fn set_cooldown(&self, id: &str, action: &str, expires_at: UnixTime) -> EconResult<()> {
        self.tx.execute(
            "INSERT INTO cooldown (account_id, action, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(account_id, action) DO UPDATE SET
                 expires_at = excluded.expires_at",
            params![id, action, expires_at],
        )?;
        Ok(())
    }

    /// Drop rows whose window has already passed. Housekeeping only:
    /// an expired row behaves exactly like a missing one.
    pub fn reap_cooldowns(&self, now: UnixTime) -> EconResult<usize> {
        let reaped = self.tx.execute(
            "DELETE FROM cooldown WHERE expires_at <= ?1",
            params![now],
        )?;
        Ok(reaped)
    }
}

impl EconStore {
    pub fn claim_record(&self, id: &str, kind: ClaimKind) -> EconResult<Option<ClaimRecord>> {
        read_claim(&self.conn, id, kind)
    }

    pub fn cooldown_expiry(&self, id: &str, action: &str) -> EconResult<Option<UnixTime>> {
        read_cooldown(&self.conn, id, action)
    }
}

fn read_claim(conn: &Connection, id: &str, kind: ClaimKind) -> EconResult<Option<ClaimRecord>> {
    conn.query_row(
        "SELECT account_id, last_claimed_at, streak
         FROM claim WHERE account_id = ?1 AND claim_kind = ?2",
        params![id, kind.as_str()],
        |row| {
            Ok(ClaimRecord {
                account_id: row.get(0)?,
                kind,
                last_claimed_at: row.get(1)?,
                streak: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

fn read_cooldown(conn: &Connection, id: &str, action: &str) -> EconResult<Option<UnixTime>> {
    conn.query_row(
        "SELECT expires_at FROM cooldown WHERE account_id = ?1 AND action = ?2",
        params![id, action],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}
