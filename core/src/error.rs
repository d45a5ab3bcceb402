use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconError {
    // ── Recoverable, user-caused conditions ────────────────────
    #[error("insufficient funds: need {needed}, wallet holds {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("insufficient safe funds: need {needed}, safe holds {available}")]
    InsufficientSafeFunds { needed: i64, available: i64 },

    #[error("safe is full: only {space} of capacity left")]
    SafeFull { space: i64 },

    #[error("withdrawing would push the wallet past its cap of {limit}")]
    WalletLimitExceeded { limit: i64 },

    #[error("wallet cap of {limit} would be exceeded")]
    LimitExceeded { limit: i64 },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("cannot transfer to yourself")]
    SelfTransfer,

    #[error("too soon: {remaining_secs}s left on this window")]
    TooSoon { remaining_secs: i64 },

    #[error("bet out of range: allowed {min}..={max}")]
    BetOutOfRange { min: i64, max: i64 },

    #[error("account not found: {id}")]
    AccountNotFound { id: String },

    // ── Unrecoverable store/infrastructure failures ────────────
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EconResult<T> = Result<T, EconError>;

impl EconError {
    /// Recoverable, user-caused conditions the dispatch layer renders
    /// directly. Everything else means the transaction was rolled back and
    /// the caller should log for the operator, not render to the user.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::Storage(_) | Self::Serialization(_) | Self::Other(_)
        )
    }
}
