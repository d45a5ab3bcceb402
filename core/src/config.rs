//! Economy ruleset — every tunable number in one place.
//!
//! Loaded from a single JSON file in production; tests use
//! `EconConfig::default_test()` so they never touch the filesystem.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Hard cap on the liquid balance. None means unbounded.
    pub max_wallet: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Largest amount a single transfer may move.
    pub per_transaction_cap: i64,
    /// XP granted to the sender on a successful transfer.
    pub xp_award: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeConfig {
    pub base_capacity: i64,
    /// Extra capacity per tier above 1.
    pub capacity_increment: i64,
    pub upgrade_base_cost: i64,
    /// Upgrade cost grows by this factor per current tier.
    pub upgrade_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    pub base_xp: i64,
    /// Required XP grows by this factor per level.
    pub xp_multiplier: f64,
    pub max_level: u32,
    /// Wallet credit paid on every level gained.
    pub level_up_bonus: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyClaimConfig {
    pub amount: i64,
    pub window_secs: i64,
    /// The streak survives as long as the gap between claims stays under
    /// this. Must be strictly greater than window_secs so a claim made
    /// exactly on time still keeps the streak.
    pub grace_secs: i64,
    pub per_streak_bonus: f64,
    pub max_bonus: f64,
    pub xp_award: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimWindowConfig {
    pub amount: i64,
    pub window_secs: i64,
    pub xp_award: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsConfig {
    pub daily: DailyClaimConfig,
    pub weekly: ClaimWindowConfig,
    pub monthly: ClaimWindowConfig,
    pub yearly: ClaimWindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkConfig {
    pub cooldown_secs: i64,
    pub min_earn: i64,
    pub max_earn: i64,
    pub xp_award: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsConfig {
    pub symbols: Vec<String>,
    pub jackpot_symbol: String,
    pub premium_symbol: String,
    pub jackpot_multiplier: f64,
    pub premium_multiplier: f64,
    /// Three of a kind of any other symbol.
    pub triple_multiplier: f64,
    /// Any two matching reels.
    pub pair_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinflipConfig {
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessConfig {
    pub base_multiplier: f64,
    /// Payout grows linearly with the chosen range width.
    pub difficulty_bonus: f64,
    pub min_range: u32,
    pub max_range: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceConfig {
    pub multiplier: f64,
    pub max_dice: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouletteConfig {
    pub chambers: u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesConfig {
    pub min_bet: i64,
    pub max_bet: i64,
    /// Flat XP granted per play, win or lose.
    pub xp_award: i64,
    pub slots: SlotsConfig,
    pub coinflip: CoinflipConfig,
    pub guess: GuessConfig,
    pub dice: DiceConfig,
    pub roulette: RouletteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconConfig {
    pub wallet: WalletConfig,
    pub transfer: TransferConfig,
    pub safe: SafeConfig,
    pub progression: ProgressionConfig,
    pub claims: ClaimsConfig,
    pub work: WorkConfig,
    pub games: GamesConfig,
}

impl EconConfig {
    /// Load the ruleset from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rulesets that would break engine invariants.
    fn validate(&self) -> anyhow::Result<()> {
        if self.claims.daily.grace_secs <= self.claims.daily.window_secs {
            anyhow::bail!(
                "daily grace window ({}) must be strictly greater than the claim window ({})",
                self.claims.daily.grace_secs,
                self.claims.daily.window_secs
            );
        }
        if self.games.min_bet <= 0 || self.games.max_bet < self.games.min_bet {
            anyhow::bail!("bet bounds are inverted or non-positive");
        }
        if self.work.min_earn < 0 || self.work.max_earn < self.work.min_earn {
            anyhow::bail!("work earn bounds are inverted or negative");
        }
        if self.games.slots.symbols.len() < 2 {
            anyhow::bail!("slots needs at least two symbols");
        }
        if self.games.roulette.chambers < 2 {
            anyhow::bail!("roulette needs at least two chambers");
        }
        if self.games.guess.min_range < 2 {
            anyhow::bail!("guess range must allow at least two outcomes");
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests and as the
    /// runner fallback when no file is given.
    pub fn default_test() -> Self {
        Self {
            wallet: WalletConfig { max_wallet: None },
            transfer: TransferConfig {
                per_transaction_cap: 100_000,
                xp_award: 15,
            },
            safe: SafeConfig {
                base_capacity: 5_000,
                capacity_increment: 5_000,
                upgrade_base_cost: 10_000,
                upgrade_multiplier: 1.75,
            },
            progression: ProgressionConfig {
                base_xp: 100,
                xp_multiplier: 1.25,
                max_level: 100,
                level_up_bonus: 500,
            },
            claims: ClaimsConfig {
                daily: DailyClaimConfig {
                    amount: 250,
                    window_secs: 86_400,
                    grace_secs: 172_800,
                    per_streak_bonus: 0.10,
                    max_bonus: 1.0,
                    xp_award: 50,
                },
                weekly: ClaimWindowConfig {
                    amount: 1_000,
                    window_secs: 604_800,
                    xp_award: 150,
                },
                monthly: ClaimWindowConfig {
                    amount: 3_500,
                    window_secs: 2_592_000,
                    xp_award: 400,
                },
                yearly: ClaimWindowConfig {
                    amount: 25_000,
                    window_secs: 31_536_000,
                    xp_award: 2_500,
                },
            },
            work: WorkConfig {
                cooldown_secs: 3_600,
                min_earn: 50,
                max_earn: 250,
                xp_award: 25,
            },
            games: GamesConfig {
                min_bet: 10,
                max_bet: 250_000,
                xp_award: 10,
                slots: SlotsConfig {
                    symbols: vec![
                        "cherry".into(),
                        "lemon".into(),
                        "grape".into(),
                        "bell".into(),
                        "diamond".into(),
                        "seven".into(),
                    ],
                    jackpot_symbol: "seven".into(),
                    premium_symbol: "diamond".into(),
                    jackpot_multiplier: 25.0,
                    premium_multiplier: 10.0,
                    triple_multiplier: 5.0,
                    pair_multiplier: 1.5,
                },
                coinflip: CoinflipConfig { multiplier: 2.0 },
                guess: GuessConfig {
                    base_multiplier: 1.5,
                    difficulty_bonus: 0.75,
                    min_range: 2,
                    max_range: 100,
                },
                dice: DiceConfig {
                    multiplier: 5.0,
                    max_dice: 8,
                },
                roulette: RouletteConfig {
                    chambers: 6,
                    multiplier: 1.5,
                },
            },
        }
    }
}
