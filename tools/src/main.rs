//! bank-runner: headless driver for the guildbank engine.
//!
//! Usage:
//!   bank-runner --db econ.db profile alice
//!   bank-runner --db econ.db credit alice 500 promo
//!   bank-runner --db econ.db transfer alice bob 100
//!   bank-runner --db econ.db claim alice daily
//!   bank-runner --db econ.db slots alice 50
//!
//! One engine operation per invocation; the result (or the typed failure)
//! is printed as JSON on stdout so shell scripts can drive an economy.

use anyhow::Result;
use guildbank_core::{
    config::EconConfig,
    economy::Economy,
    error::EconError,
    games::coinflip::CoinFace,
    store::ClaimKind,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or("econ.db");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EconConfig::load(&w[1])?,
        None => EconConfig::default_test(),
    };

    // Everything after the flags (and their values) is the command.
    let mut command: Vec<&str> = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = true;
            continue;
        }
        command.push(arg.as_str());
    }

    if command.is_empty() {
        print_usage();
        return Ok(());
    }

    let economy = Economy::open(db, config)?;

    match run(&economy, &command) {
        Ok(output) => println!("{output}"),
        Err(err) if err.is_user_error() => {
            println!("{}", serde_json::json!({ "error": err.to_string() }));
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn run(economy: &Economy, command: &[&str]) -> Result<String, EconError> {
    let out = match command {
        ["profile", id] => json(&economy.profile(id)?)?,
        ["credit", id, amount, reason] => {
            let wallet = economy.credit(id, parse_amount(amount)?, reason)?;
            serde_json::json!({ "wallet": wallet }).to_string()
        }
        ["debit", id, amount, reason] => {
            let wallet = economy.debit(id, parse_amount(amount)?, reason)?;
            serde_json::json!({ "wallet": wallet }).to_string()
        }
        ["transfer", from, to, amount] => {
            let outcome = economy.transfer(from, to, parse_amount(amount)?)?;
            serde_json::json!({
                "from_wallet": outcome.from_wallet,
                "to_wallet": outcome.to_wallet,
            })
            .to_string()
        }
        ["deposit", id, amount] => {
            let moved = economy.deposit(id, parse_amount(amount)?)?;
            serde_json::json!({ "wallet": moved.wallet, "safe": moved.safe_balance }).to_string()
        }
        ["withdraw", id, amount] => {
            let moved = economy.withdraw(id, parse_amount(amount)?)?;
            serde_json::json!({ "wallet": moved.wallet, "safe": moved.safe_balance }).to_string()
        }
        ["upgrade-safe", id] => {
            let upgrade = economy.upgrade_safe(id)?;
            serde_json::json!({
                "tier": upgrade.tier,
                "capacity": upgrade.capacity,
                "cost": upgrade.cost,
            })
            .to_string()
        }
        ["grant-xp", id, amount, source] => json(&economy.grant_xp(id, parse_amount(amount)?, source)?)?,
        ["claim", id, kind] => {
            let kind = parse_claim_kind(kind)?;
            let outcome = economy.claim(id, kind)?;
            serde_json::json!({
                "amount": outcome.amount,
                "streak": outcome.streak,
                "wallet": outcome.wallet,
            })
            .to_string()
        }
        ["claim-status", id, kind] => {
            let kind = parse_claim_kind(kind)?;
            let status = economy.claim_status(id, kind)?;
            serde_json::json!({
                "claimed": status.claimed,
                "remaining_secs": status.remaining_secs,
                "streak": status.streak,
            })
            .to_string()
        }
        ["work", id] => {
            let outcome = economy.work(id)?;
            serde_json::json!({ "earned": outcome.earned, "wallet": outcome.wallet }).to_string()
        }
        ["slots", id, bet] => {
            let outcome = economy.play_slots(id, parse_amount(bet)?)?;
            serde_json::json!({
                "reels": outcome.reels,
                "won": outcome.settlement.won,
                "net": outcome.settlement.net,
                "wallet": outcome.settlement.wallet,
            })
            .to_string()
        }
        ["coinflip", id, bet, call] => {
            let call = CoinFace::parse(call)
                .ok_or_else(|| anyhow::anyhow!("call must be heads or tails"))?;
            let outcome = economy.play_coinflip(id, parse_amount(bet)?, call)?;
            serde_json::json!({
                "landed": outcome.landed,
                "won": outcome.settlement.won,
                "net": outcome.settlement.net,
                "wallet": outcome.settlement.wallet,
            })
            .to_string()
        }
        ["guess", id, bet, range, guess] => {
            let outcome = economy.play_guess(
                id,
                parse_amount(bet)?,
                parse_amount(range)? as u32,
                parse_amount(guess)?,
            )?;
            serde_json::json!({
                "drawn": outcome.drawn,
                "won": outcome.settlement.won,
                "net": outcome.settlement.net,
                "wallet": outcome.settlement.wallet,
            })
            .to_string()
        }
        ["dice", id, bet, dice_count, guess] => {
            let outcome = economy.play_dice(
                id,
                parse_amount(bet)?,
                parse_amount(dice_count)? as u32,
                parse_amount(guess)?,
            )?;
            serde_json::json!({
                "rolls": outcome.rolls,
                "total": outcome.total,
                "won": outcome.settlement.won,
                "net": outcome.settlement.net,
                "wallet": outcome.settlement.wallet,
            })
            .to_string()
        }
        ["roulette", id] => {
            let outcome = economy.play_roulette(id)?;
            serde_json::json!({
                "survived": outcome.survived,
                "net": outcome.settlement.net,
                "wallet": outcome.settlement.wallet,
            })
            .to_string()
        }
        ["ledger", id] => json(&economy.ledger_entries(id)?)?,
        ["reap-cooldowns"] => {
            let reaped = economy.reap_expired_cooldowns()?;
            serde_json::json!({ "reaped": reaped }).to_string()
        }
        _ => {
            print_usage();
            serde_json::json!({ "error": "unknown command" }).to_string()
        }
    };
    Ok(out)
}

fn json<T: serde::Serialize>(value: &T) -> Result<String, EconError> {
    Ok(serde_json::to_string(value)?)
}

fn parse_amount(s: &str) -> Result<i64, EconError> {
    s.parse::<i64>()
        .map_err(|_| anyhow::anyhow!("not a number: {s}").into())
}

fn parse_claim_kind(s: &str) -> Result<ClaimKind, EconError> {
    ClaimKind::parse(s).ok_or_else(|| anyhow::anyhow!("unknown claim kind: {s}").into())
}

fn print_usage() {
    eprintln!("bank-runner [--db FILE] [--config FILE] COMMAND");
    eprintln!("  profile ID");
    eprintln!("  credit ID AMOUNT REASON | debit ID AMOUNT REASON");
    eprintln!("  transfer FROM TO AMOUNT");
    eprintln!("  deposit ID AMOUNT | withdraw ID AMOUNT | upgrade-safe ID");
    eprintln!("  grant-xp ID AMOUNT SOURCE");
    eprintln!("  claim ID KIND | claim-status ID KIND   (daily|weekly|monthly|yearly)");
    eprintln!("  work ID");
    eprintln!("  slots ID BET | coinflip ID BET heads|tails");
    eprintln!("  guess ID BET RANGE GUESS | dice ID BET COUNT GUESS | roulette ID");
    eprintln!("  ledger ID | reap-cooldowns");
}
