//! # Price converter
//!
//! Native-asset to USD conversion backed by an external price feed.
//!
//! The feed is only known through the [`PriceFeed`] interface; any contract
//! exposing `decimals` and `latest_round_data` can be plugged in at
//! construction time. Every failure mode of the feed (a trap inside the feed,
//! a non-positive answer, an incomplete or stale round) collapses to
//! [`Error::OracleUnavailable`].

use soroban_sdk::{contractclient, Address, Env};

use crate::types::RoundData;
use crate::Error;

/// Oldest round accepted, in seconds.
pub const MAX_PRICE_AGE_SECS: u64 = 3_600;

/// Query surface of a native/USD price feed.
#[allow(dead_code)]
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// Number of fractional digits in `RoundData::answer`.
    fn decimals(env: Env) -> u32;

    fn latest_round_data(env: Env) -> RoundData;
}

/// Latest price as `(answer, decimals)`.
pub fn get_price(env: &Env, price_feed: &Address) -> Result<(i128, u32), Error> {
    let feed = PriceFeedClient::new(env, price_feed);

    let round = match feed.try_latest_round_data() {
        Ok(Ok(round)) => round,
        _ => return Err(Error::OracleUnavailable),
    };
    let decimals = match feed.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(Error::OracleUnavailable),
    };

    check_round(&round, env.ledger().timestamp())?;
    Ok((round.answer, decimals))
}

/// USD value of `native_amount`, in the native asset's decimal scale.
pub fn get_conversion_rate(
    env: &Env,
    price_feed: &Address,
    native_amount: i128,
) -> Result<i128, Error> {
    let (answer, decimals) = get_price(env, price_feed)?;
    convert(native_amount, answer, decimals)
}

/// `native_amount * answer / 10^decimals`, floored.
pub fn convert(native_amount: i128, answer: i128, decimals: u32) -> Result<i128, Error> {
    let scale = 10i128.checked_pow(decimals).ok_or(Error::Overflow)?;
    native_amount
        .checked_mul(answer)
        .ok_or(Error::Overflow)?
        .checked_div(scale)
        .ok_or(Error::Overflow)
}

fn check_round(round: &RoundData, now: u64) -> Result<(), Error> {
    if round.answer <= 0 {
        return Err(Error::OracleUnavailable);
    }
    if round.updated_at == 0 || round.updated_at > now {
        return Err(Error::OracleUnavailable);
    }
    if now - round.updated_at > MAX_PRICE_AGE_SECS {
        return Err(Error::OracleUnavailable);
    }
    if round.answered_in_round < round.round_id {
        return Err(Error::OracleUnavailable);
    }
    Ok(())
}
