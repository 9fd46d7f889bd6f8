//! # FundMe Contract
//!
//! A crowdfunding ledger with a USD-denominated floor. Anyone may contribute
//! the native asset as long as the contribution is worth at least the
//! configured minimum according to the price feed. The owner fixed at
//! deployment can withdraw everything the contract holds.
//!
//! | Phase      | Entry Point(s)                                             |
//! |------------|------------------------------------------------------------|
//! | Deployment | `__constructor`                                            |
//! | Funding    | [`FundMe::fund`], [`FundMe::receive`]                      |
//! | Settlement | [`FundMe::withdraw`]                                       |
//! | Queries    | `get_owner`, `get_price_feed`, `get_funder`, `get_balance`, … |
//!
//! ## Architecture
//!
//! Price lookups are delegated to [`price_converter`]. Storage access is
//! delegated to [`storage`]. This file holds the entry points, the admission
//! and settlement rules, and event emission.
//!
//! ## Withdrawal ordering
//!
//! `withdraw` clears the ledger and the funder registry before the payout
//! leaves the contract. If the payout fails the entry point returns
//! [`Error::TransferFailed`] and the host discards every write made by the
//! invocation, so the ledger is exactly as it was before the call.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, panic_with_error, token, Address, Env};

mod events;
pub mod price_converter;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_withdraw;

pub use price_converter::{PriceFeed, PriceFeedClient, MAX_PRICE_AGE_SECS};
pub use types::{FundingConfig, RoundData};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// The contribution is worth less than the USD minimum.
    ///
    /// Contract errors carry no payload. The USD value and the minimum are
    /// only attached through `log!`, which is compiled out of release WASM,
    /// so callers that need the threshold should read `get_minimum_usd`.
    InsufficientContribution = 1,
    NotOwner = 2,
    TransferFailed = 3,
    OracleUnavailable = 4,
    FunderIndexOutOfRange = 5,
    InvalidAmount = 6,
    Overflow = 7,
}

#[contract]
pub struct FundMe;

#[contractimpl]
impl FundMe {
    /// Fix the owner, price feed, native asset and USD floor.
    ///
    /// `minimum_usd` uses the native asset's decimal scale and must be positive.
    pub fn __constructor(
        env: Env,
        owner: Address,
        price_feed: Address,
        native_token: Address,
        minimum_usd: i128,
    ) {
        if minimum_usd <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        storage::save_config(
            &env,
            &FundingConfig {
                owner,
                price_feed,
                native_token,
                minimum_usd,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the native asset.
    ///
    /// Fails with `InsufficientContribution` when the USD value of `amount`
    /// is below the configured minimum.
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), Error> {
        Self::admit(&env, funder, amount)
    }

    /// Plain value transfer into the contract.
    ///
    /// Goes through the same admission rules as [`FundMe::fund`]; there is
    /// no way to credit the contract without passing the USD floor.
    pub fn receive(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        Self::admit(&env, from, amount)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Move the whole balance to the owner and reset every funder.
    ///
    /// Returns the amount paid out. Calling it on a settled contract pays
    /// out nothing and succeeds.
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        let config = storage::load_config(&env);
        if caller != config.owner {
            return Err(Error::NotOwner);
        }
        caller.require_auth();

        // Effects first: nothing below may observe a funded ledger.
        let cleared = storage::clear_funders(&env);

        let token_client = token::Client::new(&env, &config.native_token);
        let contract_address = env.current_contract_address();
        let amount = token_client.balance(&contract_address);

        if amount > 0 {
            match token_client.try_transfer(&contract_address, &config.owner, &amount) {
                Ok(Ok(())) => {}
                _ => {
                    log!(&env, "payout to owner failed", amount);
                    return Err(Error::TransferFailed);
                }
            }
        }

        events::emit_withdrawn(&env, config.owner, amount, cleared);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Address {
        storage::get_owner(&env)
    }

    pub fn get_price_feed(env: Env) -> Address {
        storage::get_price_feed(&env)
    }

    pub fn get_native_token(env: Env) -> Address {
        storage::get_native_token(&env)
    }

    pub fn get_minimum_usd(env: Env) -> i128 {
        storage::get_minimum_usd(&env)
    }

    /// Cumulative contribution of `funder` since the last withdrawal.
    pub fn get_address_to_amount_funded(env: Env, funder: Address) -> i128 {
        storage::get_amount_funded(&env, &funder).unwrap_or(0)
    }

    /// Funder at registry position `index`.
    pub fn get_funder(env: Env, index: u32) -> Result<Address, Error> {
        storage::get_funder(&env, index).ok_or(Error::FunderIndexOutOfRange)
    }

    pub fn get_funder_count(env: Env) -> u32 {
        storage::get_funder_count(&env)
    }

    /// Native-asset balance currently held by the contract.
    pub fn get_balance(env: Env) -> i128 {
        let token_client = token::Client::new(&env, &storage::get_native_token(&env));
        token_client.balance(&env.current_contract_address())
    }

    /// USD value of `amount` at the current feed price.
    pub fn get_conversion_rate(env: Env, amount: i128) -> Result<i128, Error> {
        price_converter::get_conversion_rate(&env, &storage::get_price_feed(&env), amount)
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn admit(env: &Env, funder: Address, amount: i128) -> Result<(), Error> {
        funder.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = storage::load_config(env);
        let usd_value = price_converter::get_conversion_rate(env, &config.price_feed, amount)?;
        if usd_value < config.minimum_usd {
            log!(env, "contribution below minimum", usd_value, config.minimum_usd);
            return Err(Error::InsufficientContribution);
        }

        let token_client = token::Client::new(env, &config.native_token);
        token_client.transfer(&funder, &env.current_contract_address(), &amount);

        let total = match storage::get_amount_funded(env, &funder) {
            Some(previous) => previous.checked_add(amount).ok_or(Error::Overflow)?,
            None => {
                storage::push_funder(env, &funder);
                amount
            }
        };
        storage::set_amount_funded(env, &funder, total);

        events::emit_funded(env, funder, amount, usd_value);
        Ok(())
    }
}
