//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by FundMe.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key           | Type      | Description                                |
//! |---------------|-----------|--------------------------------------------|
//! | `Owner`       | `Address` | Only address allowed to withdraw           |
//! | `PriceFeed`   | `Address` | Native/USD price feed                      |
//! | `NativeToken` | `Address` | Token contract of the contributed asset    |
//! | `MinimumUsd`  | `i128`    | Contribution floor, native decimal scale   |
//! | `FunderCount` | `u32`     | Length of the funder registry              |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type      | Description                          |
//! |----------------------|-----------|--------------------------------------|
//! | `Funder(index)`      | `Address` | Registry slot, insertion ordered     |
//! | `AmountFunded(addr)` | `i128`    | Cumulative contribution of `addr`    |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! The registry is stored one slot per key instead of as a single `Vec` so a
//! contribution only ever writes the slot it appends.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::FundingConfig;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Withdrawal authority (Instance).
    Owner,
    /// Price feed contract address (Instance).
    PriceFeed,
    /// Token contract of the native asset (Instance).
    NativeToken,
    /// Minimum contribution in USD (Instance).
    MinimumUsd,
    /// Number of registered funders (Instance).
    FunderCount,
    /// Funder registry slot (Persistent).
    Funder(u32),
    /// Cumulative amount funded by an address (Persistent).
    AmountFunded(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Write the immutable configuration. Called once, from the constructor.
pub fn save_config(env: &Env, config: &FundingConfig) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Owner, &config.owner);
    instance.set(&DataKey::PriceFeed, &config.price_feed);
    instance.set(&DataKey::NativeToken, &config.native_token);
    instance.set(&DataKey::MinimumUsd, &config.minimum_usd);
    instance.set(&DataKey::FunderCount, &0u32);
    bump_instance(env);
}

/// Load the immutable configuration.
/// Panics if the constructor has not run.
pub fn load_config(env: &Env) -> FundingConfig {
    bump_instance(env);
    let instance = env.storage().instance();
    FundingConfig {
        owner: instance.get(&DataKey::Owner).expect("owner not set"),
        price_feed: instance.get(&DataKey::PriceFeed).expect("price feed not set"),
        native_token: instance
            .get(&DataKey::NativeToken)
            .expect("native token not set"),
        minimum_usd: instance
            .get(&DataKey::MinimumUsd)
            .expect("minimum usd not set"),
    }
}

pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .expect("owner not set")
}

pub fn get_price_feed(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PriceFeed)
        .expect("price feed not set")
}

pub fn get_native_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NativeToken)
        .expect("native token not set")
}

pub fn get_minimum_usd(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::MinimumUsd)
        .expect("minimum usd not set")
}

pub fn get_funder_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::FunderCount)
        .unwrap_or(0)
}

fn set_funder_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::FunderCount, &count);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Cumulative amount funded by `funder`, or `None` if it has no ledger entry.
pub fn get_amount_funded(env: &Env, funder: &Address) -> Option<i128> {
    let key = DataKey::AmountFunded(funder.clone());
    let amount: Option<i128> = env.storage().persistent().get(&key);
    if amount.is_some() {
        bump_persistent(env, &key);
    }
    amount
}

pub fn set_amount_funded(env: &Env, funder: &Address, amount: i128) {
    let key = DataKey::AmountFunded(funder.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

/// Registry slot at `index`, or `None` past the end.
pub fn get_funder(env: &Env, index: u32) -> Option<Address> {
    if index >= get_funder_count(env) {
        return None;
    }
    let key = DataKey::Funder(index);
    let funder: Option<Address> = env.storage().persistent().get(&key);
    if funder.is_some() {
        bump_persistent(env, &key);
    }
    funder
}

/// Append `funder` to the registry. The caller guarantees it is not present.
pub fn push_funder(env: &Env, funder: &Address) {
    let index = get_funder_count(env);
    let key = DataKey::Funder(index);
    env.storage().persistent().set(&key, funder);
    bump_persistent(env, &key);
    set_funder_count(env, index + 1);
}

/// Remove every registry slot and its ledger entry.
///
/// Returns the number of funders that were cleared.
pub fn clear_funders(env: &Env) -> u32 {
    let count = get_funder_count(env);
    let persistent = env.storage().persistent();
    for index in 0..count {
        let slot = DataKey::Funder(index);
        if let Some(funder) = persistent.get::<DataKey, Address>(&slot) {
            persistent.remove(&DataKey::AmountFunded(funder));
        }
        persistent.remove(&slot);
    }
    set_funder_count(env, 0);
    count
}
