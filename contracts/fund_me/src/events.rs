//! # Events
//!
//! | Topic 0     | Topic 1  | Data                         |
//! |-------------|----------|------------------------------|
//! | `funded`    | funder   | `(amount, usd_value)`        |
//! | `withdrawn` | owner    | `(amount, funders_cleared)`  |
//!
//! Events are published only after all state changes of the entry point have
//! been written. A failed invocation discards its events along with its writes.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub const FUNDED: Symbol = symbol_short!("funded");
pub const WITHDRAWN: Symbol = symbol_short!("withdrawn");

pub fn emit_funded(env: &Env, funder: Address, amount: i128, usd_value: i128) {
    env.events().publish((FUNDED, funder), (amount, usd_value));
}

pub fn emit_withdrawn(env: &Env, owner: Address, amount: i128, funders_cleared: u32) {
    env.events()
        .publish((WITHDRAWN, owner), (amount, funders_cleared));
}
