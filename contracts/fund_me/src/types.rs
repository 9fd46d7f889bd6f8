//! # Types
//!
//! Shared data structures used across the FundMe modules.
//!
//! ## Decimal scales
//!
//! Two fixed-point scales meet in this contract:
//!
//! - the native asset, whose smallest unit is used for every contribution,
//!   ledger entry, and for [`FundingConfig::minimum_usd`];
//! - the price feed, whose answer carries `decimals()` fractional digits.
//!
//! Converting `amount * answer / 10^decimals` yields a USD value that shares
//! the native asset's scale, which is why the minimum is configured in that
//! scale as well (e.g. `50 * 10^7` for $50 against a 7-decimal asset).

use soroban_sdk::{contracttype, Address};

/// Creation-time configuration. Never mutated after the constructor runs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingConfig {
    /// Only address allowed to withdraw.
    pub owner: Address,
    /// Price feed reporting the native asset in USD.
    pub price_feed: Address,
    /// Token contract of the contributed asset.
    pub native_token: Address,
    /// Smallest accepted contribution, in USD at the native scale.
    pub minimum_usd: i128,
}

/// Latest round reported by a price feed.
///
/// Field layout follows the AggregatorV3 `latestRoundData` tuple.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    /// Price of one native unit, scaled by the feed's `decimals()`.
    pub answer: i128,
    pub started_at: u64,
    /// Ledger timestamp of the last update. Zero means the round is incomplete.
    pub updated_at: u64,
    pub answered_in_round: u64,
}
