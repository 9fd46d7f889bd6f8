#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;
use std::vec::Vec;

use crate::FundMeClient;

/// Every address currently in the funder registry, in registry order.
pub fn registry(client: &FundMeClient) -> Vec<Address> {
    (0..client.get_funder_count())
        .map(|i| client.get_funder(&i))
        .collect()
}

/// INV-1: the ledger accounts for every unit the contract holds.
pub fn assert_ledger_matches_balance(client: &FundMeClient) {
    let total: i128 = registry(client)
        .iter()
        .map(|funder| client.get_address_to_amount_funded(funder))
        .sum();
    assert_eq!(
        total,
        client.get_balance(),
        "INV-1 violated: ledger total {} != contract balance {}",
        total,
        client.get_balance()
    );
}

/// INV-2: no address appears twice in the registry.
pub fn assert_registry_distinct(client: &FundMeClient) {
    let funders = registry(client);
    for (i, a) in funders.iter().enumerate() {
        for b in funders.iter().skip(i + 1) {
            assert_ne!(a, b, "INV-2 violated: duplicate funder at registry index {}", i);
        }
    }
}

/// INV-3: every registered funder has a positive ledger entry.
pub fn assert_registered_funders_positive(client: &FundMeClient) {
    for funder in registry(client) {
        assert!(
            client.get_address_to_amount_funded(&funder) > 0,
            "INV-3 violated: registered funder has an empty ledger entry"
        );
    }
}

/// INV-4: after a contribution of `amount`, the funder's entry grew by exactly `amount`.
pub fn assert_contribution_invariant(before: i128, after: i128, amount: i128) {
    assert_eq!(
        after,
        before + amount,
        "INV-4 violated: contribution invariant broken: {} + {} != {}",
        before,
        amount,
        after
    );
}

/// INV-5: a settled contract holds nothing and remembers no funder.
pub fn assert_settled(client: &FundMeClient, former_funders: &[Address]) {
    assert_eq!(client.get_balance(), 0, "INV-5 violated: balance left behind");
    assert_eq!(
        client.get_funder_count(),
        0,
        "INV-5 violated: registry not cleared"
    );
    for funder in former_funders {
        assert_eq!(
            client.get_address_to_amount_funded(funder),
            0,
            "INV-5 violated: ledger entry survived withdrawal"
        );
    }
}

/// Run all ledger invariants that hold between operations.
pub fn assert_all_ledger_invariants(client: &FundMeClient) {
    assert_ledger_matches_balance(client);
    assert_registry_distinct(client);
    assert_registered_funders_positive(client);
}
