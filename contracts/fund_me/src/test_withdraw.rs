extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env,
};
use std::vec::Vec;

use crate::invariants;
use crate::mocks::{
    MockV3Aggregator, RejectingToken, RejectingTokenClient, FEED_DECIMALS, INITIAL_ANSWER,
};
use crate::test::{setup, MINIMUM_USD, START_TIME, UNIT};
use crate::{Error, FundMe, FundMeClient};

#[test]
fn test_single_funder_withdraw() {
    let s = setup();
    let funder = s.funded_account(5 * UNIT);
    s.client.fund(&funder, &(5 * UNIT));

    let starting_owner_balance = s.token.balance(&s.owner);
    let starting_contract_balance = s.client.get_balance();

    let withdrawn = s.client.withdraw(&s.owner);

    assert_eq!(withdrawn, starting_contract_balance);
    assert_eq!(s.client.get_balance(), 0);
    assert_eq!(
        s.token.balance(&s.owner),
        starting_owner_balance + starting_contract_balance
    );
    invariants::assert_settled(&s.client, &[funder]);
}

#[test]
fn test_withdraw_with_multiple_funders() {
    let s = setup();
    let funders: Vec<Address> = (0..5).map(|_| s.funded_account(UNIT)).collect();
    for funder in funders.iter() {
        s.client.fund(funder, &UNIT);
    }
    assert_eq!(s.client.get_funder_count(), 5);
    assert_eq!(s.client.get_balance(), 5 * UNIT);

    s.client.withdraw(&s.owner);

    assert_eq!(s.token.balance(&s.owner), 5 * UNIT);
    invariants::assert_settled(&s.client, &funders);
    assert_eq!(
        s.client.try_get_funder(&0),
        Err(Ok(Error::FunderIndexOutOfRange))
    );
}

#[test]
fn test_non_owner_cannot_withdraw() {
    let s = setup();
    let funder = s.funded_account(12 * UNIT);
    s.client.fund(&funder, &(12 * UNIT));

    let intruder = Address::generate(&s.env);
    assert_eq!(s.client.try_withdraw(&intruder), Err(Ok(Error::NotOwner)));
    // A funder is not the owner either.
    assert_eq!(s.client.try_withdraw(&funder), Err(Ok(Error::NotOwner)));

    assert_eq!(s.client.get_balance(), 12 * UNIT);
    assert_eq!(s.client.get_funder_count(), 1);
    assert_eq!(s.client.get_address_to_amount_funded(&funder), 12 * UNIT);
    assert_eq!(s.token.balance(&intruder), 0);
}

#[test]
fn test_withdraw_on_settled_contract_is_noop() {
    let s = setup();
    assert_eq!(s.client.withdraw(&s.owner), 0);

    let funder = s.funded_account(UNIT);
    s.client.fund(&funder, &UNIT);
    assert_eq!(s.client.withdraw(&s.owner), UNIT);
    assert_eq!(s.client.withdraw(&s.owner), 0);

    assert_eq!(s.token.balance(&s.owner), UNIT);
    invariants::assert_settled(&s.client, &[funder]);
}

#[test]
fn test_funding_after_withdraw_starts_new_round() {
    let s = setup();
    let first = s.funded_account(2 * UNIT);
    let second = s.funded_account(2 * UNIT);

    s.client.fund(&first, &UNIT);
    s.client.fund(&second, &UNIT);
    s.client.withdraw(&s.owner);

    s.client.fund(&second, &UNIT);
    assert_eq!(s.client.get_funder_count(), 1);
    assert_eq!(s.client.get_funder(&0), second);
    assert_eq!(s.client.get_address_to_amount_funded(&second), UNIT);
    assert_eq!(s.client.get_address_to_amount_funded(&first), 0);
    invariants::assert_all_ledger_invariants(&s.client);
}

#[test]
fn test_direct_transfer_is_uncredited_but_swept() {
    let s = setup();
    let funder = s.funded_account(UNIT);
    s.client.fund(&funder, &UNIT);

    // A plain token transfer bypasses admission entirely.
    let stray = s.funded_account(UNIT / 100);
    s.token.transfer(&stray, &s.client.address, &(UNIT / 100));

    assert_eq!(s.client.get_balance(), UNIT + UNIT / 100);
    assert_eq!(s.client.get_funder_count(), 1);
    assert_eq!(s.client.get_address_to_amount_funded(&stray), 0);
    assert_eq!(s.client.get_address_to_amount_funded(&funder), UNIT);

    assert_eq!(s.client.withdraw(&s.owner), UNIT + UNIT / 100);
    assert_eq!(s.token.balance(&s.owner), UNIT + UNIT / 100);
    invariants::assert_settled(&s.client, &[funder, stray]);
}

// ── Rejecting recipient ──────────────────────────────────────────────

struct RejectingSetup {
    owner: Address,
    client: FundMeClient<'static>,
    token: RejectingTokenClient<'static>,
    env: Env,
}

fn setup_with_rejecting_token() -> RejectingSetup {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START_TIME);

    let owner = Address::generate(&env);
    let token_id = env.register(RejectingToken, ());
    let feed_id = env.register(MockV3Aggregator, (FEED_DECIMALS, INITIAL_ANSWER));
    let contract_id = env.register(FundMe, (owner.clone(), feed_id, token_id.clone(), MINIMUM_USD));

    RejectingSetup {
        client: FundMeClient::new(&env, &contract_id),
        token: RejectingTokenClient::new(&env, &token_id),
        owner,
        env,
    }
}

#[test]
fn test_failed_payout_rolls_back_withdraw() {
    let s = setup_with_rejecting_token();
    let funders: Vec<Address> = (0..3).map(|_| Address::generate(&s.env)).collect();
    for (i, funder) in funders.iter().enumerate() {
        let amount = (i as i128 + 1) * UNIT;
        s.token.mint(funder, &amount);
        s.client.fund(funder, &amount);
    }
    s.token.block(&s.owner);

    assert_eq!(
        s.client.try_withdraw(&s.owner),
        Err(Ok(Error::TransferFailed))
    );

    // Nothing moved and nothing was reset.
    assert_eq!(s.client.get_balance(), 6 * UNIT);
    assert_eq!(s.token.balance(&s.owner), 0);
    assert_eq!(invariants::registry(&s.client), funders);
    for (i, funder) in funders.iter().enumerate() {
        assert_eq!(
            s.client.get_address_to_amount_funded(funder),
            (i as i128 + 1) * UNIT
        );
    }
    invariants::assert_all_ledger_invariants(&s.client);
}

#[test]
fn test_failed_payout_keeps_contract_usable() {
    let s = setup_with_rejecting_token();
    let funder = Address::generate(&s.env);
    s.token.mint(&funder, &(2 * UNIT));
    s.client.fund(&funder, &UNIT);
    s.token.block(&s.owner);

    assert!(s.client.try_withdraw(&s.owner).is_err());
    assert!(s.client.try_withdraw(&s.owner).is_err());

    // The contract keeps accepting contributions on top of the intact ledger.
    s.client.fund(&funder, &UNIT);
    assert_eq!(s.client.get_address_to_amount_funded(&funder), 2 * UNIT);
    assert_eq!(s.client.get_funder_count(), 1);
    assert_eq!(s.client.get_balance(), 2 * UNIT);
}

#[test]
fn test_withdraw_pays_owner_through_custom_token() {
    let s = setup_with_rejecting_token();
    let funder = Address::generate(&s.env);
    s.token.mint(&funder, &UNIT);
    s.client.fund(&funder, &UNIT);

    assert_eq!(s.client.withdraw(&s.owner), UNIT);
    assert_eq!(s.token.balance(&s.owner), UNIT);
    invariants::assert_settled(&s.client, &[funder]);
}
