extern crate std;

use soroban_sdk::{testutils::Events, vec, IntoVal, TryIntoVal};

use crate::events::{FUNDED, WITHDRAWN};
use crate::test::{setup, UNIT};

#[test]
fn test_funded_event() {
    let s = setup();
    let funder = s.funded_account(UNIT);

    s.client.fund(&funder, &UNIT);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: ("funded", funder)
    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        FUNDED.into_val(&s.env),
        funder.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    // Data: (amount, usd_value)
    let data: (i128, i128) = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(data, (UNIT, 2_000 * UNIT));
}

#[test]
fn test_receive_emits_funded_event() {
    let s = setup();
    let sender = s.funded_account(2 * UNIT);

    s.client.receive(&sender, &(2 * UNIT));

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &s.env,
        FUNDED.into_val(&s.env),
        sender.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let data: (i128, i128) = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(data, (2 * UNIT, 4_000 * UNIT));
}

#[test]
fn test_withdrawn_event() {
    let s = setup();
    for _ in 0..3 {
        let funder = s.funded_account(UNIT);
        s.client.fund(&funder, &UNIT);
    }

    s.client.withdraw(&s.owner);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: ("withdrawn", owner)
    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        WITHDRAWN.into_val(&s.env),
        s.owner.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    // Data: (amount, funders_cleared)
    let data: (i128, u32) = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(data, (3 * UNIT, 3));
}

#[test]
fn test_settled_withdraw_reports_nothing_cleared() {
    let s = setup();

    s.client.withdraw(&s.owner);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let data: (i128, u32) = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(data, (0, 0));
}
