//! Read model of the current funding round.
//!
//! Rebuilds what the contract's ledger looks like from indexed events: every
//! `withdrawn` event settles the contract, so only `funded` events after the
//! most recent withdrawal count. Funders are listed in the order of their
//! first contribution in the round, matching the contract's registry.

use serde::Serialize;
use tracing::warn;

use crate::events::{EventKind, EventRecord};

/// One funder's standing in the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunderTotal {
    pub funder: String,
    /// Cumulative native amount, as a decimal string.
    pub amount: String,
    pub contributions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub funder_count: usize,
    /// Sum of all funder totals, as a decimal string.
    pub total: String,
    /// Ledger of the withdrawal that opened this round, if any.
    pub since_ledger: Option<i64>,
    pub funders: Vec<FunderTotal>,
}

/// Fold `events` (ordered by ledger, then id) into the current round.
pub fn current_round(events: &[EventRecord]) -> RoundSummary {
    let last_withdrawal = events
        .iter()
        .rposition(|e| e.event_type == EventKind::Withdrawn.as_str());
    let (since_ledger, open) = match last_withdrawal {
        Some(i) => (Some(events[i].ledger), &events[i + 1..]),
        None => (None, events),
    };

    let mut totals: Vec<(String, i128, u32)> = Vec::new();
    for event in open {
        if event.event_type != EventKind::Funded.as_str() {
            continue;
        }
        let (Some(funder), Some(raw_amount)) = (&event.actor, &event.amount) else {
            warn!("Skipping funded event {} without funder or amount", event.id);
            continue;
        };
        let amount: i128 = match raw_amount.parse() {
            Ok(amount) => amount,
            Err(_) => {
                warn!("Skipping funded event {} with bad amount {raw_amount}", event.id);
                continue;
            }
        };

        match totals.iter_mut().find(|(f, _, _)| f == funder) {
            Some((_, total, count)) => {
                *total = total.saturating_add(amount);
                *count += 1;
            }
            None => totals.push((funder.clone(), amount, 1)),
        }
    }

    let total = totals
        .iter()
        .fold(0i128, |acc, (_, amount, _)| acc.saturating_add(*amount));

    RoundSummary {
        funder_count: totals.len(),
        total: total.to_string(),
        since_ledger,
        funders: totals
            .into_iter()
            .map(|(funder, amount, contributions)| FunderTotal {
                funder,
                amount: amount.to_string(),
                contributions,
            })
            .collect(),
    }
}
