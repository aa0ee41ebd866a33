//! History aggregation and ranking.
//!
//! Every function here is a pure transformation over a borrowed history
//! slice: the input is never mutated and the output is built fresh on each
//! call. Windowing happens before these functions are called.

use crate::models::{ItemLine, RankEntry, TransactionKind, TransactionRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Returned by [`first_transaction_date`] for a history with no dated record.
pub const BEGINNING_OF_TIME: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// Running sums keyed by name, remembering the order keys were first seen.
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<RankEntry>,
}

impl Tally {
    fn add(&mut self, name: &str, amount: i64) {
        match self.index.get(name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.count = entry.count.saturating_add(amount);
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(RankEntry::new(name, amount));
            }
        }
    }

    /// Sort by count, highest first. Equal counts keep first-seen order.
    fn into_ranked(self) -> Vec<RankEntry> {
        let mut entries = self.entries;
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.count));
        entries
    }
}

/// Earliest date in the history, or [`BEGINNING_OF_TIME`] if there is none.
pub fn first_transaction_date(history: &[TransactionRecord]) -> DateTime<Utc> {
    history
        .iter()
        .filter_map(|record| record.date)
        .min()
        .unwrap_or(BEGINNING_OF_TIME)
}

fn rank_items<F>(history: &[TransactionRecord], measure: F) -> Vec<RankEntry>
where
    F: Fn(&ItemLine) -> i64,
{
    let mut tally = Tally::default();

    let lines = history
        .iter()
        .filter(|record| record.kind == TransactionKind::Buy)
        .flat_map(|record| record.items.iter())
        .filter(|line| !line.name.is_empty());

    for line in lines {
        tally.add(&line.name, measure(line));
    }

    tally.into_ranked()
}

fn rank_counterparts(history: &[TransactionRecord], kind: TransactionKind) -> Vec<RankEntry> {
    let mut tally = Tally::default();

    for record in history.iter().filter(|record| record.kind == kind) {
        match record.counterpart_name.as_deref() {
            Some(name) if !name.is_empty() => tally.add(name, record.amount_in_cents),
            _ => {}
        }
    }

    tally.into_ranked()
}

/// Items ranked by total quantity bought.
pub fn most_purchased_items(history: &[TransactionRecord]) -> Vec<RankEntry> {
    let ranked = rank_items(history, |line| line.quantity);
    debug!("Ranked {} purchased items", ranked.len());
    ranked
}

/// Items ranked by total money spent on them, in cents.
pub fn most_spent_items(history: &[TransactionRecord]) -> Vec<RankEntry> {
    let ranked = rank_items(history, |line| line.total_in_cents());
    debug!("Ranked {} items by spending", ranked.len());
    ranked
}

/// People ranked by total money received from them, in cents.
pub fn most_received_from_persons(history: &[TransactionRecord]) -> Vec<RankEntry> {
    let ranked = rank_counterparts(history, TransactionKind::TransferIn);
    debug!("Ranked {} senders", ranked.len());
    ranked
}

/// People ranked by total money given to them, in cents.
pub fn most_given_to_people(history: &[TransactionRecord]) -> Vec<RankEntry> {
    let ranked = rank_counterparts(history, TransactionKind::TransferOut);
    debug!("Ranked {} recipients", ranked.len());
    ranked
}

/// Keep the first `n` entries of a ranking.
pub fn top_n(mut ranked: Vec<RankEntry>, n: usize) -> Vec<RankEntry> {
    ranked.truncate(n);
    ranked
}
