//! Statistics over a transaction history.
//!
//! `window` narrows the history to a time range and `aggregator` turns the
//! result into ranked lists.

pub mod aggregator;
pub mod window;

pub use aggregator::*;
pub use window::{filter_since, WindowPreset};

use crate::config::RankingConfig;
use crate::models::{Ranking, RankingCategory, TransactionRecord};

/// Build every leaderboard for an already windowed history.
pub fn build_rankings(history: &[TransactionRecord], limits: &RankingConfig) -> Vec<Ranking> {
    RankingCategory::ALL
        .iter()
        .map(|&category| {
            let (ranked, limit) = match category {
                RankingCategory::MostPurchased => {
                    (most_purchased_items(history), limits.purchased_top)
                }
                RankingCategory::MostSpent => (most_spent_items(history), limits.spent_top),
                RankingCategory::MostReceivedFrom => {
                    (most_received_from_persons(history), limits.received_top)
                }
                RankingCategory::MostGivenTo => {
                    (most_given_to_people(history), limits.given_top)
                }
            };

            Ranking {
                category,
                unit: category.unit(),
                entries: top_n(ranked, limit),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemLine, RankEntry, TransactionKind};

    #[test]
    fn test_build_rankings_applies_limits() {
        let history: Vec<TransactionRecord> = ["A", "B", "C"]
            .into_iter()
            .map(|name| TransactionRecord {
                kind: TransactionKind::Buy,
                items: vec![ItemLine {
                    name: name.to_string(),
                    quantity: 1,
                    unit_price_in_cents: 100,
                }],
                ..Default::default()
            })
            .collect();

        let limits = RankingConfig {
            purchased_top: 2,
            spent_top: 1,
            received_top: 5,
            given_top: 5,
        };

        let rankings = build_rankings(&history, &limits);
        assert_eq!(rankings.len(), 4);
        assert_eq!(rankings[0].category, RankingCategory::MostPurchased);
        assert_eq!(
            rankings[0].entries,
            vec![RankEntry::new("A", 1), RankEntry::new("B", 1)]
        );
        assert_eq!(rankings[1].entries, vec![RankEntry::new("A", 100)]);
        assert!(rankings[2].entries.is_empty());
        assert!(rankings[3].entries.is_empty());
    }
}
