//! Time window presets.
//!
//! A preset is turned into a cutoff once, from an explicit reference clock,
//! and the history is filtered against that cutoff before aggregation.

use crate::models::TransactionRecord;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named "show since" choices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WindowPreset {
    /// The whole history
    #[default]
    Ever,
    /// One calendar month back
    Month,
    /// Seven days back
    Week,
    /// One day back
    Yesterday,
}

impl fmt::Display for WindowPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPreset::Ever => write!(f, "ever"),
            WindowPreset::Month => write!(f, "month"),
            WindowPreset::Week => write!(f, "week"),
            WindowPreset::Yesterday => write!(f, "yesterday"),
        }
    }
}

impl WindowPreset {
    /// Cutoff for this preset relative to `now`. `None` means no lower bound.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            WindowPreset::Ever => None,
            WindowPreset::Month => now
                .checked_sub_months(Months::new(1))
                .or(Some(now - Duration::days(30))),
            WindowPreset::Week => Some(now - Duration::days(7)),
            WindowPreset::Yesterday => Some(now - Duration::days(1)),
        }
    }
}

/// Records strictly after `cutoff`, or all of them when there is none.
///
/// Returns a new vector; `history` is left untouched.
pub fn filter_since(
    history: &[TransactionRecord],
    cutoff: Option<DateTime<Utc>>,
) -> Vec<TransactionRecord> {
    match cutoff {
        None => history.to_vec(),
        Some(cutoff) => history
            .iter()
            .filter(|record| record.is_after(cutoff))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date;

    fn at(date: &str) -> TransactionRecord {
        TransactionRecord {
            date: parse_date(date),
            ..Default::default()
        }
    }

    #[test]
    fn test_cutoffs() {
        let now = parse_date("2024-03-31T12:00:00Z").unwrap();

        assert_eq!(WindowPreset::Ever.cutoff(now), None);
        assert_eq!(
            WindowPreset::Month.cutoff(now),
            parse_date("2024-02-29T12:00:00Z")
        );
        assert_eq!(
            WindowPreset::Week.cutoff(now),
            parse_date("2024-03-24T12:00:00Z")
        );
        assert_eq!(
            WindowPreset::Yesterday.cutoff(now),
            parse_date("2024-03-30T12:00:00Z")
        );
    }

    #[test]
    fn test_filter_since_is_strict() {
        let history = vec![
            at("2024-03-01"),
            at("2024-03-10"),
            at("2024-03-20"),
            TransactionRecord::default(),
        ];

        let kept = filter_since(&history, parse_date("2024-03-10"));
        assert_eq!(kept, vec![at("2024-03-20")]);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_ever_keeps_everything() {
        let history = vec![at("2001-01-01"), TransactionRecord::default()];
        assert_eq!(filter_since(&history, WindowPreset::Ever.cutoff(Utc::now())), history);
    }
}
