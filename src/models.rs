//! Data models for the statistics viewer.
//!
//! This module contains the transaction records read from a history
//! snapshot and the ranked structures produced from them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Purchase of one or more items.
    Buy,
    /// Money given to another person.
    TransferOut,
    /// Money received from another person.
    TransferIn,
    /// Account top-up.
    Recharge,
    /// Anything this tool does not know about.
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "buy"),
            TransactionKind::TransferOut => write!(f, "transfer_out"),
            TransactionKind::TransferIn => write!(f, "transfer_in"),
            TransactionKind::Recharge => write!(f, "recharge"),
            TransactionKind::Other => write!(f, "other"),
        }
    }
}

/// One purchased item inside a purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemLine {
    /// Item name, used as the grouping key.
    #[serde(default)]
    pub name: String,
    /// Number of units bought.
    #[serde(default)]
    pub quantity: i64,
    /// Price of a single unit in cents.
    #[serde(default)]
    pub unit_price_in_cents: i64,
}

impl ItemLine {
    /// Total price of this line in cents, saturating at the `i64` bounds.
    pub fn total_in_cents(&self) -> i64 {
        self.quantity.saturating_mul(self.unit_price_in_cents)
    }
}

/// A single entry of a user's transaction history.
///
/// Every field is optional on the wire: a record that lacks what a
/// ranking needs simply contributes nothing to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// When the transaction happened. `None` when missing or unparsable.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    /// Record discriminator.
    #[serde(default, rename = "type")]
    pub kind: TransactionKind,
    /// Purchased items (purchase records only).
    #[serde(default)]
    pub items: Vec<ItemLine>,
    /// The other party of a transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart_name: Option<String>,
    /// Amount of the transaction in cents.
    #[serde(default)]
    pub amount_in_cents: i64,
}

impl TransactionRecord {
    /// Returns true if the record happened strictly after `cutoff`.
    ///
    /// Undated records are never considered after anything.
    pub fn is_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.date.is_some_and(|date| date > cutoff)
    }
}

/// Parse a date string in any of the accepted layouts.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC,
/// or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// One line of a ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Grouping key (item name or person name), unique within a list.
    pub name: String,
    /// Summed quantity, or summed amount in cents.
    pub count: i64,
}

impl RankEntry {
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// What a ranking's `count` column measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankUnit {
    /// Plain number of units.
    Quantity,
    /// Amount in cents.
    Money,
}

/// The four leaderboards shown by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingCategory {
    MostPurchased,
    MostSpent,
    MostReceivedFrom,
    MostGivenTo,
}

impl RankingCategory {
    /// All categories, in display order.
    pub const ALL: [RankingCategory; 4] = [
        RankingCategory::MostPurchased,
        RankingCategory::MostSpent,
        RankingCategory::MostReceivedFrom,
        RankingCategory::MostGivenTo,
    ];

    /// Human readable title.
    pub fn title(&self) -> &'static str {
        match self {
            RankingCategory::MostPurchased => "Most purchased items",
            RankingCategory::MostSpent => "Most money spent on",
            RankingCategory::MostReceivedFrom => "Most received from",
            RankingCategory::MostGivenTo => "Most given to",
        }
    }

    /// Unit of the count column.
    pub fn unit(&self) -> RankUnit {
        match self {
            RankingCategory::MostPurchased => RankUnit::Quantity,
            _ => RankUnit::Money,
        }
    }
}

impl fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// A truncated leaderboard ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub category: RankingCategory,
    pub unit: RankUnit,
    pub entries: Vec<RankEntry>,
}

/// Metadata about a statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the history was loaded from.
    pub source: String,
    /// Name of the selected window preset.
    pub window: String,
    /// Effective start of the window; `None` for the beginning of time.
    pub since: Option<DateTime<Utc>>,
    /// Reference clock the window was computed from.
    pub generated_at: DateTime<Utc>,
    /// Records in the loaded history.
    pub total_records: usize,
    /// Records kept by the window.
    pub records_in_window: usize,
}

/// The complete statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub metadata: ReportMetadata,
    pub rankings: Vec<Ranking>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_layouts() {
        let midnight = parse_date("2020-01-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2020-01-01T00:00:00+00:00");

        let naive = parse_date("2019-03-12T10:22:33.000").unwrap();
        assert_eq!(naive.to_rfc3339(), "2019-03-12T10:22:33+00:00");

        let offset = parse_date("2019-03-12T12:22:33+02:00").unwrap();
        assert_eq!(offset, naive);

        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_record_deserialization_is_lenient() {
        let json = r#"[
            {"date": "2020-01-05", "type": "buy", "items": [{"name": "Coffee", "quantity": 2, "unit_price_in_cents": 100}]},
            {"date": "not a date", "type": "transfer_in", "counterpart_name": "Alice", "amount_in_cents": 500},
            {"type": "cashback"},
            {}
        ]"#;

        let records: Vec<TransactionRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].kind, TransactionKind::Buy);
        assert_eq!(records[0].items[0].total_in_cents(), 200);
        assert_eq!(records[1].date, None);
        assert_eq!(records[1].counterpart_name.as_deref(), Some("Alice"));
        assert_eq!(records[2].kind, TransactionKind::Other);
        assert_eq!(records[3], TransactionRecord::default());
    }

    #[test]
    fn test_is_after_is_strict() {
        let cutoff = parse_date("2020-01-01").unwrap();
        let at_cutoff = TransactionRecord {
            date: Some(cutoff),
            ..Default::default()
        };
        let undated = TransactionRecord::default();

        assert!(!at_cutoff.is_after(cutoff));
        assert!(!undated.is_after(cutoff));
        assert!(at_cutoff.is_after(parse_date("2019-12-31").unwrap()));
    }

    #[test]
    fn test_category_units() {
        assert_eq!(RankingCategory::MostPurchased.unit(), RankUnit::Quantity);
        assert_eq!(RankingCategory::MostSpent.unit(), RankUnit::Money);
        assert_eq!(RankingCategory::MostGivenTo.unit(), RankUnit::Money);
    }
}
