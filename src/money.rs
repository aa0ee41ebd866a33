//! Money helpers.
//!
//! Amounts are carried as integer cents everywhere. Conversion to euros only
//! happens here, when a value is about to be shown to a user, and parsing
//! turns user-typed text straight back into cents.

use crate::error::{Result, StatsError};

/// Format an amount in cents as euros, e.g. `1250` -> `12,50 €`.
pub fn format_euro(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{},{:02} €", sign, abs / 100, abs % 100)
}

/// Parse a user-typed amount into cents.
///
/// Accepts digits optionally followed by a comma (or dot) and one or two
/// decimals: `12`, `12,5`, `12,50`, `0.01`.
pub fn parse_amount(text: &str) -> Result<i64> {
    let invalid = || StatsError::InvalidAmount(text.to_string());
    let trimmed = text.trim();

    let (units, decimals) = match trimmed.split_once([',', '.']) {
        Some((units, decimals)) => (units, Some(decimals)),
        None => (trimmed, None),
    };

    if units.is_empty() || !units.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let cents = match decimals {
        None => 0,
        Some(d) if (1..=2).contains(&d.len()) && d.bytes().all(|b| b.is_ascii_digit()) => {
            let value: i64 = d.parse().map_err(|_| invalid())?;
            if d.len() == 1 {
                value * 10
            } else {
                value
            }
        }
        Some(_) => return Err(invalid()),
    };

    units
        .parse::<i64>()
        .ok()
        .and_then(|u| u.checked_mul(100))
        .and_then(|u| u.checked_add(cents))
        .ok_or_else(invalid)
}
