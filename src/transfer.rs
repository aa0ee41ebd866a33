//! Transfer form validation.
//!
//! Checks a transfer the user is about to send: someone must be picked as
//! recipient and the amount must be well formed, above the minimum and
//! covered by the available credit.

use crate::money::{format_euro, parse_amount};

/// A transfer as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TransferDraft {
    pub recipient: Option<String>,
    pub amount: Option<String>,
    pub message: Option<String>,
}

/// A transfer that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTransfer {
    pub recipient: String,
    pub amount_in_cents: i64,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("no recipient selected")]
    MissingRecipient,

    #[error("no amount entered")]
    MissingAmount,

    #[error("{0:?} is not a valid amount")]
    MalformedAmount(String),

    #[error("amount must be at least {}", euros(.0))]
    BelowMinimum(i64),

    #[error("amount exceeds the available credit of {}", euros(.0))]
    InsufficientCredit(i64),
}

fn euros(cents: &i64) -> String {
    format_euro(*cents)
}

impl TransferDraft {
    /// Validate the draft, reporting the first problem found.
    pub fn validate(
        &self,
        min_amount_cents: i64,
        credit_cents: Option<i64>,
    ) -> Result<ValidTransfer, TransferError> {
        let recipient = self
            .recipient
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(TransferError::MissingRecipient)?;

        let raw = self.amount.as_deref().ok_or(TransferError::MissingAmount)?;
        let amount_in_cents =
            parse_amount(raw).map_err(|_| TransferError::MalformedAmount(raw.to_string()))?;

        if amount_in_cents < min_amount_cents {
            return Err(TransferError::BelowMinimum(min_amount_cents));
        }

        if let Some(credit) = credit_cents {
            if amount_in_cents > credit {
                return Err(TransferError::InsufficientCredit(credit));
            }
        }

        Ok(ValidTransfer {
            recipient: recipient.to_string(),
            amount_in_cents,
            message: self.message.clone().filter(|m| !m.trim().is_empty()),
        })
    }
}
