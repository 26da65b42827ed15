//! Project records and derived-field computation.
//!
//! A [`ProjectDraft`] is what the form hands over: raw user-entered fields.
//! A [`ProjectRecord`] is a full table row, including the derived part
//! amounts and the contribution-validity flag. Derivation happens in exactly
//! one place, [`ProjectRecord::from_draft`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collaborator::Collaborator;
use crate::enums::{Service, TransferMethod};
use crate::error::ModelError;
use crate::schema::columns;

/// One `f64` per collaborator, used for both contribution percentages and
/// derived part amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ThreeWaySplit {
    pub meet: f64,
    pub spandan: f64,
    pub srey: f64,
}

impl ThreeWaySplit {
    pub fn new(meet: f64, spandan: f64, srey: f64) -> Self {
        Self { meet, spandan, srey }
    }

    pub fn get(&self, collaborator: Collaborator) -> f64 {
        match collaborator {
            Collaborator::Meet => self.meet,
            Collaborator::Spandan => self.spandan,
            Collaborator::Srey => self.srey,
        }
    }

    pub fn total(&self) -> f64 {
        self.meet + self.spandan + self.srey
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            meet: f(self.meet),
            spandan: f(self.spandan),
            srey: f(self.srey),
        }
    }
}

/// User-entered project fields, before derivation.
///
/// The `date` here is the form's date input. On an edit of an existing
/// project the store ignores it and keeps the previously recorded date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub number: String,
    pub client_name: String,
    pub business_name: String,
    pub date: NaiveDate,
    pub services: Service,
    pub payment_got_percent: f64,
    pub quote: f64,
    pub amount_total: f64,
    pub transfer_method: TransferMethod,
    pub contributions: ThreeWaySplit,
}

impl ProjectDraft {
    /// Checks the field-range constraints the form is supposed to enforce.
    ///
    /// Percentages must sit in 0-100, monetary amounts must be non-negative,
    /// and the project number must not be blank. A contribution split that
    /// does not sum to 100 is NOT an error here; it is recorded in the
    /// derived validity flag instead.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.number.trim().is_empty() {
            return Err(ModelError::EmptyNumber);
        }
        check_percent(columns::PAYMENT_GOT_PERCENT, self.payment_got_percent)?;
        for collaborator in Collaborator::ALL {
            check_percent(
                collaborator.contribution_column(),
                self.contributions.get(collaborator),
            )?;
        }
        check_amount(columns::QUOTE, self.quote)?;
        check_amount(columns::AMOUNT_TOTAL, self.amount_total)?;
        Ok(())
    }

    /// Amount actually received: `payment_got_percent` applied to the total.
    pub fn payment_got_amount(&self) -> f64 {
        self.payment_got_percent * self.amount_total / 100.0
    }

    /// Each collaborator's share of the received amount.
    pub fn part_amounts(&self) -> ThreeWaySplit {
        let payment_got = self.payment_got_amount();
        self.contributions.map(|pct| pct * payment_got / 100.0)
    }

    /// Whether the three contribution percentages sum to exactly 100.
    ///
    /// Exact comparison is deliberate: `{40, 30, 29.99}` is flagged invalid.
    pub fn contribution_valid(&self) -> bool {
        self.contributions.total() == 100.0
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), ModelError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ModelError::PercentOutOfRange { field, value });
    }
    Ok(())
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value < 0.0 {
        return Err(ModelError::NegativeAmount { field, value });
    }
    Ok(())
}

/// A fully materialized table row.
///
/// `date` is the ISO `YYYY-MM-DD` string as stored, or `None` when the
/// stored value was missing or unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub number: String,
    pub client_name: String,
    pub business_name: String,
    pub date: Option<String>,
    pub services: Service,
    pub payment_got_percent: f64,
    pub quote: f64,
    pub amount_total: f64,
    pub transfer_method: TransferMethod,
    pub contributions: ThreeWaySplit,
    pub parts: ThreeWaySplit,
    pub contribution_valid: bool,
}

impl ProjectRecord {
    /// Materializes a draft into a full row, computing all derived fields.
    pub fn from_draft(draft: &ProjectDraft) -> Self {
        Self {
            number: draft.number.clone(),
            client_name: draft.client_name.clone(),
            business_name: draft.business_name.clone(),
            date: Some(draft.date.format("%Y-%m-%d").to_string()),
            services: draft.services,
            payment_got_percent: draft.payment_got_percent,
            quote: draft.quote,
            amount_total: draft.amount_total,
            transfer_method: draft.transfer_method,
            contributions: draft.contributions,
            parts: draft.part_amounts(),
            contribution_valid: draft.contribution_valid(),
        }
    }
}
