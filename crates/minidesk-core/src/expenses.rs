//! Expense tracker records.
//!
//! Drafts come from free-form input and are validated before they reach
//! the database; see [`crate::storage::Database`] for persistence.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
}

/// A validated expense that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    pub fn new(name: &str, amount: f64, date: NaiveDate) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingInput("an expense name".into()));
        }
        if !amount.is_finite() {
            return Err(ValidationError::NotANumber {
                field: "amount".into(),
                value: amount.to_string(),
            });
        }
        if amount <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "Amount".into(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            amount,
            date,
        })
    }

    /// Parse raw form fields. A missing date means today.
    pub fn parse(name: &str, amount: &str, date: Option<&str>) -> Result<Self, ValidationError> {
        let amount_raw = amount.trim();
        if amount_raw.is_empty() {
            return Err(ValidationError::MissingInput("an amount".into()));
        }
        let amount = amount_raw
            .parse::<f64>()
            .map_err(|_| ValidationError::NotANumber {
                field: "amount".into(),
                value: amount_raw.into(),
            })?;
        let date = match date.map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_date(raw)?,
            _ => Utc::now().date_naive(),
        };
        Self::new(name, amount, date)
    }

    pub fn into_expense(self, id: i64) -> Expense {
        Expense {
            id,
            name: self.name,
            amount: self.amount,
            date: self.date,
        }
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none() && self.date.is_none()
    }

    /// Apply on top of `current`, re-validating the merged record.
    pub fn apply(&self, current: &Expense) -> Result<ExpenseDraft, ValidationError> {
        let name = self.name.as_deref().unwrap_or(&current.name);
        let amount = self
            .amount
            .clone()
            .unwrap_or_else(|| current.amount.to_string());
        let date = self
            .date
            .clone()
            .unwrap_or_else(|| current.date.format(DATE_FORMAT).to_string());
        ExpenseDraft::parse(name, &amount, Some(date.as_str()))
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.trim().to_string()))
}

/// Sum of all amounts.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn parse_accepts_valid_fields() {
        let draft = ExpenseDraft::parse(" Groceries ", "250", Some("2024-05-15")).unwrap();
        assert_eq!(draft.name, "Groceries");
        assert_eq!(draft.amount, 250.0);
        assert_eq!(draft.date, date("2024-05-15"));
    }

    #[test]
    fn parse_defaults_to_today() {
        let draft = ExpenseDraft::parse("Coffee", "3.5", None).unwrap();
        assert_eq!(draft.date, Utc::now().date_naive());
    }

    #[test]
    fn parse_rejects_bad_fields() {
        assert!(matches!(
            ExpenseDraft::parse("", "10", None),
            Err(ValidationError::MissingInput(_))
        ));
        assert!(matches!(
            ExpenseDraft::parse("Rent", "lots", None),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            ExpenseDraft::parse("Rent", "0", None),
            Err(ValidationError::NotPositive { .. })
        ));
        assert!(matches!(
            ExpenseDraft::parse("Rent", "10", Some("06/01/2024")),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn patch_merges_over_current() {
        let current = ExpenseDraft::parse("Rent", "1200", Some("2024-06-01"))
            .unwrap()
            .into_expense(2);
        let patch = ExpensePatch {
            amount: Some("1250.50".into()),
            ..Default::default()
        };
        let merged = patch.apply(&current).unwrap();
        assert_eq!(merged.name, "Rent");
        assert_eq!(merged.amount, 1250.5);
        assert_eq!(merged.date, date("2024-06-01"));
    }

    #[test]
    fn total_sums_amounts() {
        let items = vec![
            ExpenseDraft::parse("A", "10.25", None).unwrap().into_expense(1),
            ExpenseDraft::parse("B", "4.75", None).unwrap().into_expense(2),
        ];
        assert_eq!(total(&items), 15.0);
        assert_eq!(total(&[]), 0.0);
    }
}
