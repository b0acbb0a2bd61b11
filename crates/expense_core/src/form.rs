//! Expense entry form state and submission.
//!
//! # Responsibility
//! - Hold the raw name/cost input and the error line shown under the form.
//! - Validate presence, parse cost, and submit creation requests.
//!
//! # Invariants
//! - An invalid submission never reaches the store.
//! - Fields are cleared only after the store accepted the document.
//! - Store failures leave no error text; they are logged only.

use crate::model::expense::{ExpenseDocument, ExpenseId};
use crate::store::ExpenseStore;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MISSING_VALUES_MESSAGE: &str = "Please enter values before submitting";
pub const INVALID_COST_MESSAGE: &str = "Cost must be a whole number";

static COST_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid cost prefix regex"));

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(ExpenseId),
    /// Input rejected; `error` holds the message now displayed.
    Rejected,
    /// The store refused the write; nothing is displayed.
    StoreFailed,
}

/// Entry form bound to two text inputs and an error line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub name: String,
    pub cost: String,
    pub error: String,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_cost(&mut self, value: impl Into<String>) {
        self.cost = value.into();
    }

    /// Validates the inputs and creates the document in `collection`.
    ///
    /// Does not guard against rapid duplicate submissions.
    pub fn submit<S: ExpenseStore>(&mut self, store: &mut S, collection: &str) -> SubmitOutcome {
        if self.name.is_empty() || self.cost.is_empty() {
            self.error = MISSING_VALUES_MESSAGE.to_string();
            info!("event=form_submit module=form status=rejected reason=missing_values");
            return SubmitOutcome::Rejected;
        }
        let Some(cost) = parse_cost(&self.cost) else {
            self.error = INVALID_COST_MESSAGE.to_string();
            info!("event=form_submit module=form status=rejected reason=invalid_cost");
            return SubmitOutcome::Rejected;
        };

        let document = ExpenseDocument::new(self.name.clone(), cost);
        match store.add(collection, &document) {
            Ok(id) => {
                self.name.clear();
                self.cost.clear();
                self.error.clear();
                SubmitOutcome::Created(id)
            }
            Err(err) => {
                warn!("event=form_submit module=form status=error error={err}");
                SubmitOutcome::StoreFailed
            }
        }
    }
}

/// Parses the leading integer of `raw`, ignoring trailing text.
///
/// Returns `None` when there is no leading integer or it overflows `i64`.
pub fn parse_cost(raw: &str) -> Option<i64> {
    let captures = COST_PREFIX_RE.captures(raw)?;
    captures.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_cost;

    #[test]
    fn parse_cost_takes_leading_integer() {
        assert_eq!(parse_cost("20"), Some(20));
        assert_eq!(parse_cost("  42abc"), Some(42));
        assert_eq!(parse_cost("12.99"), Some(12));
        assert_eq!(parse_cost("-3"), Some(-3));
        assert_eq!(parse_cost("+7"), Some(7));
    }

    #[test]
    fn parse_cost_rejects_non_numeric_and_overflow() {
        assert_eq!(parse_cost("abc"), None);
        assert_eq!(parse_cost(" "), None);
        assert_eq!(parse_cost("99999999999999999999"), None);
    }
}
