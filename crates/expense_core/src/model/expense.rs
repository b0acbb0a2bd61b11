//! Expense record and stored document payload.
//!
//! # Responsibility
//! - Define the payload written to the store (`ExpenseDocument`).
//! - Define the record mirrored locally and charted (`Expense`).
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another expense.
//! - `name` is non-empty for every persisted document. Whitespace is kept as
//!   entered.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable store-assigned identifier of an expense.
pub type ExpenseId = Uuid;

/// Document payload as persisted in an expense collection.
///
/// Serialized as `{"name": ..., "cost": ...}`; the identifier lives beside the
/// document, not inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDocument {
    pub name: String,
    /// Whole currency units. Only positive values take up chart area.
    pub cost: i64,
}

impl ExpenseDocument {
    pub fn new(name: impl Into<String>, cost: i64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }

    /// Validates document invariants before persistence.
    ///
    /// # Errors
    /// - Returns `EmptyName` when `name` is empty.
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Validation failure for an expense document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
}

impl Display for ExpenseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "expense name cannot be empty"),
        }
    }
}

impl Error for ExpenseValidationError {}

/// One expense record as seen by the local mirror and the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub cost: i64,
}

impl Expense {
    pub fn new(id: ExpenseId, name: impl Into<String>, cost: i64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
        }
    }

    /// Joins a stored document with its identifier.
    pub fn from_document(id: ExpenseId, document: ExpenseDocument) -> Self {
        Self {
            id,
            name: document.name,
            cost: document.cost,
        }
    }
}

/// Generates a fresh store identifier.
pub(crate) fn new_expense_id() -> ExpenseId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::{Expense, ExpenseDocument, ExpenseValidationError};
    use uuid::Uuid;

    #[test]
    fn validate_rejects_empty_name() {
        let document = ExpenseDocument::new("", 10);
        assert_eq!(
            document.validate(),
            Err(ExpenseValidationError::EmptyName)
        );
    }

    #[test]
    fn validate_keeps_whitespace_only_name() {
        assert!(ExpenseDocument::new("   ", 10).validate().is_ok());
    }

    #[test]
    fn validate_accepts_zero_and_negative_cost() {
        assert!(ExpenseDocument::new("refund", -5).validate().is_ok());
        assert!(ExpenseDocument::new("free", 0).validate().is_ok());
    }

    #[test]
    fn from_document_joins_identifier() {
        let id = Uuid::from_u128(7);
        let expense = Expense::from_document(id, ExpenseDocument::new("food", 20));
        assert_eq!(expense.id, id);
        assert_eq!(expense.name, "food");
        assert_eq!(expense.cost, 20);
    }
}
