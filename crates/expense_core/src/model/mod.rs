//! Expense domain model.
//!
//! # Responsibility
//! - Define the record shape shared by the store, the mirror and the chart.
//!
//! # Invariants
//! - Every expense is identified by a store-assigned `ExpenseId`.
//! - Identity is never derived from `name` or `cost`.

pub mod expense;
