//! Document store client contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist expense documents per collection.
//! - Publish an ordered change feed to subscribers.
//!
//! # Invariants
//! - A subscription first receives one batch describing the whole collection,
//!   then one batch per successful write, in the order writes are applied.
//! - Writes never mutate any subscriber's local state directly; changes only
//!   reach consumers through the feed.

pub mod feed;
pub mod sqlite_store;

use crate::db::DbError;
use crate::model::expense::{ExpenseDocument, ExpenseId, ExpenseValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use feed::{ChangeBatch, ChangeKind, DocumentChange, Subscription};

/// Default collection holding expense documents.
pub const EXPENSES_COLLECTION: &str = "expenses";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    Validation(ExpenseValidationError),
    Db(DbError),
    NotFound(ExpenseId),
    InvalidCollection(String),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidCollection(name) => write!(f, "invalid collection name `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidCollection(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ExpenseValidationError> for StoreError {
    fn from(value: ExpenseValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Client contract for the document store.
///
/// Writes complete before returning; their effects are observed by
/// subscribers through queued change batches, never synchronously.
pub trait ExpenseStore {
    /// Creates a document and returns its store-assigned identifier.
    fn add(&mut self, collection: &str, document: &ExpenseDocument) -> StoreResult<ExpenseId>;

    /// Replaces the payload of an existing document.
    ///
    /// # Errors
    /// - `NotFound` when no document with `id` exists in `collection`.
    fn update(
        &mut self,
        collection: &str,
        id: ExpenseId,
        document: &ExpenseDocument,
    ) -> StoreResult<()>;

    /// Removes a document. Removing a missing document is a silent no-op.
    fn delete(&mut self, collection: &str, id: ExpenseId) -> StoreResult<()>;

    /// Opens a change feed over `collection`.
    fn subscribe(&mut self, collection: &str) -> StoreResult<Subscription>;
}

pub(crate) fn normalize_collection(collection: &str) -> StoreResult<&str> {
    let trimmed = collection.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if !valid {
        return Err(StoreError::InvalidCollection(collection.to_string()));
    }
    Ok(trimmed)
}
