//! SQLite-backed document store with an in-process change feed.
//!
//! # Responsibility
//! - Persist expense documents keyed by store-assigned identifiers.
//! - Fan out one change batch per successful write.
//!
//! # Invariants
//! - Write paths call `ExpenseDocument::validate()` before SQL mutations.
//! - Notifications are published only after the write is committed.
//! - Snapshot order is store application order (`seq`).

use crate::db::{open_db, open_db_in_memory};
use crate::model::expense::{new_expense_id, Expense, ExpenseDocument, ExpenseId};
use crate::store::feed::{ChangeBatch, DocumentChange, SubscriberSet, Subscription};
use crate::store::{normalize_collection, ExpenseStore, StoreError, StoreResult};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT doc_id, name, cost FROM documents";

/// Document store persisted in SQLite.
pub struct SqliteExpenseStore {
    conn: Connection,
    subscribers: SubscriberSet,
}

impl SqliteExpenseStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: SubscriberSet::default(),
        }
    }

    /// Opens (and migrates) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens an empty in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Returns the current documents of `collection` in store order.
    pub fn list(&self, collection: &str) -> StoreResult<Vec<Expense>> {
        let collection = normalize_collection(collection)?;
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE collection = ?1 ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([collection])?;
        let mut expenses = Vec::new();
        while let Some(row) = rows.next()? {
            expenses.push(parse_document_row(row)?);
        }
        Ok(expenses)
    }

    /// Returns one document by identifier.
    pub fn get(&self, collection: &str, id: ExpenseId) -> StoreResult<Option<Expense>> {
        let collection = normalize_collection(collection)?;
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE collection = ?1 AND doc_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![collection, id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_document_row(row)?)),
            None => Ok(None),
        }
    }

    /// Number of live subscriptions across all collections.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl ExpenseStore for SqliteExpenseStore {
    fn add(&mut self, collection: &str, document: &ExpenseDocument) -> StoreResult<ExpenseId> {
        let collection = normalize_collection(collection)?.to_string();
        document.validate()?;

        let id = new_expense_id();
        self.conn.execute(
            "INSERT INTO documents (collection, doc_id, name, cost) VALUES (?1, ?2, ?3, ?4);",
            params![
                collection.as_str(),
                id.to_string(),
                document.name.as_str(),
                document.cost
            ],
        )?;
        info!("event=doc_add module=store status=ok collection={collection} doc_id={id}");

        let expense = Expense::from_document(id, document.clone());
        self.subscribers
            .publish(&collection, &ChangeBatch::single(DocumentChange::added(expense)));
        Ok(id)
    }

    fn update(
        &mut self,
        collection: &str,
        id: ExpenseId,
        document: &ExpenseDocument,
    ) -> StoreResult<()> {
        let collection = normalize_collection(collection)?.to_string();
        document.validate()?;

        let changed = self.conn.execute(
            "UPDATE documents
             SET
                name = ?1,
                cost = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?3 AND doc_id = ?4;",
            params![
                document.name.as_str(),
                document.cost,
                collection.as_str(),
                id.to_string()
            ],
        )?;
        if changed == 0 {
            warn!("event=doc_update module=store status=error collection={collection} doc_id={id} error_code=not_found");
            return Err(StoreError::NotFound(id));
        }
        info!("event=doc_update module=store status=ok collection={collection} doc_id={id}");

        let expense = Expense::from_document(id, document.clone());
        self.subscribers.publish(
            &collection,
            &ChangeBatch::single(DocumentChange::modified(expense)),
        );
        Ok(())
    }

    fn delete(&mut self, collection: &str, id: ExpenseId) -> StoreResult<()> {
        let collection = normalize_collection(collection)?.to_string();

        let tx = self.conn.transaction()?;
        let existing = tx
            .query_row(
                "SELECT name, cost FROM documents WHERE collection = ?1 AND doc_id = ?2;",
                params![collection.as_str(), id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        let Some((name, cost)) = existing else {
            info!("event=doc_delete module=store status=noop collection={collection} doc_id={id}");
            return Ok(());
        };
        tx.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection.as_str(), id.to_string()],
        )?;
        tx.commit()?;
        info!("event=doc_delete module=store status=ok collection={collection} doc_id={id}");

        let expense = Expense::new(id, name, cost);
        self.subscribers.publish(
            &collection,
            &ChangeBatch::single(DocumentChange::removed(expense)),
        );
        Ok(())
    }

    fn subscribe(&mut self, collection: &str) -> StoreResult<Subscription> {
        let collection = normalize_collection(collection)?.to_string();
        let snapshot = self.list(&collection)?;
        let count = snapshot.len();
        let initial = ChangeBatch::new(snapshot.into_iter().map(DocumentChange::added).collect());
        let subscription = self.subscribers.open(&collection, initial);
        info!("event=feed_subscribe module=store status=ok collection={collection} initial_count={count}");
        Ok(subscription)
    }
}

fn parse_document_row(row: &Row<'_>) -> StoreResult<Expense> {
    let id_text: String = row.get("doc_id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in documents.doc_id"))
    })?;
    Ok(Expense {
        id,
        name: row.get("name")?,
        cost: row.get("cost")?,
    })
}
