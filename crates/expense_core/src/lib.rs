//! Core logic for the expense tracker.
//!
//! A form writes expense documents to a store; the store's change feed is
//! reconciled into a local mirror, and every mirror snapshot re-renders an
//! animated pie chart whose slices delete their expense when clicked.

pub mod chart;
pub mod config;
pub mod db;
pub mod form;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod service;
pub mod store;

pub use chart::renderer::{
    ChartFrame, ChartRenderer, LegendEntry, RenderStats, SliceView, Tooltip,
};
pub use config::{ChartConfig, TrackerConfig};
pub use form::{EntryForm, SubmitOutcome};
pub use interaction::{InteractionLayer, InteractionOutcome, SliceEvent};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::expense::{Expense, ExpenseDocument, ExpenseId, ExpenseValidationError};
pub use reconcile::{LocalMirror, Reconciler, SnapshotSink};
pub use service::tracker::ExpenseTracker;
pub use store::sqlite_store::SqliteExpenseStore;
pub use store::{
    ChangeBatch, ChangeKind, DocumentChange, ExpenseStore, StoreError, StoreResult,
    Subscription, EXPENSES_COLLECTION,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
