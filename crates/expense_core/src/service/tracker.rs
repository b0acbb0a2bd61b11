//! Expense tracker use-case service.
//!
//! # Responsibility
//! - Own the store client, its subscription, the reconciler and the chart.
//! - Run queued change batches one at a time, in delivery order.
//!
//! # Invariants
//! - The local mirror changes only while pumping the subscription.
//! - Every form submit and slice click goes to the store, never to the mirror.

use crate::chart::renderer::{ChartFrame, ChartRenderer};
use crate::chart::svg::render_svg;
use crate::config::TrackerConfig;
use crate::form::{EntryForm, SubmitOutcome};
use crate::interaction::{InteractionLayer, InteractionOutcome, SliceEvent};
use crate::model::expense::Expense;
use crate::reconcile::Reconciler;
use crate::store::sqlite_store::SqliteExpenseStore;
use crate::store::{ExpenseStore, StoreResult, Subscription};
use log::info;

/// One live expense tracker session.
pub struct ExpenseTracker<S: ExpenseStore> {
    store: S,
    collection: String,
    subscription: Subscription,
    reconciler: Reconciler<ChartRenderer>,
    interaction: InteractionLayer,
    form: EntryForm,
}

impl ExpenseTracker<SqliteExpenseStore> {
    /// Opens the configured SQLite store (in memory when `db_path` is unset).
    pub fn open(config: &TrackerConfig) -> StoreResult<Self> {
        let store = match &config.db_path {
            Some(path) => SqliteExpenseStore::open(path)?,
            None => SqliteExpenseStore::open_in_memory()?,
        };
        Self::with_store(store, config)
    }
}

impl<S: ExpenseStore> ExpenseTracker<S> {
    /// Subscribes to the configured collection of `store`.
    ///
    /// The initial snapshot is queued, not applied; call `pump` to render it.
    pub fn with_store(mut store: S, config: &TrackerConfig) -> StoreResult<Self> {
        let subscription = store.subscribe(&config.collection)?;
        info!(
            "event=tracker_open module=service status=ok collection={}",
            config.collection
        );
        Ok(Self {
            store,
            collection: config.collection.clone(),
            subscription,
            reconciler: Reconciler::new(ChartRenderer::new(config.chart)),
            interaction: InteractionLayer::new(config.collection.clone()),
            form: EntryForm::new(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    /// Submits the current form input.
    pub fn submit_form(&mut self) -> SubmitOutcome {
        self.form.submit(&mut self.store, &self.collection)
    }

    /// Applies every queued change batch. Returns how many were applied.
    pub fn pump(&mut self, now_ms: u64) -> usize {
        let mut applied = 0;
        while let Some(batch) = self.subscription.try_next() {
            self.reconciler.apply_batch(&batch, now_ms);
            applied += 1;
        }
        applied
    }

    /// Advances slice animations. Returns whether anything still animates.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.reconciler.sink_mut().tick(now_ms)
    }

    pub fn handle_slice_event(&mut self, event: SliceEvent, now_ms: u64) -> InteractionOutcome {
        self.interaction.handle(
            event,
            self.reconciler.sink_mut(),
            &mut self.store,
            now_ms,
        )
    }

    /// Current local mirror snapshot.
    pub fn mirror(&self) -> &[Expense] {
        self.reconciler.snapshot()
    }

    pub fn renderer(&self) -> &ChartRenderer {
        self.reconciler.sink()
    }

    pub fn frame(&self, now_ms: u64) -> ChartFrame {
        self.renderer().frame(now_ms)
    }

    pub fn svg(&self, now_ms: u64) -> String {
        let renderer = self.renderer();
        render_svg(&renderer.frame(now_ms), renderer.config())
    }
}
