//! Pointer events on rendered slices.
//!
//! # Responsibility
//! - Map hover events to highlight/tooltip effects.
//! - Forward clicks to the store as delete requests.
//!
//! # Invariants
//! - A click never edits the local mirror; the slice disappears only when
//!   the store's `removed` change comes back through the feed.

use crate::chart::renderer::ChartRenderer;
use crate::model::expense::ExpenseId;
use crate::store::ExpenseStore;
use log::warn;

/// Pointer event targeting one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceEvent {
    PointerOver(ExpenseId),
    PointerOut(ExpenseId),
    Click(ExpenseId),
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Highlighted,
    Restored,
    DeleteRequested(ExpenseId),
    /// The event targeted no live slice, or the delete request failed.
    Ignored,
}

/// Routes slice events to the renderer and the store.
#[derive(Debug, Clone)]
pub struct InteractionLayer {
    collection: String,
}

impl InteractionLayer {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    pub fn handle<S: ExpenseStore>(
        &self,
        event: SliceEvent,
        renderer: &mut ChartRenderer,
        store: &mut S,
        now_ms: u64,
    ) -> InteractionOutcome {
        match event {
            SliceEvent::PointerOver(id) => {
                if renderer.pointer_over(id, now_ms) {
                    InteractionOutcome::Highlighted
                } else {
                    InteractionOutcome::Ignored
                }
            }
            SliceEvent::PointerOut(id) => {
                if renderer.pointer_out(id, now_ms) {
                    InteractionOutcome::Restored
                } else {
                    InteractionOutcome::Ignored
                }
            }
            SliceEvent::Click(id) => {
                let Some(id) = renderer.click(id) else {
                    return InteractionOutcome::Ignored;
                };
                match store.delete(&self.collection, id) {
                    Ok(()) => InteractionOutcome::DeleteRequested(id),
                    Err(err) => {
                        // Store failures are not surfaced to the user.
                        warn!(
                            "event=slice_delete module=interaction status=error doc_id={id} error={err}"
                        );
                        InteractionOutcome::Ignored
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionLayer, InteractionOutcome, SliceEvent};
    use crate::chart::renderer::ChartRenderer;
    use crate::model::expense::ExpenseDocument;
    use crate::store::sqlite_store::SqliteExpenseStore;
    use crate::store::{ExpenseStore, EXPENSES_COLLECTION};

    #[test]
    fn click_deletes_in_store_without_touching_slices() {
        let mut store = SqliteExpenseStore::open_in_memory().unwrap();
        let id = store
            .add(EXPENSES_COLLECTION, &ExpenseDocument::new("food", 20))
            .unwrap();
        let records = store.list(EXPENSES_COLLECTION).unwrap();
        let mut renderer = ChartRenderer::default();
        renderer.render(&records, 0);

        let layer = InteractionLayer::new(EXPENSES_COLLECTION);
        let outcome = layer.handle(SliceEvent::Click(id), &mut renderer, &mut store, 10);

        assert_eq!(outcome, InteractionOutcome::DeleteRequested(id));
        assert!(store.list(EXPENSES_COLLECTION).unwrap().is_empty());
        assert_eq!(renderer.slice_ids(), vec![id]);
    }

    #[test]
    fn events_for_unknown_slices_are_ignored() {
        let mut store = SqliteExpenseStore::open_in_memory().unwrap();
        let mut renderer = ChartRenderer::default();
        let layer = InteractionLayer::new(EXPENSES_COLLECTION);
        let id = uuid::Uuid::from_u128(5);

        for event in [
            SliceEvent::PointerOver(id),
            SliceEvent::PointerOut(id),
            SliceEvent::Click(id),
        ] {
            assert_eq!(
                layer.handle(event, &mut renderer, &mut store, 0),
                InteractionOutcome::Ignored
            );
        }
    }
}
