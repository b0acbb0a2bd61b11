//! Change-feed reconciliation into the local mirror.
//!
//! # Responsibility
//! - Keep an ordered in-memory copy of one collection consistent with the
//!   store's change feed.
//! - Hand every post-batch snapshot to a renderer.
//!
//! # Invariants
//! - The mirror is mutated only through `LocalMirror::apply`.
//! - Identifiers are unique within the mirror.
//! - Lookups match on identifier equality; a change for an unknown
//!   identifier is a no-op.

pub mod mirror;

pub use mirror::{ApplyStats, LocalMirror};

use crate::model::expense::Expense;
use crate::store::ChangeBatch;
use log::debug;

/// Consumer of mirror snapshots.
pub trait SnapshotSink {
    /// Called once per applied batch with the full post-batch snapshot.
    fn render(&mut self, snapshot: &[Expense], now_ms: u64);
}

/// Owns the local mirror and forwards each new snapshot to a sink.
pub struct Reconciler<S: SnapshotSink> {
    mirror: LocalMirror,
    sink: S,
}

impl<S: SnapshotSink> Reconciler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            mirror: LocalMirror::new(),
            sink,
        }
    }

    /// Applies one batch to completion, then renders the new snapshot.
    pub fn apply_batch(&mut self, batch: &ChangeBatch, now_ms: u64) -> ApplyStats {
        let stats = self.mirror.apply(batch);
        debug!(
            "event=reconcile module=reconcile status=ok added={} modified={} removed={} ignored={} size={}",
            stats.added,
            stats.modified,
            stats.removed,
            stats.ignored,
            self.mirror.len()
        );
        self.sink.render(self.mirror.records(), now_ms);
        stats
    }

    pub fn snapshot(&self) -> &[Expense] {
        self.mirror.records()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::{Reconciler, SnapshotSink};
    use crate::model::expense::Expense;
    use crate::store::{ChangeBatch, DocumentChange};
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingSink {
        snapshots: Vec<(Vec<Expense>, u64)>,
    }

    impl SnapshotSink for RecordingSink {
        fn render(&mut self, snapshot: &[Expense], now_ms: u64) {
            self.snapshots.push((snapshot.to_vec(), now_ms));
        }
    }

    #[test]
    fn every_batch_renders_once_with_post_batch_snapshot() {
        let mut reconciler = Reconciler::new(RecordingSink::default());
        let food = Expense::new(Uuid::from_u128(1), "food", 20);
        let rent = Expense::new(Uuid::from_u128(2), "rent", 80);

        reconciler.apply_batch(
            &ChangeBatch::new(vec![
                DocumentChange::added(food.clone()),
                DocumentChange::added(rent.clone()),
            ]),
            5,
        );
        reconciler.apply_batch(&ChangeBatch::single(DocumentChange::removed(food)), 9);

        let snapshots = &reconciler.sink().snapshots;
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].0.len(), 2);
        assert_eq!(snapshots[0].1, 5);
        assert_eq!(snapshots[1].0, vec![rent]);
        assert_eq!(snapshots[1].1, 9);
    }

    #[test]
    fn empty_batch_still_renders() {
        let mut reconciler = Reconciler::new(RecordingSink::default());
        reconciler.apply_batch(&ChangeBatch::default(), 0);
        assert_eq!(reconciler.sink().snapshots.len(), 1);
        assert!(reconciler.snapshot().is_empty());
    }
}
