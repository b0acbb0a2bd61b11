//! Ordered in-memory mirror of one collection.

use crate::model::expense::{Expense, ExpenseId};
use crate::store::{ChangeBatch, ChangeKind, DocumentChange};
use log::warn;

/// Counts of what one batch did to the mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    /// Changes that referenced an identifier the mirror does not hold.
    pub ignored: usize,
}

/// Insertion-ordered list of expenses kept in sync with a change feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalMirror {
    records: Vec<Expense>,
}

impl LocalMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Applies every change of `batch` in order and returns the new snapshot
    /// statistics.
    pub fn apply(&mut self, batch: &ChangeBatch) -> ApplyStats {
        let mut stats = ApplyStats::default();
        for change in &batch.changes {
            self.apply_change(change, &mut stats);
        }
        stats
    }

    fn apply_change(&mut self, change: &DocumentChange, stats: &mut ApplyStats) {
        let id = change.id();
        match change.kind {
            ChangeKind::Added => match self.position(id) {
                // Re-delivery of a known document keeps its slot.
                Some(index) => {
                    self.records[index] = change.expense.clone();
                    stats.modified += 1;
                }
                None => {
                    self.records.push(change.expense.clone());
                    stats.added += 1;
                }
            },
            ChangeKind::Modified => match self.position(id) {
                Some(index) => {
                    self.records[index] = change.expense.clone();
                    stats.modified += 1;
                }
                None => self.ignore(change, stats),
            },
            ChangeKind::Removed => match self.position(id) {
                Some(index) => {
                    self.records.remove(index);
                    stats.removed += 1;
                }
                None => self.ignore(change, stats),
            },
        }
    }

    fn position(&self, id: ExpenseId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn ignore(&self, change: &DocumentChange, stats: &mut ApplyStats) {
        warn!(
            "event=reconcile_skip module=reconcile status=noop kind={} doc_id={}",
            change.kind.as_str(),
            change.id()
        );
        stats.ignored += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::LocalMirror;
    use crate::model::expense::Expense;
    use crate::store::{ChangeBatch, DocumentChange};
    use uuid::Uuid;

    fn expense(n: u128, name: &str, cost: i64) -> Expense {
        Expense::new(Uuid::from_u128(n), name, cost)
    }

    fn mirror_of(records: &[Expense]) -> LocalMirror {
        let mut mirror = LocalMirror::new();
        mirror.apply(&ChangeBatch::new(
            records.iter().cloned().map(DocumentChange::added).collect(),
        ));
        mirror
    }

    #[test]
    fn added_appends_in_delivery_order() {
        let mirror = mirror_of(&[expense(1, "food", 20), expense(2, "rent", 80)]);
        assert_eq!(
            mirror.records(),
            &[expense(1, "food", 20), expense(2, "rent", 80)]
        );
    }

    #[test]
    fn repeated_added_keeps_identifiers_unique() {
        let mut mirror = mirror_of(&[expense(1, "food", 20)]);
        let stats = mirror.apply(&ChangeBatch::single(DocumentChange::added(expense(
            1, "food", 25,
        ))));
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror.records()[0].cost, 25);
        assert_eq!(stats.added, 0);
        assert_eq!(stats.modified, 1);
    }

    #[test]
    fn modified_replaces_only_the_matching_record_in_place() {
        let mut mirror = mirror_of(&[
            expense(1, "food", 20),
            expense(2, "rent", 80),
            expense(3, "fuel", 15),
        ]);
        mirror.apply(&ChangeBatch::single(DocumentChange::modified(expense(
            2, "rent", 40,
        ))));
        assert_eq!(
            mirror.records(),
            &[
                expense(1, "food", 20),
                expense(2, "rent", 40),
                expense(3, "fuel", 15)
            ]
        );
    }

    #[test]
    fn modified_for_first_record_does_not_touch_the_others() {
        let mut mirror = mirror_of(&[expense(1, "food", 20), expense(2, "rent", 80)]);
        mirror.apply(&ChangeBatch::single(DocumentChange::modified(expense(
            1, "groceries", 30,
        ))));
        assert_eq!(
            mirror.records(),
            &[expense(1, "groceries", 30), expense(2, "rent", 80)]
        );
    }

    #[test]
    fn removed_drops_exactly_one_and_keeps_remaining_order() {
        let mut mirror = mirror_of(&[
            expense(1, "food", 20),
            expense(2, "rent", 40),
            expense(3, "fuel", 15),
        ]);
        let stats = mirror.apply(&ChangeBatch::single(DocumentChange::removed(expense(
            2, "rent", 40,
        ))));
        assert_eq!(stats.removed, 1);
        assert_eq!(
            mirror.records(),
            &[expense(1, "food", 20), expense(3, "fuel", 15)]
        );
    }

    #[test]
    fn unknown_identifiers_are_ignored() {
        let mut mirror = mirror_of(&[expense(1, "food", 20)]);
        let stats = mirror.apply(&ChangeBatch::new(vec![
            DocumentChange::modified(expense(9, "ghost", 1)),
            DocumentChange::removed(expense(8, "ghost", 1)),
        ]));
        assert_eq!(stats.ignored, 2);
        assert_eq!(mirror.records(), &[expense(1, "food", 20)]);
    }

    #[test]
    fn changes_inside_a_batch_apply_in_order() {
        let mut mirror = LocalMirror::new();
        mirror.apply(&ChangeBatch::new(vec![
            DocumentChange::added(expense(1, "food", 20)),
            DocumentChange::modified(expense(1, "food", 35)),
            DocumentChange::added(expense(2, "rent", 80)),
            DocumentChange::removed(expense(1, "food", 35)),
        ]));
        assert_eq!(mirror.records(), &[expense(2, "rent", 80)]);
    }
}
