//! Change feed types and subscriber fan-out.

use crate::model::expense::{Expense, ExpenseId};
use log::debug;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Kind of one document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// One document change with the full record payload.
///
/// `Removed` changes carry the last known payload of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub kind: ChangeKind,
    pub expense: Expense,
}

impl DocumentChange {
    pub fn added(expense: Expense) -> Self {
        Self {
            kind: ChangeKind::Added,
            expense,
        }
    }

    pub fn modified(expense: Expense) -> Self {
        Self {
            kind: ChangeKind::Modified,
            expense,
        }
    }

    pub fn removed(expense: Expense) -> Self {
        Self {
            kind: ChangeKind::Removed,
            expense,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.expense.id
    }
}

/// Changes delivered together, in the order the store applied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub changes: Vec<DocumentChange>,
}

impl ChangeBatch {
    pub fn new(changes: Vec<DocumentChange>) -> Self {
        Self { changes }
    }

    pub fn single(change: DocumentChange) -> Self {
        Self {
            changes: vec![change],
        }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Receiving end of a collection change feed.
///
/// Batches queue up until the owner drains them; each one is meant to be
/// processed to completion before the next.
#[derive(Debug)]
pub struct Subscription {
    collection: String,
    receiver: Receiver<ChangeBatch>,
}

impl Subscription {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Takes the next queued batch, if any.
    pub fn try_next(&self) -> Option<ChangeBatch> {
        match self.receiver.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Takes every queued batch in delivery order.
    pub fn drain(&self) -> Vec<ChangeBatch> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

/// Sender side of all live subscriptions held by a store.
#[derive(Debug, Default)]
pub(crate) struct SubscriberSet {
    subscribers: Vec<(String, Sender<ChangeBatch>)>,
}

impl SubscriberSet {
    /// Registers a subscriber and queues its initial batch.
    pub(crate) fn open(&mut self, collection: &str, initial: ChangeBatch) -> Subscription {
        let (sender, receiver) = channel();
        // A fresh channel cannot be disconnected yet.
        let _ = sender.send(initial);
        self.subscribers.push((collection.to_string(), sender));
        Subscription {
            collection: collection.to_string(),
            receiver,
        }
    }

    /// Queues `batch` for every live subscriber of `collection`.
    ///
    /// Subscribers whose receiver was dropped are pruned.
    pub(crate) fn publish(&mut self, collection: &str, batch: &ChangeBatch) {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscribed, sender)| {
            subscribed != collection || sender.send(batch.clone()).is_ok()
        });
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            debug!("event=feed_prune module=store status=ok collection={collection} pruned={pruned}");
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeBatch, DocumentChange, SubscriberSet};
    use crate::model::expense::Expense;
    use uuid::Uuid;

    fn change(n: u128) -> DocumentChange {
        DocumentChange::added(Expense::new(Uuid::from_u128(n), "food", 10))
    }

    #[test]
    fn initial_batch_is_delivered_first() {
        let mut set = SubscriberSet::default();
        let subscription = set.open("expenses", ChangeBatch::default());
        set.publish("expenses", &ChangeBatch::single(change(1)));

        let batches = subscription.drain();
        assert_eq!(batches.len(), 2);
        assert!(batches[0].is_empty());
        assert_eq!(batches[1].changes[0].id(), Uuid::from_u128(1));
    }

    #[test]
    fn publish_skips_other_collections_and_prunes_dropped_receivers() {
        let mut set = SubscriberSet::default();
        let kept = set.open("expenses", ChangeBatch::default());
        let other = set.open("budgets", ChangeBatch::default());
        let dropped = set.open("expenses", ChangeBatch::default());
        drop(dropped);

        set.publish("expenses", &ChangeBatch::single(change(2)));

        assert_eq!(set.len(), 2);
        assert_eq!(kept.drain().len(), 2);
        assert_eq!(other.drain().len(), 1);
    }
}
