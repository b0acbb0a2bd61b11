use expense_core::form::{INVALID_COST_MESSAGE, MISSING_VALUES_MESSAGE};
use expense_core::{
    EntryForm, ExpenseDocument, ExpenseId, ExpenseStore, SqliteExpenseStore, StoreError,
    StoreResult, SubmitOutcome, Subscription, EXPENSES_COLLECTION,
};

/// Store whose writes always fail, standing in for a network/permission error.
struct UnreachableStore;

impl ExpenseStore for UnreachableStore {
    fn add(&mut self, _collection: &str, _document: &ExpenseDocument) -> StoreResult<ExpenseId> {
        Err(StoreError::InvalidData("store unreachable".to_string()))
    }

    fn update(
        &mut self,
        _collection: &str,
        id: ExpenseId,
        _document: &ExpenseDocument,
    ) -> StoreResult<()> {
        Err(StoreError::NotFound(id))
    }

    fn delete(&mut self, _collection: &str, _id: ExpenseId) -> StoreResult<()> {
        Err(StoreError::InvalidData("store unreachable".to_string()))
    }

    fn subscribe(&mut self, collection: &str) -> StoreResult<Subscription> {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}

fn filled(name: &str, cost: &str) -> EntryForm {
    let mut form = EntryForm::new();
    form.set_name(name);
    form.set_cost(cost);
    form
}

#[test]
fn valid_submission_creates_document_and_clears_fields() {
    let mut store = SqliteExpenseStore::open_in_memory().unwrap();
    let mut form = filled("food", "20");
    form.error = MISSING_VALUES_MESSAGE.to_string();

    let outcome = form.submit(&mut store, EXPENSES_COLLECTION);

    let SubmitOutcome::Created(id) = outcome else {
        panic!("expected created outcome, got {outcome:?}");
    };
    assert_eq!(form, EntryForm::default());
    let stored = store.get(EXPENSES_COLLECTION, id).unwrap().unwrap();
    assert_eq!(stored.name, "food");
    assert_eq!(stored.cost, 20);
}

#[test]
fn missing_name_or_cost_is_rejected_without_write() {
    let mut store = SqliteExpenseStore::open_in_memory().unwrap();
    for (name, cost) in [("", "20"), ("food", ""), ("", "")] {
        let mut form = filled(name, cost);
        assert_eq!(
            form.submit(&mut store, EXPENSES_COLLECTION),
            SubmitOutcome::Rejected
        );
        assert_eq!(form.error, MISSING_VALUES_MESSAGE);
        assert_eq!(form.name, name);
    }
    assert!(store.list(EXPENSES_COLLECTION).unwrap().is_empty());
}

#[test]
fn non_numeric_cost_is_rejected_and_decimal_cost_is_truncated() {
    let mut store = SqliteExpenseStore::open_in_memory().unwrap();

    let mut form = filled("food", "lots");
    assert_eq!(
        form.submit(&mut store, EXPENSES_COLLECTION),
        SubmitOutcome::Rejected
    );
    assert_eq!(form.error, INVALID_COST_MESSAGE);

    let mut form = filled("food", "12.75");
    assert!(matches!(
        form.submit(&mut store, EXPENSES_COLLECTION),
        SubmitOutcome::Created(_)
    ));
    assert_eq!(store.list(EXPENSES_COLLECTION).unwrap()[0].cost, 12);
}

#[test]
fn duplicate_rapid_submissions_are_not_suppressed() {
    let mut store = SqliteExpenseStore::open_in_memory().unwrap();
    for _ in 0..2 {
        let mut form = filled("coffee", "3");
        form.submit(&mut store, EXPENSES_COLLECTION);
    }
    assert_eq!(store.list(EXPENSES_COLLECTION).unwrap().len(), 2);
}

#[test]
fn store_failure_keeps_input_and_shows_nothing() {
    let mut form = filled("food", "20");
    let outcome = form.submit(&mut UnreachableStore, EXPENSES_COLLECTION);

    assert_eq!(outcome, SubmitOutcome::StoreFailed);
    assert_eq!(form.name, "food");
    assert_eq!(form.cost, "20");
    assert!(form.error.is_empty());
}

#[test]
fn whitespace_only_name_is_stored_as_entered() {
    let mut store = SqliteExpenseStore::open_in_memory().unwrap();
    let mut form = filled("   ", "20");

    let outcome = form.submit(&mut store, EXPENSES_COLLECTION);

    let SubmitOutcome::Created(id) = outcome else {
        panic!("expected created outcome, got {outcome:?}");
    };
    assert_eq!(form, EntryForm::default());
    let stored = store.get(EXPENSES_COLLECTION, id).unwrap().unwrap();
    assert_eq!(stored.name, "   ");
    assert_eq!(stored.cost, 20);
}
