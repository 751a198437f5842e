use super::{
    reconcile, reconcile_with, Lookup, ReconcileAction, ReconcileError, ReconcileOptions,
    RecordStore, StoreOperation,
};
use crate::domain::{PhoneId, PhoneRecord};
use std::cell::RefCell;
use std::collections::BTreeSet;
use thiserror::Error;

const FIXTURE: &[&str] = &[
    "1234567890",
    "123 456 7891",
    "(123) 456 7892",
    "(123) 456-7893",
    "123-456-7894",
    "123-456-7890",
    "1234567892",
    "(123)456-7892",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("store offline")]
struct FakeError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Find(String),
    Update(PhoneId, String),
    Delete(PhoneId),
}

#[derive(Default)]
struct FakeStore {
    records: RefCell<Vec<PhoneRecord>>,
    calls: RefCell<Vec<Call>>,
    fail_on: Option<Call>,
}

impl FakeStore {
    fn with_values(values: &[&str]) -> Self {
        let records = values
            .iter()
            .enumerate()
            .map(|(idx, value)| PhoneRecord::new(PhoneId(idx as i64 + 1), *value))
            .collect();
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    fn values(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .map(|record| record.value.clone())
            .collect()
    }

    fn value_of(&self, id: PhoneId) -> Option<String> {
        self.records
            .borrow()
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.value.clone())
    }

    fn mutations_for(&self, id: PhoneId) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Update(target, _) | Call::Delete(target) if *target == id))
            .count()
    }

    fn mutation_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Update(..) | Call::Delete(_)))
            .count()
    }

    fn log(&self, call: Call) -> Result<(), FakeError> {
        let fail = self.fail_on.as_ref() == Some(&call);
        self.calls.borrow_mut().push(call);
        if fail {
            return Err(FakeError);
        }
        Ok(())
    }

    fn last_call(&self) -> Option<Call> {
        self.calls.borrow().last().cloned()
    }
}

impl RecordStore for FakeStore {
    type Error = FakeError;

    fn list_all(&self) -> Result<Vec<PhoneRecord>, FakeError> {
        self.log(Call::List)?;
        Ok(self.records.borrow().clone())
    }

    fn find_by_value(&self, value: &str) -> Result<Option<PhoneRecord>, FakeError> {
        self.log(Call::Find(value.to_string()))?;
        Ok(self
            .records
            .borrow()
            .iter()
            .find(|record| record.value == value)
            .cloned())
    }

    fn update_value(&self, id: PhoneId, value: &str) -> Result<(), FakeError> {
        self.log(Call::Update(id, value.to_string()))?;
        if let Some(record) = self
            .records
            .borrow_mut()
            .iter_mut()
            .find(|record| record.id == id)
        {
            record.value = value.to_string();
        }
        Ok(())
    }

    fn delete_by_id(&self, id: PhoneId) -> Result<(), FakeError> {
        self.log(Call::Delete(id))?;
        self.records.borrow_mut().retain(|record| record.id != id);
        Ok(())
    }
}

fn assert_unique(values: &[String]) {
    let unique: BTreeSet<&String> = values.iter().collect();
    assert_eq!(unique.len(), values.len(), "duplicate values: {values:?}");
}

#[test]
fn canonical_record_is_left_untouched() {
    let store = FakeStore::with_values(&["1234567890"]);
    let report = reconcile(&store).expect("reconcile");

    assert_eq!(report.unchanged, 1);
    assert!(report.changes.is_empty());
    assert_eq!(store.value_of(PhoneId(1)).as_deref(), Some("1234567890"));
    assert_eq!(store.mutations_for(PhoneId(1)), 0);
}

#[test]
fn formatted_record_is_updated_in_place() {
    let store = FakeStore::with_values(&["1234567890", "123 456 7891"]);
    let report = reconcile(&store).expect("reconcile");

    assert_eq!(report.updated, 1);
    assert_eq!(store.value_of(PhoneId(2)).as_deref(), Some("1234567891"));
    assert_eq!(report.changes[0].action, ReconcileAction::Updated);
    assert_eq!(report.changes[0].after.as_deref(), Some("1234567891"));
}

#[test]
fn duplicate_of_canonical_record_is_deleted() {
    let store = FakeStore::with_values(&["1234567890", "123-456-7890"]);
    let report = reconcile(&store).expect("reconcile");

    assert_eq!(report.deleted, 1);
    assert_eq!(store.values(), vec!["1234567890".to_string()]);
    let change = &report.changes[0];
    assert_eq!(change.id, PhoneId(2));
    assert_eq!(change.duplicate_of, Some(PhoneId(1)));
    assert_eq!(change.after, None);
}

#[test]
fn later_duplicate_sees_record_updated_earlier_in_pass() {
    let store = FakeStore::with_values(&["123-456-7890", "(123) 456 7890"]);
    let report = reconcile(&store).expect("reconcile");

    assert_eq!(report.updated, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(store.values(), vec!["1234567890".to_string()]);
}

#[test]
fn tie_keeps_exactly_one_record_in_either_order() {
    for values in [["555-0100", "555 0100"], ["555 0100", "555-0100"]] {
        let store = FakeStore::with_values(&values);
        reconcile(&store).expect("reconcile");
        assert_eq!(store.values(), vec!["5550100".to_string()]);
    }
}

#[test]
fn values_without_digits_collide_on_empty_string() {
    let store = FakeStore::with_values(&["n/a", "--", "555"]);
    let report = reconcile(&store).expect("reconcile");

    assert_eq!(report.updated, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.unchanged, 1);
    let mut values = store.values();
    values.sort();
    assert_eq!(values, vec!["".to_string(), "555".to_string()]);
}

#[test]
fn fixture_collapses_to_unique_canonical_values() {
    for lookup in [Lookup::Index, Lookup::Store] {
        let store = FakeStore::with_values(FIXTURE);
        let report = reconcile_with(
            &store,
            ReconcileOptions {
                lookup,
                dry_run: false,
            },
        )
        .expect("reconcile");

        assert_eq!(report.examined, 8);
        assert_eq!(report.unchanged, 2);
        assert_eq!(report.updated, 3);
        assert_eq!(report.deleted, 3);

        let values = store.values();
        assert_unique(&values);
        let survivors: BTreeSet<String> = values.into_iter().collect();
        let expected: BTreeSet<String> = [
            "1234567890",
            "1234567891",
            "1234567892",
            "1234567893",
            "1234567894",
        ]
        .iter()
        .map(|value| value.to_string())
        .collect();
        assert_eq!(survivors, expected, "lookup {lookup}");
    }
}

#[test]
fn index_lookup_issues_no_find_calls() {
    let store = FakeStore::with_values(FIXTURE);
    reconcile(&store).expect("reconcile");
    assert!(!store
        .calls
        .borrow()
        .iter()
        .any(|call| matches!(call, Call::Find(_))));
}

#[test]
fn store_lookup_queries_each_non_canonical_record() {
    let store = FakeStore::with_values(FIXTURE);
    reconcile_with(
        &store,
        ReconcileOptions {
            lookup: Lookup::Store,
            dry_run: false,
        },
    )
    .expect("reconcile");
    let finds = store
        .calls
        .borrow()
        .iter()
        .filter(|call| matches!(call, Call::Find(_)))
        .count();
    assert_eq!(finds, 6);
}

#[test]
fn dry_run_reports_without_mutating() {
    let store = FakeStore::with_values(FIXTURE);
    let report = reconcile_with(
        &store,
        ReconcileOptions {
            lookup: Lookup::Store,
            dry_run: true,
        },
    )
    .expect("reconcile");

    assert!(report.dry_run);
    assert_eq!(report.updated, 3);
    assert_eq!(report.deleted, 3);
    assert_eq!(store.mutation_count(), 0);
    assert_eq!(*store.calls.borrow(), vec![Call::List]);
    assert_eq!(store.values().len(), FIXTURE.len());
}

#[test]
fn failed_update_aborts_pass_without_further_calls() {
    let mut store = FakeStore::with_values(FIXTURE);
    store.fail_on = Some(Call::Update(PhoneId(4), "1234567893".to_string()));

    let err = reconcile(&store).expect_err("update should fail");
    assert_eq!(err.operation(), StoreOperation::Update);
    assert_eq!(err.record_id(), Some(PhoneId(4)));
    assert!(matches!(err, ReconcileError::Update { ref value, .. } if value == "1234567893"));
    assert_eq!(err.store_error(), &FakeError);
    assert_eq!(
        store.last_call(),
        Some(Call::Update(PhoneId(4), "1234567893".to_string()))
    );

    assert_eq!(store.value_of(PhoneId(2)).as_deref(), Some("1234567891"));
    assert_eq!(store.value_of(PhoneId(3)), None);
    assert_eq!(store.value_of(PhoneId(5)).as_deref(), Some("123-456-7894"));
}

#[test]
fn failed_delete_aborts_pass_without_further_calls() {
    let mut store = FakeStore::with_values(FIXTURE);
    store.fail_on = Some(Call::Delete(PhoneId(3)));

    let err = reconcile(&store).expect_err("delete should fail");
    assert_eq!(err.operation(), StoreOperation::Delete);
    assert_eq!(err.record_id(), Some(PhoneId(3)));
    assert_eq!(err.to_string(), "delete record 3: store offline");
    assert_eq!(store.last_call(), Some(Call::Delete(PhoneId(3))));

    assert_eq!(store.value_of(PhoneId(2)).as_deref(), Some("1234567891"));
    assert_eq!(store.value_of(PhoneId(3)).as_deref(), Some("(123) 456 7892"));
    assert_eq!(store.value_of(PhoneId(4)).as_deref(), Some("(123) 456-7893"));
}

#[test]
fn failed_find_aborts_pass_without_further_calls() {
    let mut store = FakeStore::with_values(FIXTURE);
    store.fail_on = Some(Call::Find("1234567892".to_string()));

    let err = reconcile_with(
        &store,
        ReconcileOptions {
            lookup: Lookup::Store,
            dry_run: false,
        },
    )
    .expect_err("find should fail");
    assert_eq!(err.operation(), StoreOperation::Find);
    assert_eq!(err.record_id(), Some(PhoneId(3)));
    assert_eq!(
        err.to_string(),
        "find duplicate of record 3 by value \"1234567892\": store offline"
    );
    assert_eq!(store.last_call(), Some(Call::Find("1234567892".to_string())));

    assert_eq!(store.value_of(PhoneId(2)).as_deref(), Some("1234567891"));
    assert_eq!(store.value_of(PhoneId(3)).as_deref(), Some("(123) 456 7892"));
}

#[test]
fn failed_list_issues_no_other_calls() {
    let mut store = FakeStore::with_values(FIXTURE);
    store.fail_on = Some(Call::List);

    let err = reconcile(&store).expect_err("list should fail");
    assert_eq!(err.operation(), StoreOperation::List);
    assert_eq!(err.record_id(), None);
    assert_eq!(err.to_string(), "list records: store offline");
    assert_eq!(*store.calls.borrow(), vec![Call::List]);
    assert_eq!(store.values().len(), FIXTURE.len());
}

#[test]
fn error_message_names_operation_and_record() {
    let mut store = FakeStore::with_values(&["555 0100"]);
    store.fail_on = Some(Call::Update(PhoneId(1), "5550100".to_string()));
    let err = reconcile(&store).expect_err("update should fail");
    assert_eq!(
        err.to_string(),
        "update record 1 to \"5550100\": store offline"
    );
    assert_eq!(err.into_source(), FakeError);
}

#[test]
fn already_canonical_duplicates_are_left_alone() {
    let store = FakeStore::with_values(&["555", "555", "55-5"]);
    let report = reconcile(&store).expect("reconcile");

    assert_eq!(report.unchanged, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.changes[0].id, PhoneId(3));
    assert_eq!(report.changes[0].duplicate_of, Some(PhoneId(1)));
    assert_eq!(store.values(), vec!["555".to_string(), "555".to_string()]);
    assert_eq!(store.mutations_for(PhoneId(1)), 0);
    assert_eq!(store.mutations_for(PhoneId(2)), 0);
}

#[test]
fn report_serializes_actions_in_lowercase() {
    let store = FakeStore::with_values(&["1234567890", "123-456-7890"]);
    let report = reconcile(&store).expect("reconcile");
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["changes"][0]["action"], "deleted");
    assert_eq!(json["changes"][0]["duplicate_of"], 1);
}
