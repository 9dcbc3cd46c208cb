//! Tests for the contact registration service.

use std::time::Duration;

use super::*;
use crate::domain::ports::MockContactStore;
use crate::domain::{ErrorCode, Role, RowAddressing, RowSet, SheetLayout};
use crate::outbound::memory::InMemoryContactStore;
use crate::test_support::{fixture_clock, row};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> Arc<InMemoryContactStore> {
    Arc::new(InMemoryContactStore::new(fixture_clock()))
}

fn service_over(store: &Arc<InMemoryContactStore>) -> ContactService {
    ContactService::new(store.clone())
}

fn submission(name: &str, phone: &str) -> ContactSubmission {
    ContactSubmission {
        name: name.to_owned(),
        phone: phone.to_owned(),
        course: Some("Math".to_owned()),
        consultant_hint: Some("Carla".to_owned()),
    }
}

fn editor() -> Actor {
    Actor {
        username: "ana".to_owned(),
        display_name: "Ana Silva".to_owned(),
        role: Role::Editor,
    }
}

#[rstest]
#[tokio::test]
async fn add_then_check_reports_duplicate(store: Arc<InMemoryContactStore>) {
    let service = service_over(&store);

    service
        .add_contact(submission("Alice", "(11) 99999-0000"), None)
        .await
        .expect("first add succeeds");

    let check = service
        .check_duplicate("11999990000")
        .await
        .expect("check succeeds");
    let DuplicateCheck::Duplicate(existing) = check else {
        panic!("expected duplicate, got {check:?}");
    };
    assert_eq!(existing.name, "Alice");
    assert_eq!(existing.phone, "11999990000");
    assert_eq!(existing.date, "07/03/2025");
}

#[rstest]
#[tokio::test]
async fn differently_formatted_phone_is_rejected_without_write(
    store: Arc<InMemoryContactStore>,
) {
    let service = service_over(&store);
    service
        .add_contact(submission("Alice", "11999990000"), None)
        .await
        .expect("first add succeeds");
    let before = store.row_count().expect("count");

    let err = service
        .add_contact(submission("Alicia", "11 9.9999-0000"), None)
        .await
        .expect_err("duplicate rejected");

    let ContactError::Duplicate { existing } = err else {
        panic!("expected duplicate, got {err:?}");
    };
    assert_eq!(existing.name, "Alice");
    assert_eq!(store.row_count().expect("count"), before);
}

#[rstest]
#[case(submission("", "11999990000"), ContactValidationError::MissingName)]
#[case(submission("   ", "11999990000"), ContactValidationError::MissingName)]
#[case(submission("Alice", ""), ContactValidationError::MissingPhone)]
#[case(submission("Alice", "call me"), ContactValidationError::PhoneWithoutDigits)]
#[tokio::test]
async fn incomplete_submissions_fail_validation_without_store_calls(
    #[case] input: ContactSubmission,
    #[case] expected: ContactValidationError,
) {
    let mut mock = MockContactStore::new();
    mock.expect_find_by_phone().never();
    mock.expect_append().never();
    let service = ContactService::new(Arc::new(mock));

    let err = service
        .add_contact(input, None)
        .await
        .expect_err("validation fails");
    assert_eq!(err, ContactError::Validation(expected));
}

#[rstest]
#[case(None, "Carla", "public")]
#[case(Some(editor()), "Ana Silva", "ana")]
#[case(Some(Actor::public()), "Carla", "public")]
#[tokio::test]
async fn attribution_follows_caller(
    store: Arc<InMemoryContactStore>,
    #[case] caller: Option<Actor>,
    #[case] consultant: &str,
    #[case] username: &str,
) {
    let service = service_over(&store);
    service
        .add_contact(submission("Alice", "11999990000"), caller.as_ref())
        .await
        .expect("add succeeds");

    let records = service.list_all().await.expect("list succeeds");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].consultant, consultant);
    assert_eq!(records[0].username, username);
    assert_eq!(records[0].course, "Math");
    assert_eq!(records[0].password, "");
}

#[rstest]
#[tokio::test]
async fn list_skips_label_row_and_keeps_store_positions() {
    let store = Arc::new(InMemoryContactStore::with_rows(
        fixture_clock(),
        vec![
            SheetLayout::CURRENT.header_row(),
            row(&["Alice", "11999990000"]),
            row(&["Bob", "21988881111"]),
        ],
    ));
    let records = service_over(&store)
        .list_all()
        .await
        .expect("list succeeds");

    let summary: Vec<_> = records
        .iter()
        .map(|record| (record.name.as_str(), record.row_index))
        .collect();
    assert_eq!(summary, vec![("Alice", Some(2)), ("Bob", Some(3))]);
}

#[rstest]
#[tokio::test]
async fn check_rejects_phone_without_digits(store: Arc<InMemoryContactStore>) {
    let err = service_over(&store)
        .check_duplicate("()--")
        .await
        .expect_err("validation fails");
    assert_eq!(
        err,
        ContactError::Validation(ContactValidationError::PhoneWithoutDigits)
    );
}

#[rstest]
#[tokio::test]
async fn check_reports_free_phone(store: Arc<InMemoryContactStore>) {
    let check = service_over(&store)
        .check_duplicate("11999990000")
        .await
        .expect("check succeeds");
    assert_eq!(check, DuplicateCheck::NotDuplicate);
}

#[tokio::test]
async fn store_failures_surface_as_unavailable() {
    let mut mock = MockContactStore::new();
    mock.expect_find_by_phone()
        .times(1)
        .returning(|_| Err(ContactStoreError::unavailable("no credentials available")));
    mock.expect_append().never();
    let service = ContactService::new(Arc::new(mock));

    let err = service
        .add_contact(submission("Alice", "11999990000"), None)
        .await
        .expect_err("store failure propagates");
    assert_eq!(
        err,
        ContactError::StoreUnavailable {
            message: "no credentials available".to_owned()
        }
    );
}

#[tokio::test]
async fn store_level_uniqueness_rejection_reports_winner() {
    let winner = ContactRecord::from_cells(None, &row(&["Alice", "11999990000"]));
    let returned = winner.clone();
    let mut mock = MockContactStore::new();
    let mut lookups = 0_u32;
    mock.expect_find_by_phone().times(2).returning(move |_| {
        lookups += 1;
        Ok((lookups > 1).then(|| returned.clone()))
    });
    mock.expect_append()
        .times(1)
        .returning(|contact| Err(ContactStoreError::phone_taken(contact.phone)));
    let service = ContactService::new(Arc::new(mock));

    let err = service
        .add_contact(submission("Alicia", "11999990000"), None)
        .await
        .expect_err("store rejects");
    assert_eq!(
        err,
        ContactError::Duplicate {
            existing: Box::new(winner)
        }
    );
}

#[tokio::test]
async fn concurrent_adds_for_one_phone_admit_exactly_one() {
    let store = Arc::new(
        InMemoryContactStore::new(fixture_clock()).with_lookup_delay(Duration::from_millis(20)),
    );
    let service = Arc::new(service_over(&store));

    let attempts = ["(11) 99999-0000", "11999990000", "11 9.9999-0000", "+11999990000"]
        .into_iter()
        .map(|phone| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service.add_contact(submission("Alice", phone), None).await
            })
        })
        .collect::<Vec<_>>();

    let mut successes = 0;
    for attempt in attempts {
        match attempt.await.expect("task joins") {
            Ok(()) => successes += 1,
            Err(ContactError::Duplicate { .. }) => {}
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(store.row_count().expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn credential_rows_leave_contact_columns_empty(store: Arc<InMemoryContactStore>) {
    let service = service_over(&store);
    service
        .register_credentials("Dora", "dora", "s3cret")
        .await
        .expect("append succeeds");

    let rows = store.read_all().await.expect("rows");
    assert_eq!(
        rows,
        RowSet::new(
            vec![row(&["Dora", "", "", "", "07/03/2025", "dora", "s3cret"])],
            RowAddressing::SheetRows
        )
    );
}

#[rstest]
#[tokio::test]
async fn credential_rows_never_count_as_duplicates(store: Arc<InMemoryContactStore>) {
    let service = service_over(&store);
    service
        .register_credentials("Dora", "dora", "s3cret")
        .await
        .expect("append succeeds");
    service
        .add_contact(submission("Alice", "11999990000"), None)
        .await
        .expect("add succeeds");
    assert_eq!(store.row_count().expect("count"), 2);
}

#[rstest]
#[case(
    ContactError::Validation(ContactValidationError::MissingName),
    ErrorCode::InvalidRequest
)]
#[case(
    ContactError::Duplicate { existing: Box::new(ContactRecord::from_cells(Some(2), &row(&["Alice"]))) },
    ErrorCode::Conflict
)]
#[case(
    ContactError::StoreUnavailable { message: "down".to_owned() },
    ErrorCode::ServiceUnavailable
)]
fn contact_errors_map_to_domain_codes(#[case] error: ContactError, #[case] code: ErrorCode) {
    assert_eq!(Error::from(error).code(), code);
}

#[rstest]
fn duplicate_error_carries_existing_record() {
    let existing = ContactRecord::from_cells(Some(2), &row(&["Alice", "11999990000"]));
    let error = Error::from(ContactError::Duplicate {
        existing: Box::new(existing),
    });
    let details = error.details().expect("details present");
    assert_eq!(details["existing"]["name"], "Alice");
    assert_eq!(details["existing"]["rowIndex"], 2);
}
