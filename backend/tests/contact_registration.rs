//! End-to-end contact registration through the HTTP surface.

// Each integration crate uses a different subset of the shared harness.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use contact_registry::domain::ports::ContactStore;
use rstest::rstest;
use serde_json::{Value, json};
use support::{TestApp, login, send};

fn add(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/contacts/add")
        .set_json(body)
}

fn check(phone: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::get().uri(&format!("/api/contacts/check?phone={phone}"))
}

#[actix_rt::test]
async fn editor_registers_then_admin_lists() {
    let app = TestApp::new();
    let service = app.service().await;
    let ana = login(&service, "ana", "ana123").await;
    let admin = login(&service, "admin", "admin123").await;

    let reply = send(
        &service,
        add(json!({"name": "Alice", "phone": "(11) 99999-0000", "course": "Design"})),
        Some(&ana),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"ok": true}));

    let reply = send(
        &service,
        actix_test::TestRequest::get().uri("/api/contacts/list"),
        Some(&admin),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let items = reply.body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["phone"], "11999990000");
    assert_eq!(items[0]["consultant"], "Ana Silva");
    assert_eq!(items[0]["username"], "ana");
    assert_eq!(items[0]["course"], "Design");
}

#[actix_rt::test]
async fn duplicates_are_reported_with_the_original_and_a_trace_id() {
    let app = TestApp::new();
    let service = app.service().await;
    let ana = login(&service, "ana", "ana123").await;
    let first = send(
        &service,
        add(json!({"name": "Alice", "phone": "11 99999 0000"})),
        Some(&ana),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);

    let reply = send(
        &service,
        add(json!({"name": "Someone Else", "phone": "11 9.9999-0000"})),
        Some(&ana),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["details"]["existing"]["name"], "Alice");
    let header = reply.trace_id.expect("trace id header");
    assert_eq!(reply.body["traceId"], header.as_str());
    assert_eq!(app.store.row_count().expect("rows"), 1);
}

#[actix_rt::test]
async fn a_country_code_prefix_is_a_different_phone() {
    let app = TestApp::new();
    let service = app.service().await;
    let ana = login(&service, "ana", "ana123").await;
    for phone in ["11999990000", "+55 11 99999-0000"] {
        let reply = send(
            &service,
            add(json!({"name": "Alice", "phone": phone})),
            Some(&ana),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK, "{phone}");
    }
    let phones: Vec<String> = app
        .store
        .read_all()
        .await
        .expect("rows")
        .records()
        .into_iter()
        .map(|record| record.phone)
        .collect();
    assert_eq!(phones, ["11999990000", "5511999990000"]);
}

#[actix_rt::test]
async fn check_reflects_registrations() {
    let app = TestApp::new();
    let service = app.service().await;
    let carlos = login(&service, "carlos", "carlos123").await;

    let before = send(&service, check("11999990000"), Some(&carlos)).await;
    assert_eq!(before.body, json!({"duplicate": false}));

    send(
        &service,
        add(json!({"name": "Alice", "phone": "11999990000"})),
        Some(&carlos),
    )
    .await;

    let after = send(&service, check("(11)%2099999-0000"), Some(&carlos)).await;
    assert_eq!(after.status, StatusCode::OK);
    assert_eq!(after.body["duplicate"], true);
    assert_eq!(after.body["existing"]["username"], "carlos");
}

#[actix_rt::test]
async fn concurrent_submissions_of_one_phone_store_a_single_row() {
    let app = TestApp::new();
    let service = app.service().await;
    let ana = login(&service, "ana", "ana123").await;

    let attempts = (0..8).map(|n| {
        send(
            &service,
            add(json!({"name": format!("Caller {n}"), "phone": "21988887777"})),
            Some(&ana),
        )
    });
    let replies = futures::future::join_all(attempts).await;

    let stored = replies
        .iter()
        .filter(|reply| reply.status == StatusCode::OK)
        .count();
    let conflicts = replies
        .iter()
        .filter(|reply| reply.status == StatusCode::CONFLICT)
        .count();
    assert_eq!((stored, conflicts), (1, 7));
    let rows = app.store.read_all().await.expect("rows");
    assert_eq!(rows.records().len(), 1);
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some("not-a-jwt"), StatusCode::UNAUTHORIZED)]
#[actix_rt::test]
async fn contacts_need_a_token_by_default(
    #[case] token: Option<&str>,
    #[case] expected: StatusCode,
) {
    let app = TestApp::new();
    let service = app.service().await;
    let reply = send(&service, add(json!({"name": "A", "phone": "1"})), token).await;
    assert_eq!(reply.status, expected);
    assert_eq!(app.store.row_count().expect("rows"), 0);
}

#[actix_rt::test]
async fn public_mode_accepts_anonymous_submissions() {
    let app = TestApp::with_env(&[("ALLOW_PUBLIC_CONTACTS", "true")]);
    let service = app.service().await;

    let reply = send(
        &service,
        add(json!({"name": "Alice", "phone": "11999990000", "consultant": "Bruna"})),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let records = app.store.read_all().await.expect("rows").records();
    assert_eq!(records[0].consultant, "Bruna");
    assert_eq!(records[0].username, "public");

    let listing = send(
        &service,
        actix_test::TestRequest::get().uri("/api/contacts/list"),
        None,
    )
    .await;
    assert_eq!(listing.status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn viewers_cannot_list() {
    let app = TestApp::new();
    let service = app.service().await;
    let carlos = login(&service, "carlos", "carlos123").await;
    let reply = send(
        &service,
        actix_test::TestRequest::get().uri("/api/contacts/list"),
        Some(&carlos),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn probes_answer_without_a_token() {
    let app = TestApp::new();
    let service = app.service().await;
    for uri in ["/health/ready", "/health/live"] {
        let reply = send(&service, actix_test::TestRequest::get().uri(uri), None).await;
        assert_eq!(reply.status, StatusCode::OK, "{uri}");
        assert_eq!(reply.body["status"], "ok");
    }
}
