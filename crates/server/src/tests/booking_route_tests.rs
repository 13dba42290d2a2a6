// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{ADMIN_TOKEN, ALICE_TOKEN, BOB_TOKEN, body_json, create_test_app, send};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_claim_then_conflict() {
    let test_app = create_test_app();
    let uri: String = format!("/bookings/{}/claim", test_app.bar_slots[1]);

    let first = send(&test_app.app, "POST", &uri, Some(ALICE_TOKEN), None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert_eq!(body["slot_start"], "2025-06-14T11:00:00Z");

    let second = send(&test_app.app, "POST", &uri, Some(BOB_TOKEN), None).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_concurrent_claims_book_slot_once() {
    let test_app = create_test_app();
    let uri: String = format!("/bookings/{}/claim", test_app.bar_slots[0]);

    let (first, second) = tokio::join!(
        send(&test_app.app, "POST", &uri, Some(ALICE_TOKEN), None),
        send(&test_app.app, "POST", &uri, Some(BOB_TOKEN), None),
    );

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let admin_board = send(
        &test_app.app,
        "GET",
        &format!("/events/{}/shifts/manage", test_app.event_id),
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    let body = body_json(admin_board).await;
    assert_eq!(body["columns"][0]["slots"][0]["taken"], true);
    assert!(body["columns"][0]["slots"][0]["occupant"].is_i64());
}

#[tokio::test]
async fn test_policy_violation_is_unprocessable() {
    let test_app = create_test_app();
    let details = send(
        &test_app.app,
        "PUT",
        &format!("/shifts/{}/details", test_app.bar),
        Some(ADMIN_TOKEN),
        Some(json!({ "channel": "#bar", "bookings_disabled": true })),
    )
    .await;
    assert_eq!(details.status(), StatusCode::OK);

    let response = send(
        &test_app.app,
        "POST",
        &format!("/bookings/{}/claim", test_app.bar_slots[0]),
        Some(ALICE_TOKEN),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "bookings_disabled");
    assert_eq!(
        body["message"],
        "Bookings are currently disabled for this shift"
    );
}

#[tokio::test]
async fn test_release_by_occupant() {
    let test_app = create_test_app();
    let slot = test_app.bar_slots[2];
    send(
        &test_app.app,
        "POST",
        &format!("/bookings/{slot}/claim"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;

    let by_bob = send(
        &test_app.app,
        "POST",
        &format!("/bookings/{slot}/release"),
        Some(BOB_TOKEN),
        None,
    )
    .await;
    assert_eq!(by_bob.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(by_bob).await["code"], "not_slot_occupant");

    let by_alice = send(
        &test_app.app,
        "POST",
        &format!("/bookings/{slot}/release"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(by_alice.status(), StatusCode::OK);
    assert!(body_json(by_alice).await["occupant"].is_null());
}

#[tokio::test]
async fn test_assign_and_list_my_bookings() {
    let test_app = create_test_app();
    let slot = test_app.bar_slots[0];

    let forbidden = send(
        &test_app.app,
        "POST",
        &format!("/bookings/{slot}/assign"),
        Some(ALICE_TOKEN),
        Some(json!({ "member_id": test_app.bob_id.value() })),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let assigned = send(
        &test_app.app,
        "POST",
        &format!("/bookings/{slot}/assign"),
        Some(ADMIN_TOKEN),
        Some(json!({ "member_id": test_app.bob_id.value() })),
    )
    .await;
    assert_eq!(assigned.status(), StatusCode::OK);

    let mine = send(&test_app.app, "GET", "/me/bookings", Some(BOB_TOKEN), None).await;
    assert_eq!(mine.status(), StatusCode::OK);
    let body = body_json(mine).await;
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["booking_id"], slot.value());
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let test_app = create_test_app();
    let response = send(
        &test_app.app,
        "POST",
        "/bookings/9999/claim",
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ticket_eligibility_follows_policy() {
    let test_app = create_test_app();
    let uri: String = format!("/events/{}/ticket-eligibility", test_app.event_id);

    let open = send(&test_app.app, "GET", &uri, Some(ALICE_TOKEN), None).await;
    assert_eq!(open.status(), StatusCode::OK);
    assert_eq!(body_json(open).await["eligible"], true);

    let policy = send(
        &test_app.app,
        "PUT",
        &format!("/events/{}/shift-group", test_app.event_id),
        Some(ADMIN_TOKEN),
        Some(json!({
            "enabled": true,
            "require_distinct_times": true,
            "required_for_ticket_reservation": true,
            "show_link_in_event": true,
        })),
    )
    .await;
    assert_eq!(policy.status(), StatusCode::OK);

    let required = send(&test_app.app, "GET", &uri, Some(ALICE_TOKEN), None).await;
    assert_eq!(required.status(), StatusCode::OK);
    let body = body_json(required).await;
    assert_eq!(body["eligible"], false);
    assert_eq!(body["reason"], "shift_booking_required_for_ticket");
}
