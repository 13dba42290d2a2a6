// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    ADMIN_TOKEN, ALICE_TOKEN, body_json, create_bar_request, create_test_app, send,
};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_shift_instance() {
    let test_app = create_test_app();
    let uri: String = format!("/events/{}/shifts", test_app.event_id);
    let mut request = create_bar_request(test_app.definition_id);
    request.start = String::from("2025-06-14T18:00:00+03:00");
    request.end = String::from("2025-06-14T20:00:00+03:00");
    let body = serde_json::to_value(&request).unwrap();

    let as_member = send(&test_app.app, "POST", &uri, Some(ALICE_TOKEN), Some(body.clone())).await;
    assert_eq!(as_member.status(), StatusCode::FORBIDDEN);

    let as_admin = send(&test_app.app, "POST", &uri, Some(ADMIN_TOKEN), Some(body)).await;
    assert_eq!(as_admin.status(), StatusCode::OK);
    let created = body_json(as_admin).await;
    assert!(created["instance_id"].is_i64());
    assert!(created["warnings"].as_array().unwrap().is_empty());

    let board = send(&test_app.app, "GET", &uri, Some(ALICE_TOKEN), None).await;
    let columns = body_json(board).await["columns"].clone();
    assert_eq!(columns.as_array().unwrap().len(), 2);
    assert_eq!(columns[1]["slots"][0]["label"], "18:00-19:00");
}

#[tokio::test]
async fn test_create_with_reversed_window_is_bad_request() {
    let test_app = create_test_app();
    let mut request = create_bar_request(test_app.definition_id);
    request.end = String::from("2025-06-14T09:00:00Z");

    let response = send(
        &test_app.app,
        "POST",
        &format!("/events/{}/shifts", test_app.event_id),
        Some(ADMIN_TOKEN),
        Some(serde_json::to_value(&request).unwrap()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reschedule_reports_retained_slots() {
    let test_app = create_test_app();
    let occupied = test_app.bar_slots[2];
    send(
        &test_app.app,
        "POST",
        &format!("/bookings/{occupied}/claim"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;

    let response = send(
        &test_app.app,
        "PUT",
        &format!("/shifts/{}/times", test_app.bar),
        Some(ADMIN_TOKEN),
        Some(json!({
            "start": "2025-06-14T10:00:00Z",
            "end": "2025-06-14T12:00:00Z",
            "interval_minutes": 60,
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["booking_id"], occupied.value());
}

#[tokio::test]
async fn test_trim_occupied_tail_is_conflict() {
    let test_app = create_test_app();
    let trim_uri: String = format!("/shifts/{}/trim", test_app.bar);
    send(
        &test_app.app,
        "POST",
        &format!("/bookings/{}/claim", test_app.bar_slots[2]),
        Some(ALICE_TOKEN),
        None,
    )
    .await;

    let response = send(
        &test_app.app,
        "POST",
        &trim_uri,
        Some(ADMIN_TOKEN),
        Some(json!({ "count": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let zero = send(
        &test_app.app,
        "POST",
        &trim_uri,
        Some(ADMIN_TOKEN),
        Some(json!({ "count": 0 })),
    )
    .await;
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_shift_instance() {
    let test_app = create_test_app();
    let uri: String = format!("/shifts/{}", test_app.bar);

    let response = send(&test_app.app, "DELETE", &uri, Some(ADMIN_TOKEN), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let again = send(&test_app.app, "DELETE", &uri, Some(ADMIN_TOKEN), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responsible_admin_routes() {
    let test_app = create_test_app();
    let board_uri: String = format!("/events/{}/shifts/manage", test_app.event_id);
    let alice_board = send(&test_app.app, "GET", &board_uri, Some(ALICE_TOKEN), None).await;
    assert_eq!(alice_board.status(), StatusCode::FORBIDDEN);

    let me = send(&test_app.app, "GET", "/me/bookings", Some(ALICE_TOKEN), None).await;
    let alice_id = body_json(me).await["member_id"].as_i64().unwrap();
    let admins_uri: String = format!(
        "/events/{}/shift-group/admins/{alice_id}",
        test_app.event_id
    );

    let granted = send(&test_app.app, "PUT", &admins_uri, Some(ADMIN_TOKEN), None).await;
    assert_eq!(granted.status(), StatusCode::OK);
    let alice_board = send(&test_app.app, "GET", &board_uri, Some(ALICE_TOKEN), None).await;
    assert_eq!(alice_board.status(), StatusCode::OK);
    assert_eq!(body_json(alice_board).await["can_manage"], true);

    let revoked = send(&test_app.app, "DELETE", &admins_uri, Some(ADMIN_TOKEN), None).await;
    assert_eq!(revoked.status(), StatusCode::OK);
    let alice_board = send(&test_app.app, "GET", &board_uri, Some(ALICE_TOKEN), None).await;
    assert_eq!(alice_board.status(), StatusCode::FORBIDDEN);
}
