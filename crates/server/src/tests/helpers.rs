// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use axum::{
    Router,
    body::Body,
    http::{Request, header::AUTHORIZATION},
    response::Response,
};
use nakki::Actor;
use nakki_api::{CreateShiftInstanceRequest, create_shift_instance};
use nakki_domain::{
    BilingualText, EventId, EventSchedule, FixedClock, LocalTimeFormatter, Locale, MemberId,
    ShiftBookingId, ShiftDefinitionId, ShiftGroupPolicy, ShiftInstanceId, SignupWindow,
};
use nakki_persistence::Persistence;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const ADMIN_TOKEN: &str = "admin-session";
pub const ALICE_TOKEN: &str = "alice-session";
pub const BOB_TOKEN: &str = "bob-session";
pub const EXPIRED_TOKEN: &str = "expired-session";

pub fn now() -> OffsetDateTime {
    datetime!(2025-06-01 12:00 UTC)
}

/// A published event with an enabled shift group and a three-slot bar
/// shift from 10:00 to 13:00 UTC.
pub struct TestApp {
    pub app: Router,
    pub event_id: EventId,
    pub definition_id: ShiftDefinitionId,
    pub bar: ShiftInstanceId,
    pub bar_slots: Vec<ShiftBookingId>,
    pub bob_id: MemberId,
}

fn create_member_with_session(
    persistence: &mut Persistence,
    name: &str,
    is_admin: bool,
    token: &str,
) -> MemberId {
    let member_id: MemberId = persistence.create_member(name, is_admin, true).unwrap();
    persistence
        .create_session(member_id, token, datetime!(2025-07-01 00:00 UTC))
        .unwrap();
    member_id
}

fn create_test_schedule() -> EventSchedule {
    EventSchedule {
        id: EventId::new(0),
        publish_date: Some(datetime!(2025-05-01 09:00 UTC)),
        event_date: datetime!(2025-06-14 15:00 UTC),
        until: None,
        cancelled: false,
        published_flag: true,
        signup: SignupWindow {
            enabled: true,
            start: Some(datetime!(2025-05-15 09:00 UTC)),
            end: Some(datetime!(2025-06-10 21:00 UTC)),
        },
    }
}

pub fn create_bar_request(definition_id: ShiftDefinitionId) -> CreateShiftInstanceRequest {
    CreateShiftInstanceRequest {
        definition_id: definition_id.value(),
        start: String::from("2025-06-14T10:00:00Z"),
        end: String::from("2025-06-14T13:00:00Z"),
        interval_minutes: 60,
        responsible_member_id: None,
        channel: Some(String::from("#bar")),
    }
}

pub fn create_test_app() -> TestApp {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");

    let admin_id = create_member_with_session(&mut persistence, "Admin", true, ADMIN_TOKEN);
    create_member_with_session(&mut persistence, "Alice", false, ALICE_TOKEN);
    let bob_id = create_member_with_session(&mut persistence, "Bob", false, BOB_TOKEN);
    persistence
        .create_session(bob_id, EXPIRED_TOKEN, datetime!(2025-05-31 00:00 UTC))
        .unwrap();

    let event_id: EventId = persistence
        .create_event("Kesäjuhlat", &create_test_schedule())
        .unwrap();
    persistence
        .create_shift_group(
            event_id,
            &ShiftGroupPolicy {
                enabled: true,
                ..ShiftGroupPolicy::default()
            },
        )
        .unwrap();
    let definition_id: ShiftDefinitionId = persistence
        .create_shift_definition(
            &BilingualText::new("Baari", "Bar"),
            &BilingualText::new("Juomien myynti", "Selling drinks"),
            false,
        )
        .unwrap();

    let admin: Actor = Actor::Member(persistence.get_member(admin_id).unwrap().unwrap());
    let bar: ShiftInstanceId = create_shift_instance(
        &mut persistence,
        &admin,
        event_id,
        create_bar_request(definition_id),
        now(),
    )
    .unwrap()
    .instance_id
    .unwrap();

    let state = persistence.load_group_state(event_id).unwrap();
    let bar_slots: Vec<ShiftBookingId> = state
        .bookings_for_instance(bar)
        .into_iter()
        .map(|booking| booking.id)
        .collect();

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Arc::new(FixedClock::new(now())),
        formatter: LocalTimeFormatter::new("Europe/Helsinki").unwrap(),
        login_url: String::from("/login"),
        default_locale: Locale::Fi,
    };

    TestApp {
        app: build_router(app_state),
        event_id,
        definition_id,
        bar,
        bar_slots,
        bob_id,
    }
}

/// Sends one request through the router.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Reads a JSON response body.
pub async fn body_json(response: Response) -> serde_json::Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}
