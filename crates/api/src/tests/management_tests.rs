// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_bar_request, create_test_fixture, create_test_formatter, create_test_schedule, now,
};
use crate::{
    ApiError, RemoveTrailingSlotsRequest, RescheduleShiftRequest, UpdateGroupPolicyRequest,
    UpdateShiftDetailsRequest, add_responsible_admin, claim_slot, create_shift_instance,
    delete_shift_instance, get_event_status, get_management_board, get_shift_board,
    remove_responsible_admin, remove_trailing_slots, reschedule_shift_instance,
    update_group_policy, update_shift_details,
};
use nakki::PolicyViolation;
use nakki_domain::{EventId, EventPhase, EventSchedule, Locale};
use time::macros::datetime;

#[test]
fn test_create_rejects_reversed_window() {
    let mut fixture = create_test_fixture();
    let mut request = create_bar_request(fixture.definition_id);
    request.end = String::from("2025-06-14T09:00:00Z");

    let result = create_shift_instance(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        request,
        now(),
    );

    assert_eq!(
        result,
        Err(ApiError::InvalidInput {
            field: String::from("end"),
            message: String::from("End must be after start"),
        })
    );
}

#[test]
fn test_create_rejects_malformed_timestamp() {
    let mut fixture = create_test_fixture();
    let mut request = create_bar_request(fixture.definition_id);
    request.start = String::from("saturday morning");

    let result = create_shift_instance(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        request,
        now(),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "start"
    ));
}

#[test]
fn test_member_cannot_create_shift() {
    let mut fixture = create_test_fixture();
    let request = create_bar_request(fixture.definition_id);
    let result = create_shift_instance(
        &mut fixture.persistence,
        &fixture.alice,
        fixture.event_id,
        request,
        now(),
    );
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_create_reports_slot_count() {
    let mut fixture = create_test_fixture();
    let mut request = create_bar_request(fixture.definition_id);
    request.start = String::from("2025-06-14T18:00:00+03:00");
    request.end = String::from("2025-06-14T20:00:00+03:00");
    request.interval_minutes = 30;

    let response = create_shift_instance(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        request,
        now(),
    )
    .unwrap();

    let instance_id = response.instance_id.unwrap();
    assert_eq!(
        response.message,
        format!("Created shift {instance_id} with 4 slots")
    );
    assert!(response.warnings.is_empty());
}

#[test]
fn test_reschedule_keeps_occupied_slot_and_warns() {
    let mut fixture = create_test_fixture();
    let slot = fixture.bar_slot(12);
    claim_slot(&mut fixture.persistence, &fixture.alice, slot, now()).unwrap();

    let response = reschedule_shift_instance(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        &RescheduleShiftRequest {
            start: String::from("2025-06-14T10:00:00Z"),
            end: String::from("2025-06-14T12:00:00Z"),
            interval_minutes: 60,
        },
        now(),
    )
    .unwrap();

    assert_eq!(response.warnings.len(), 1);
    assert_eq!(response.warnings[0].booking_id, slot);
    assert_eq!(response.warnings[0].occupant, fixture.alice.member_id().unwrap());
    assert!(!response.warnings[0].blocks_target);

    let board = get_management_board(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        now(),
        Locale::Fi,
        &create_test_formatter(),
    )
    .unwrap();
    assert_eq!(board.columns[0].slots.len(), 3);
}

#[test]
fn test_reschedule_rejects_zero_interval() {
    let mut fixture = create_test_fixture();
    let result = reschedule_shift_instance(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        &RescheduleShiftRequest {
            start: String::from("2025-06-14T10:00:00Z"),
            end: String::from("2025-06-14T12:00:00Z"),
            interval_minutes: 0,
        },
        now(),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "interval_minutes"
    ));
}

#[test]
fn test_remove_trailing_slots() {
    let mut fixture = create_test_fixture();

    let zero = remove_trailing_slots(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        RemoveTrailingSlotsRequest { count: 0 },
        now(),
    );
    assert!(matches!(
        zero,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "count"
    ));

    let slot = fixture.bar_slot(12);
    claim_slot(&mut fixture.persistence, &fixture.alice, slot, now()).unwrap();
    let occupied = remove_trailing_slots(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        RemoveTrailingSlotsRequest { count: 1 },
        now(),
    );
    assert!(matches!(occupied, Err(ApiError::Conflict { .. })));

    let too_many = remove_trailing_slots(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        RemoveTrailingSlotsRequest { count: 3 },
        now(),
    );
    assert!(matches!(
        too_many,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "count"
    ));
}

#[test]
fn test_remove_trailing_open_slots() {
    let mut fixture = create_test_fixture();
    let response = remove_trailing_slots(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        RemoveTrailingSlotsRequest { count: 2 },
        now(),
    )
    .unwrap();
    assert_eq!(
        response.message,
        format!("Removed 2 slots from shift {}", fixture.bar)
    );

    let state = fixture.persistence.load_group_state(fixture.event_id).unwrap();
    let instance = state.instance(fixture.bar).unwrap();
    assert_eq!(instance.window.end(), datetime!(2025-06-14 11:00 UTC));
}

#[test]
fn test_remove_trailing_slots_after_shrink_keeps_a_slot() {
    let mut fixture = create_test_fixture();
    let early = fixture.bar_slot(10);
    claim_slot(&mut fixture.persistence, &fixture.alice, early, now()).unwrap();
    reschedule_shift_instance(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        &RescheduleShiftRequest {
            start: String::from("2025-06-14T11:00:00Z"),
            end: String::from("2025-06-14T13:00:00Z"),
            interval_minutes: 60,
        },
        now(),
    )
    .unwrap();

    let everything = remove_trailing_slots(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        RemoveTrailingSlotsRequest { count: 2 },
        now(),
    );
    assert!(matches!(
        everything,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "count"
    ));

    remove_trailing_slots(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        RemoveTrailingSlotsRequest { count: 1 },
        now(),
    )
    .unwrap();

    let state = fixture.persistence.load_group_state(fixture.event_id).unwrap();
    let instance = state.instance(fixture.bar).unwrap();
    assert_eq!(instance.window.start(), datetime!(2025-06-14 11:00 UTC));
    assert_eq!(instance.window.end(), datetime!(2025-06-14 12:00 UTC));
    let remaining = state.bookings_for_instance(fixture.bar);
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().any(|booking| booking.id == early && !booking.is_open()));
}

#[test]
fn test_disable_bookings_on_one_shift() {
    let mut fixture = create_test_fixture();
    update_shift_details(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.bar,
        UpdateShiftDetailsRequest {
            responsible_member_id: None,
            channel: Some(String::from("#bar")),
            bookings_disabled: true,
        },
        now(),
    )
    .unwrap();

    let slot = fixture.bar_slot(10);
    let result = claim_slot(&mut fixture.persistence, &fixture.alice, slot, now());
    assert_eq!(result, Err(PolicyViolation::BookingsDisabled.into()));
}

#[test]
fn test_delete_shift_instance() {
    let mut fixture = create_test_fixture();
    delete_shift_instance(&mut fixture.persistence, &fixture.admin, fixture.bar, now()).unwrap();

    let board = get_shift_board(
        &mut fixture.persistence,
        &fixture.alice,
        fixture.event_id,
        now(),
        Locale::Fi,
        &create_test_formatter(),
    )
    .unwrap();
    assert!(board.columns.is_empty());

    let again = delete_shift_instance(&mut fixture.persistence, &fixture.admin, fixture.bar, now());
    assert!(matches!(again, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_disabling_group_closes_member_board() {
    let mut fixture = create_test_fixture();
    update_group_policy(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        UpdateGroupPolicyRequest {
            enabled: false,
            require_distinct_times: true,
            required_for_ticket_reservation: false,
            show_link_in_event: false,
        },
        now(),
    )
    .unwrap();

    let result = get_shift_board(
        &mut fixture.persistence,
        &fixture.alice,
        fixture.event_id,
        now(),
        Locale::Fi,
        &create_test_formatter(),
    );
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_responsible_admin_gains_management_board() {
    let mut fixture = create_test_fixture();
    let alice_id = fixture.alice.member_id().unwrap();
    let formatter = create_test_formatter();

    add_responsible_admin(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        alice_id,
        now(),
    )
    .unwrap();

    // Rights are resolved from stored state on every request
    let board = get_management_board(
        &mut fixture.persistence,
        &fixture.alice,
        fixture.event_id,
        now(),
        Locale::Fi,
        &formatter,
    )
    .unwrap();
    assert!(board.can_manage);
    assert_eq!(board.columns.len(), 1);

    remove_responsible_admin(
        &mut fixture.persistence,
        &fixture.admin,
        fixture.event_id,
        alice_id,
        now(),
    )
    .unwrap();
    let revoked = get_management_board(
        &mut fixture.persistence,
        &fixture.alice,
        fixture.event_id,
        now(),
        Locale::Fi,
        &formatter,
    );
    assert!(matches!(revoked, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_event_status_of_published_event() {
    let mut fixture = create_test_fixture();
    let status = get_event_status(&mut fixture.persistence, &fixture.alice, fixture.event_id, now())
        .unwrap();

    assert_eq!(status.phase, EventPhase::SignupOpen);
    assert!(status.is_published);
    assert!(status.is_signup_open);
    assert!(!status.is_finished);
    assert_eq!(status.effective_end, datetime!(2025-06-14 15:00 UTC));
}

#[test]
fn test_draft_event_hidden_from_members() {
    let mut fixture = create_test_fixture();
    let draft = EventSchedule {
        publish_date: None,
        ..create_test_schedule()
    };
    let draft_id: EventId = fixture.persistence.create_event("Syyskokous", &draft).unwrap();

    let member_view = get_event_status(&mut fixture.persistence, &fixture.alice, draft_id, now());
    assert!(matches!(member_view, Err(ApiError::ResourceNotFound { .. })));

    let admin_view =
        get_event_status(&mut fixture.persistence, &fixture.admin, draft_id, now()).unwrap();
    assert_eq!(admin_view.phase, EventPhase::Draft);
    assert!(!admin_view.show_shift_link);
}
