// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    BAR, BAR_DEFINITION, DOOR, create_test_active_member, create_test_admin,
    create_test_group_admin, create_test_member, create_test_responsible, create_test_state, now,
    set_occupant,
};
use crate::{
    AccessError, Actor, Capability, CoreError, PolicyViolation, ShiftGroupState,
    authorize_manage, authorize_manage_group, authorize_view, can_book_slot, can_edit_instance,
    can_manage, capability_for, check_can_book_slot, check_ticket_reservation,
};
use nakki_domain::{DomainError, ShiftBookingId};
use time::macros::datetime;

#[test]
fn test_anonymous_management_is_unauthenticated_not_forbidden() {
    let state: ShiftGroupState = create_test_state();
    assert_eq!(
        authorize_manage(&Actor::Anonymous, &state),
        Err(AccessError::Unauthenticated)
    );
    assert!(!can_manage(&Actor::Anonymous, &state));
}

#[test]
fn test_plain_member_management_is_forbidden() {
    let state: ShiftGroupState = create_test_state();
    let result = authorize_manage(&create_test_member(7), &state);
    assert!(matches!(result, Err(AccessError::Forbidden { .. })));
}

#[test]
fn test_capabilities() {
    let state: ShiftGroupState = create_test_state();
    assert_eq!(capability_for(&Actor::Anonymous, &state), Capability::Anonymous);
    assert_eq!(capability_for(&create_test_member(7), &state), Capability::Member);
    assert_eq!(
        capability_for(&create_test_responsible(), &state),
        Capability::Responsible
    );
    assert_eq!(capability_for(&create_test_group_admin(), &state), Capability::Admin);
    assert_eq!(capability_for(&create_test_admin(), &state), Capability::Admin);
    assert!(can_manage(&create_test_responsible(), &state));
    assert!(can_manage(&create_test_group_admin(), &state));
}

#[test]
fn test_responsible_edits_only_own_shift() {
    let state: ShiftGroupState = create_test_state();
    let responsible: Actor = create_test_responsible();
    let bar = state.instance(BAR).unwrap();
    let door = state.instance(DOOR).unwrap();
    assert!(can_edit_instance(&responsible, &state, bar));
    assert!(!can_edit_instance(&responsible, &state, door));
    assert!(can_edit_instance(&create_test_group_admin(), &state, door));
    assert!(!can_edit_instance(&create_test_member(7), &state, bar));
}

#[test]
fn test_responsible_cannot_manage_group() {
    let state: ShiftGroupState = create_test_state();
    let result = authorize_manage_group(&create_test_responsible(), &state, "create shifts");
    assert_eq!(
        result,
        Err(AccessError::Forbidden {
            action: String::from("create shifts")
        })
    );
}

#[test]
fn test_member_board_closed_until_enabled_and_published() {
    let mut state: ShiftGroupState = create_test_state();
    let member: Actor = create_test_member(7);
    assert_eq!(authorize_view(&member, &state, now()), Ok(Capability::Member));

    assert_eq!(
        authorize_view(&member, &state, datetime!(2025-04-01 00:00 UTC)),
        Err(AccessError::BoardClosed)
    );

    state.group.policy.enabled = false;
    assert_eq!(
        authorize_view(&member, &state, now()),
        Err(AccessError::BoardClosed)
    );
    assert_eq!(
        authorize_view(&create_test_responsible(), &state, now()),
        Ok(Capability::Responsible)
    );
    assert_eq!(
        authorize_view(&Actor::Anonymous, &state, now()),
        Err(AccessError::Unauthenticated)
    );
}

#[test]
fn test_member_can_book_open_slot() {
    let state: ShiftGroupState = create_test_state();
    assert!(can_book_slot(
        &create_test_member(7),
        &state,
        BAR,
        datetime!(2025-06-14 10:00 UTC),
        now()
    ));
}

#[test]
fn test_anonymous_cannot_book() {
    let state: ShiftGroupState = create_test_state();
    assert_eq!(
        check_can_book_slot(
            &Actor::Anonymous,
            &state,
            BAR,
            datetime!(2025-06-14 10:00 UTC),
            now()
        ),
        Err(CoreError::Access(AccessError::Unauthenticated))
    );
}

#[test]
fn test_distinct_times_conflict_across_shifts() {
    let mut state: ShiftGroupState = create_test_state();
    // Member 7 holds bar 10:00-11:00.
    set_occupant(&mut state, 1, 7);

    // Door 10:30-11:30 overlaps.
    assert_eq!(
        check_can_book_slot(
            &create_test_member(7),
            &state,
            DOOR,
            datetime!(2025-06-14 10:30 UTC),
            now()
        ),
        Err(CoreError::Policy(PolicyViolation::DistinctTimesConflict))
    );

    // Door 11:30-12:30 does not.
    assert!(can_book_slot(
        &create_test_member(7),
        &state,
        DOOR,
        datetime!(2025-06-14 11:30 UTC),
        now()
    ));

    // Another bar slot is in the same shift and not a conflict.
    assert!(can_book_slot(
        &create_test_member(7),
        &state,
        BAR,
        datetime!(2025-06-14 11:00 UTC),
        now()
    ));
}

#[test]
fn test_overlap_allowed_when_distinct_times_not_required() {
    let mut state: ShiftGroupState = create_test_state();
    state.group.policy.require_distinct_times = false;
    set_occupant(&mut state, 1, 7);
    assert!(can_book_slot(
        &create_test_member(7),
        &state,
        DOOR,
        datetime!(2025-06-14 10:30 UTC),
        now()
    ));
}

#[test]
fn test_bookings_disabled_on_instance_or_group() {
    let mut state: ShiftGroupState = create_test_state();
    state.instances[0].bookings_disabled = true;
    assert_eq!(
        check_can_book_slot(
            &create_test_member(7),
            &state,
            BAR,
            datetime!(2025-06-14 10:00 UTC),
            now()
        ),
        Err(CoreError::Policy(PolicyViolation::BookingsDisabled))
    );

    let mut state: ShiftGroupState = create_test_state();
    state.group.policy.enabled = false;
    assert_eq!(
        check_can_book_slot(
            &create_test_member(7),
            &state,
            DOOR,
            datetime!(2025-06-14 10:30 UTC),
            now()
        ),
        Err(CoreError::Policy(PolicyViolation::BookingsDisabled))
    );
}

#[test]
fn test_unknown_definition_blocks_booking() {
    let mut state: ShiftGroupState = create_test_state();
    state
        .definitions
        .retain(|definition| definition.id != BAR_DEFINITION);

    assert_eq!(
        check_can_book_slot(
            &create_test_active_member(8),
            &state,
            BAR,
            datetime!(2025-06-14 10:00 UTC),
            now()
        ),
        Err(CoreError::DomainViolation(
            DomainError::ShiftDefinitionNotFound(BAR_DEFINITION)
        ))
    );
}

#[test]
fn test_active_members_only() {
    let mut state: ShiftGroupState = create_test_state();
    let definition = state
        .definitions
        .iter_mut()
        .find(|definition| definition.id == BAR_DEFINITION)
        .unwrap();
    definition.active_members_only = true;

    assert_eq!(
        check_can_book_slot(
            &create_test_member(7),
            &state,
            BAR,
            datetime!(2025-06-14 10:00 UTC),
            now()
        ),
        Err(CoreError::Policy(PolicyViolation::ActiveMembersOnly))
    );
    assert!(can_book_slot(
        &create_test_active_member(8),
        &state,
        BAR,
        datetime!(2025-06-14 10:00 UTC),
        now()
    ));
}

#[test]
fn test_started_slot_cannot_be_booked() {
    let state: ShiftGroupState = create_test_state();
    assert_eq!(
        check_can_book_slot(
            &create_test_member(7),
            &state,
            BAR,
            datetime!(2025-06-14 10:00 UTC),
            datetime!(2025-06-14 10:15 UTC)
        ),
        Err(CoreError::Policy(PolicyViolation::SlotInPast))
    );
}

#[test]
fn test_taken_slot_reports_slot_already_taken() {
    let mut state: ShiftGroupState = create_test_state();
    set_occupant(&mut state, 2, 9);
    assert_eq!(
        check_can_book_slot(
            &create_test_member(7),
            &state,
            BAR,
            datetime!(2025-06-14 11:00 UTC),
            now()
        ),
        Err(CoreError::SlotAlreadyTaken {
            booking_id: ShiftBookingId::new(2)
        })
    );
}

#[test]
fn test_slot_without_row_is_a_domain_error() {
    let state: ShiftGroupState = create_test_state();
    let result = check_can_book_slot(
        &create_test_member(7),
        &state,
        BAR,
        datetime!(2025-06-14 10:30 UTC),
        now(),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::SlotNotFound { .. }))
    ));
}

#[test]
fn test_ticket_reservation_requires_booking_when_configured() {
    let mut state: ShiftGroupState = create_test_state();
    let member: Actor = create_test_member(7);
    assert!(check_ticket_reservation(&member, &state).is_ok());

    state.group.policy.required_for_ticket_reservation = true;
    assert_eq!(
        check_ticket_reservation(&member, &state),
        Err(CoreError::Policy(
            PolicyViolation::ShiftBookingRequiredForTicket
        ))
    );

    set_occupant(&mut state, 11, 7);
    assert!(check_ticket_reservation(&member, &state).is_ok());
}

#[test]
fn test_policy_violation_codes_are_stable() {
    assert_eq!(
        PolicyViolation::DistinctTimesConflict.code(),
        "distinct_times_conflict"
    );
    assert_eq!(PolicyViolation::SlotInPast.code(), "slot_in_past");
    assert!(!PolicyViolation::ActiveMembersOnly.message().is_empty());
}
