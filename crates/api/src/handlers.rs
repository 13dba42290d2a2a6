// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every state-changing handler follows the same sequence: load the shift
//! group state, apply a core command, persist the resulting transition.
//! The caller must hold exclusive access to `persistence` for the whole
//! sequence; the conditional writes in persistence catch decisions made on
//! a stale snapshot regardless.

use nakki::{
    Actor, BoardView, Command, CoreError, MemberContext, ShiftGroupState, TransitionResult,
    apply, assemble_board, assemble_management_board, require_member,
};
use nakki_domain::{
    EventId, EventSchedule, Locale, LocalTimeFormatter, MemberId, ShiftBooking, ShiftBookingId,
    ShiftDefinitionId, ShiftGroupPolicy, ShiftInstanceId, effective_end, event_phase,
    is_finished, is_published, is_signup_open,
};
use nakki_persistence::{PersistTransitionResult, Persistence, PersistenceError};
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::input::{InputError, parse_window};
use crate::request_response::{
    AssignSlotRequest, BookingResponse, CreateShiftInstanceRequest, EventStatusResponse,
    MyBookingInfo, MyBookingsResponse, RemoveTrailingSlotsRequest, RescheduleShiftRequest,
    ShiftChangeResponse, TicketEligibilityResponse, UpdateGroupPolicyRequest,
    UpdateShiftDetailsRequest,
};

fn load_state(
    persistence: &mut Persistence,
    event_id: EventId,
) -> Result<ShiftGroupState, ApiError> {
    persistence
        .load_group_state(event_id)
        .map_err(translate_persistence_error)
}

fn execute(
    persistence: &mut Persistence,
    state: &ShiftGroupState,
    command: Command,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(TransitionResult, PersistTransitionResult), ApiError> {
    let result: TransitionResult =
        apply(state, command, actor, now).map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = persistence
        .persist_transition(&result)
        .map_err(translate_persistence_error)?;
    info!(
        actor = %actor.label(),
        action = %result.action.name,
        details = result.action.details.as_deref().unwrap_or(""),
        "Applied shift transition"
    );
    Ok((result, persisted))
}

fn instance_event(
    persistence: &mut Persistence,
    instance_id: ShiftInstanceId,
) -> Result<EventId, ApiError> {
    persistence
        .get_instance_event(instance_id)
        .map_err(translate_persistence_error)
}

fn booking(
    persistence: &mut Persistence,
    booking_id: ShiftBookingId,
) -> Result<ShiftBooking, ApiError> {
    persistence
        .get_booking(booking_id)
        .map_err(translate_persistence_error)
}

fn is_global_admin(actor: &Actor) -> bool {
    actor.member().is_some_and(|member| member.is_admin)
}

/// Returns the temporal status of an event.
///
/// Unpublished events are visible to global admins only.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event does not exist or is
/// not visible to the actor.
pub fn get_event_status(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    now: OffsetDateTime,
) -> Result<EventStatusResponse, ApiError> {
    let event: EventSchedule = persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;

    let published: bool = is_published(&event, now);
    if !published && !is_global_admin(actor) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Event"),
            message: format!("Event {event_id} does not exist"),
        });
    }

    let show_shift_link: bool = match persistence.load_group_state(event_id) {
        Ok(state) => state.group.policy.enabled && state.group.policy.show_link_in_event,
        Err(PersistenceError::ShiftGroupNotFound(_)) => false,
        Err(err) => return Err(translate_persistence_error(err)),
    };

    Ok(EventStatusResponse {
        event_id,
        phase: event_phase(&event, now),
        is_published: published,
        is_signup_open: is_signup_open(&event, now),
        is_finished: is_finished(&event, now),
        effective_end: effective_end(&event),
        show_shift_link,
    })
}

/// Returns the member view of an event's shift board.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` for anonymous actors and
/// `ApiError::Forbidden` while the board is closed to members.
pub fn get_shift_board(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    now: OffsetDateTime,
    locale: Locale,
    formatter: &LocalTimeFormatter,
) -> Result<BoardView, ApiError> {
    require_member(actor)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;
    assemble_board(actor, &state, now, locale, formatter).map_err(translate_core_error)
}

/// Returns the management view of an event's shift board.
///
/// Only the columns the actor may edit are included.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` for anonymous actors and
/// `ApiError::Forbidden` for members without management rights.
pub fn get_management_board(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    now: OffsetDateTime,
    locale: Locale,
    formatter: &LocalTimeFormatter,
) -> Result<BoardView, ApiError> {
    require_member(actor)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;
    assemble_management_board(actor, &state, now, locale, formatter)
        .map_err(translate_core_error)
}

/// Books an open slot for the actor.
///
/// # Errors
///
/// Returns `ApiError::SlotAlreadyTaken` if somebody holds the slot, also
/// when they won a concurrent race, and `ApiError::PolicyViolation` if a
/// booking rule refuses it.
pub fn claim_slot(
    persistence: &mut Persistence,
    actor: &Actor,
    booking_id: ShiftBookingId,
    now: OffsetDateTime,
) -> Result<BookingResponse, ApiError> {
    let member: &MemberContext = require_member(actor)?;
    let row: ShiftBooking = booking(persistence, booking_id)?;
    let state: ShiftGroupState = load_state(persistence, row.event_id)?;

    execute(
        persistence,
        &state,
        Command::ClaimSlot {
            instance_id: row.shift_instance_id,
            slot_start: row.slot_start,
        },
        actor,
        now,
    )?;

    Ok(BookingResponse::new(
        &row,
        Some(member.member_id),
        String::from("Slot booked"),
    ))
}

/// Frees a slot.
///
/// # Errors
///
/// Returns `ApiError::PolicyViolation` if the actor does not hold the slot
/// or it has already started, and `ApiError::Conflict` if the slot changed
/// hands meanwhile.
pub fn release_slot(
    persistence: &mut Persistence,
    actor: &Actor,
    booking_id: ShiftBookingId,
    now: OffsetDateTime,
) -> Result<BookingResponse, ApiError> {
    require_member(actor)?;
    let row: ShiftBooking = booking(persistence, booking_id)?;
    let state: ShiftGroupState = load_state(persistence, row.event_id)?;

    execute(
        persistence,
        &state,
        Command::ReleaseSlot { booking_id },
        actor,
        now,
    )?;

    Ok(BookingResponse::new(&row, None, String::from("Slot released")))
}

/// Puts a member into an open slot on their behalf.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not edit the shift and
/// `ApiError::SlotAlreadyTaken` if the slot is held.
pub fn assign_slot(
    persistence: &mut Persistence,
    actor: &Actor,
    booking_id: ShiftBookingId,
    request: AssignSlotRequest,
    now: OffsetDateTime,
) -> Result<BookingResponse, ApiError> {
    require_member(actor)?;
    let member_id: MemberId = MemberId::new(request.member_id);
    let assignee_exists: bool = persistence
        .get_member(member_id)
        .map_err(translate_persistence_error)?
        .is_some();
    if !assignee_exists {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member {member_id} does not exist"),
        });
    }

    let row: ShiftBooking = booking(persistence, booking_id)?;
    let state: ShiftGroupState = load_state(persistence, row.event_id)?;
    execute(
        persistence,
        &state,
        Command::AssignSlot {
            booking_id,
            member_id,
        },
        actor,
        now,
    )?;

    Ok(BookingResponse::new(
        &row,
        Some(member_id),
        format!("Slot assigned to member {member_id}"),
    ))
}

/// Schedules a shift definition for an event and materializes its slots.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a malformed window and
/// `ApiError::Forbidden` if the actor may not manage the group.
pub fn create_shift_instance(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    request: CreateShiftInstanceRequest,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let (start, end, interval): (OffsetDateTime, OffsetDateTime, Duration) =
        parse_window(&request.start, &request.end, request.interval_minutes)?;
    let definition_id: ShiftDefinitionId = ShiftDefinitionId::new(request.definition_id);
    let mut state: ShiftGroupState = load_state(persistence, event_id)?;
    match persistence.get_shift_definition(definition_id) {
        Ok(definition) => state.include_definition(definition),
        // apply reports the unknown definition after authorizing the actor
        Err(PersistenceError::NotFound(_)) => {}
        Err(err) => return Err(translate_persistence_error(err)),
    }

    let (result, persisted) = execute(
        persistence,
        &state,
        Command::CreateShiftInstance {
            definition_id,
            start,
            end,
            interval,
            responsible: request.responsible_member_id.map(MemberId::new),
            channel: request.channel,
        },
        actor,
        now,
    )?;

    let instance_id: ShiftInstanceId = persisted.created_instance.ok_or_else(|| ApiError::Internal {
        message: String::from("Shift instance was not created"),
    })?;
    Ok(ShiftChangeResponse {
        instance_id: Some(instance_id),
        message: format!(
            "Created shift {instance_id} with {} slots",
            persisted.inserted_slots
        ),
        warnings: result.warnings,
    })
}

/// Changes the window of a shift, reconciling its slots.
///
/// Occupied slots outside the new window are kept and returned as warnings.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a malformed window,
/// `ApiError::Forbidden` if the actor may not edit the shift, and
/// `ApiError::Conflict` if a slot to delete was booked meanwhile.
pub fn reschedule_shift_instance(
    persistence: &mut Persistence,
    actor: &Actor,
    instance_id: ShiftInstanceId,
    request: &RescheduleShiftRequest,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let (start, end, interval): (OffsetDateTime, OffsetDateTime, Duration) =
        parse_window(&request.start, &request.end, request.interval_minutes)?;
    let event_id: EventId = instance_event(persistence, instance_id)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;

    let (result, persisted) = execute(
        persistence,
        &state,
        Command::RescheduleShiftInstance {
            instance_id,
            start,
            end,
            interval,
        },
        actor,
        now,
    )?;

    Ok(ShiftChangeResponse {
        instance_id: Some(instance_id),
        message: format!(
            "Rescheduled shift {instance_id}: {} slots added, {} removed, {} kept outside the window",
            persisted.inserted_slots,
            persisted.deleted_slots,
            result.warnings.len()
        ),
        warnings: result.warnings,
    })
}

/// Changes a shift's responsible member, channel and booking switch.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not edit the shift.
pub fn update_shift_details(
    persistence: &mut Persistence,
    actor: &Actor,
    instance_id: ShiftInstanceId,
    request: UpdateShiftDetailsRequest,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let event_id: EventId = instance_event(persistence, instance_id)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;

    execute(
        persistence,
        &state,
        Command::UpdateShiftDetails {
            instance_id,
            responsible: request.responsible_member_id.map(MemberId::new),
            channel: request.channel,
            bookings_disabled: request.bookings_disabled,
        },
        actor,
        now,
    )?;

    Ok(ShiftChangeResponse {
        instance_id: Some(instance_id),
        message: format!("Updated shift {instance_id}"),
        warnings: Vec::new(),
    })
}

/// Removes open slots from the end of a shift.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a zero or too large count and
/// `ApiError::Conflict` if a trailing slot is occupied.
pub fn remove_trailing_slots(
    persistence: &mut Persistence,
    actor: &Actor,
    instance_id: ShiftInstanceId,
    request: RemoveTrailingSlotsRequest,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    if request.count == 0 {
        return Err(InputError::InvalidCount.into());
    }
    let event_id: EventId = instance_event(persistence, instance_id)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;

    let (_, persisted) = execute(
        persistence,
        &state,
        Command::RemoveTrailingSlots {
            instance_id,
            count: request.count,
        },
        actor,
        now,
    )?;

    Ok(ShiftChangeResponse {
        instance_id: Some(instance_id),
        message: format!(
            "Removed {} slots from shift {instance_id}",
            persisted.deleted_slots
        ),
        warnings: Vec::new(),
    })
}

/// Deletes a shift together with its slots.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not manage the group.
pub fn delete_shift_instance(
    persistence: &mut Persistence,
    actor: &Actor,
    instance_id: ShiftInstanceId,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let event_id: EventId = instance_event(persistence, instance_id)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;

    execute(
        persistence,
        &state,
        Command::DeleteShiftInstance { instance_id },
        actor,
        now,
    )?;

    Ok(ShiftChangeResponse {
        instance_id: Some(instance_id),
        message: format!("Deleted shift {instance_id}"),
        warnings: Vec::new(),
    })
}

/// Replaces the policy flags of an event's shift group.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not manage the group.
pub fn update_group_policy(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    request: UpdateGroupPolicyRequest,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;
    let policy: ShiftGroupPolicy = request.into();

    execute(persistence, &state, Command::UpdateGroupPolicy { policy }, actor, now)?;

    Ok(ShiftChangeResponse {
        instance_id: None,
        message: format!("Updated shift policy of event {event_id}"),
        warnings: Vec::new(),
    })
}

/// Grants a member responsible-admin rights over an event's shift group.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not manage the group.
pub fn add_responsible_admin(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    member_id: MemberId,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;
    execute(
        persistence,
        &state,
        Command::AddResponsibleAdmin { member_id },
        actor,
        now,
    )?;
    Ok(ShiftChangeResponse {
        instance_id: None,
        message: format!("Member {member_id} is a responsible admin of event {event_id}"),
        warnings: Vec::new(),
    })
}

/// Revokes a member's responsible-admin rights.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not manage the group.
pub fn remove_responsible_admin(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
    member_id: MemberId,
    now: OffsetDateTime,
) -> Result<ShiftChangeResponse, ApiError> {
    require_member(actor)?;
    let state: ShiftGroupState = load_state(persistence, event_id)?;
    execute(
        persistence,
        &state,
        Command::RemoveResponsibleAdmin { member_id },
        actor,
        now,
    )?;
    Ok(ShiftChangeResponse {
        instance_id: None,
        message: format!("Member {member_id} is no longer a responsible admin of event {event_id}"),
        warnings: Vec::new(),
    })
}

/// Reports whether the actor may reserve a ticket for an event.
///
/// A refusal by the booking-required rule is an answer, not an error. An
/// event without a shift group never requires a booking.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` for anonymous actors and
/// `ApiError::ResourceNotFound` if the event does not exist.
pub fn check_ticket_reservation(
    persistence: &mut Persistence,
    actor: &Actor,
    event_id: EventId,
) -> Result<TicketEligibilityResponse, ApiError> {
    require_member(actor)?;
    let state: ShiftGroupState = match persistence.load_group_state(event_id) {
        Ok(state) => state,
        Err(PersistenceError::ShiftGroupNotFound(_)) => {
            persistence
                .get_event(event_id)
                .map_err(translate_persistence_error)?;
            return Ok(TicketEligibilityResponse {
                event_id,
                eligible: true,
                reason: None,
                message: None,
            });
        }
        Err(err) => return Err(translate_persistence_error(err)),
    };

    match nakki::check_ticket_reservation(actor, &state) {
        Ok(()) => Ok(TicketEligibilityResponse {
            event_id,
            eligible: true,
            reason: None,
            message: None,
        }),
        Err(CoreError::Policy(violation)) => Ok(TicketEligibilityResponse {
            event_id,
            eligible: false,
            reason: Some(violation),
            message: Some(violation.message().to_string()),
        }),
        Err(err) => Err(translate_core_error(err)),
    }
}

/// Lists the slots the actor holds across all events.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` for anonymous actors.
pub fn list_my_bookings(
    persistence: &mut Persistence,
    actor: &Actor,
) -> Result<MyBookingsResponse, ApiError> {
    let member: &MemberContext = require_member(actor)?;
    let bookings: Vec<ShiftBooking> = persistence
        .list_bookings_for_member(member.member_id)
        .map_err(translate_persistence_error)?;

    Ok(MyBookingsResponse {
        member_id: member.member_id,
        bookings: bookings.iter().map(MyBookingInfo::from).collect(),
    })
}
