// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Who may view, manage and book within a shift group.
//!
//! ## Rules
//!
//! - Admins and the group's responsible admins manage the whole board
//! - A shift's responsible manages that shift only
//! - Any authenticated member may book an open slot unless a policy
//!   rejects it
//! - Anonymous actors are always `Unauthenticated`, never `Forbidden`

use crate::actor::{Actor, Capability, MemberContext};
use crate::error::{AccessError, CoreError, PolicyViolation};
use crate::state::ShiftGroupState;
use nakki_domain::{ShiftBooking, ShiftInstance, ShiftInstanceId, is_published};
use time::OffsetDateTime;

/// Computes the actor's capability within a shift group.
#[must_use]
pub fn capability_for(actor: &Actor, state: &ShiftGroupState) -> Capability {
    let Some(member) = actor.member() else {
        return Capability::Anonymous;
    };
    if member.is_admin || state.group.is_responsible_admin(member.member_id) {
        Capability::Admin
    } else if state.is_responsible_for_any(member.member_id) {
        Capability::Responsible
    } else {
        Capability::Member
    }
}

/// Requires an authenticated actor.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors.
pub const fn require_member(actor: &Actor) -> Result<&MemberContext, AccessError> {
    match actor.member() {
        Some(member) => Ok(member),
        None => Err(AccessError::Unauthenticated),
    }
}

/// Authorizes access to the management board.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors and
/// `AccessError::Forbidden` for members with no management rights.
pub fn authorize_manage(
    actor: &Actor,
    state: &ShiftGroupState,
) -> Result<Capability, AccessError> {
    match capability_for(actor, state) {
        Capability::Anonymous => Err(AccessError::Unauthenticated),
        Capability::Member => Err(AccessError::forbidden("manage shifts")),
        capability => Ok(capability),
    }
}

/// Returns true if the actor may open the management board.
#[must_use]
pub fn can_manage(actor: &Actor, state: &ShiftGroupState) -> bool {
    authorize_manage(actor, state).is_ok()
}

/// Authorizes group-wide management: creating and deleting shifts, policy
/// and responsible admin changes.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors and
/// `AccessError::Forbidden` for anyone below `Capability::Admin`.
pub fn authorize_manage_group(
    actor: &Actor,
    state: &ShiftGroupState,
    action: &str,
) -> Result<(), AccessError> {
    match capability_for(actor, state) {
        Capability::Anonymous => Err(AccessError::Unauthenticated),
        Capability::Admin => Ok(()),
        Capability::Member | Capability::Responsible => Err(AccessError::forbidden(action)),
    }
}

/// Returns true if the actor may edit one shift instance.
#[must_use]
pub fn can_edit_instance(
    actor: &Actor,
    state: &ShiftGroupState,
    instance: &ShiftInstance,
) -> bool {
    match capability_for(actor, state) {
        Capability::Admin => true,
        Capability::Responsible => instance.responsible == actor.member_id(),
        Capability::Anonymous | Capability::Member => false,
    }
}

/// Authorizes editing one shift instance.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors and
/// `AccessError::Forbidden` if the actor may not edit the instance.
pub fn authorize_edit_instance(
    actor: &Actor,
    state: &ShiftGroupState,
    instance: &ShiftInstance,
    action: &str,
) -> Result<(), AccessError> {
    require_member(actor)?;
    if can_edit_instance(actor, state, instance) {
        Ok(())
    } else {
        Err(AccessError::forbidden(action))
    }
}

/// Authorizes access to the member board.
///
/// Managers always see the board. Other members see it once the group is
/// enabled and the event is published.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors and
/// `AccessError::BoardClosed` while the board is not open to members.
pub fn authorize_view(
    actor: &Actor,
    state: &ShiftGroupState,
    now: OffsetDateTime,
) -> Result<Capability, AccessError> {
    let capability: Capability = capability_for(actor, state);
    match capability {
        Capability::Anonymous => Err(AccessError::Unauthenticated),
        Capability::Admin | Capability::Responsible => Ok(capability),
        Capability::Member => {
            if state.group.policy.enabled && is_published(&state.event, now) {
                Ok(capability)
            } else {
                Err(AccessError::BoardClosed)
            }
        }
    }
}

/// Checks whether the actor may self-book the slot starting at `slot_start`.
///
/// # Errors
///
/// - `AccessError::Unauthenticated` for anonymous actors
/// - `DomainError::ShiftInstanceNotFound` / `DomainError::SlotNotFound` if
///   the slot does not exist, `DomainError::ShiftDefinitionNotFound` if the
///   instance references an unknown definition
/// - `CoreError::SlotAlreadyTaken` if the slot is occupied
/// - `PolicyViolation::BookingsDisabled` if the group is not enabled or the
///   instance has bookings disabled
/// - `PolicyViolation::SlotInPast` if the slot has already started
/// - `PolicyViolation::ActiveMembersOnly` if the definition is restricted
///   and the member is not active
/// - `PolicyViolation::DistinctTimesConflict` if the group requires distinct
///   times and the member holds an overlapping slot in another instance
pub fn check_can_book_slot(
    actor: &Actor,
    state: &ShiftGroupState,
    instance_id: ShiftInstanceId,
    slot_start: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let member: &MemberContext = require_member(actor)?;
    let instance: &ShiftInstance = state.instance(instance_id)?;
    let tracker = state.occupancy();
    let booking: &ShiftBooking = tracker.booking_at(instance_id, slot_start)?;

    if booking.occupant.is_some() {
        return Err(CoreError::SlotAlreadyTaken {
            booking_id: booking.id,
        });
    }
    check_member_policies(member, state, instance, booking, now)?;
    Ok(())
}

/// Returns true if `check_can_book_slot` would succeed.
#[must_use]
pub fn can_book_slot(
    actor: &Actor,
    state: &ShiftGroupState,
    instance_id: ShiftInstanceId,
    slot_start: OffsetDateTime,
    now: OffsetDateTime,
) -> bool {
    check_can_book_slot(actor, state, instance_id, slot_start, now).is_ok()
}

/// The policy part of the booking check, for a slot known to be open.
pub(crate) fn check_member_policies(
    member: &MemberContext,
    state: &ShiftGroupState,
    instance: &ShiftInstance,
    booking: &ShiftBooking,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    if !state.group.policy.enabled || instance.bookings_disabled {
        return Err(PolicyViolation::BookingsDisabled.into());
    }
    if booking.slot_start <= now {
        return Err(PolicyViolation::SlotInPast.into());
    }
    let restricted: bool = state
        .definition(instance.definition_id)?
        .active_members_only;
    if restricted && !member.is_active_member {
        return Err(PolicyViolation::ActiveMembersOnly.into());
    }
    if state.group.policy.require_distinct_times
        && state.occupancy().is_member_booked_elsewhere_overlapping(
            member.member_id,
            &booking.interval(),
            instance.id,
        )
    {
        return Err(PolicyViolation::DistinctTimesConflict.into());
    }
    Ok(())
}

/// Checks whether the actor may reserve a ticket for the event.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors and
/// `PolicyViolation::ShiftBookingRequiredForTicket` if the group requires a
/// shift booking and the member holds none.
pub fn check_ticket_reservation(actor: &Actor, state: &ShiftGroupState) -> Result<(), CoreError> {
    let member: &MemberContext = require_member(actor)?;
    let policy = state.group.policy;
    if !policy.enabled || !policy.required_for_ticket_reservation {
        return Ok(());
    }
    if state.occupancy().bookings_of(member.member_id).is_empty() {
        return Err(PolicyViolation::ShiftBookingRequiredForTicket.into());
    }
    Ok(())
}
