// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::actor::{Actor, MemberContext};
use crate::command::Command;
use crate::eligibility::{
    authorize_edit_instance, authorize_manage_group, can_edit_instance, check_can_book_slot,
    require_member,
};
use crate::error::{CoreError, PolicyViolation};
use crate::state::{Action, BookingChange, ShiftGroupState, TransitionResult};
use nakki_domain::{
    ShiftBooking, ShiftInstance, ShiftWindow, SlotDiff, SlotInterval, diff_slots,
    plan_trailing_slot_removal,
};
use time::OffsetDateTime;

/// Applies a command to the current state, producing the storage changes
/// that realize it.
///
/// The state is never mutated. Persisting the returned changes is the
/// caller's job; the claim and release changes are conditional so a stale
/// read cannot overwrite a concurrent booking.
///
/// # Arguments
///
/// * `state` - The shift group as currently stored
/// * `command` - The command to apply
/// * `actor` - Who issued the command
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - The actor is anonymous or lacks the required right
/// - A booking policy rejects the action
/// - The slot is already taken
/// - The command violates domain rules
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &ShiftGroupState,
    command: Command,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let name: String = command.name().to_string();
    match command {
        Command::CreateShiftInstance {
            definition_id,
            start,
            end,
            interval,
            responsible,
            channel,
        } => {
            authorize_manage_group(actor, state, "create shifts")?;
            state.definition(definition_id)?;
            let window: ShiftWindow = ShiftWindow::new(start, end, interval)?;
            let slots: Vec<SlotInterval> = window.slots().collect();

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Scheduled definition {definition_id} from {start} to {end} in {} slots",
                    slots.len()
                )),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::CreateInstance {
                    definition_id,
                    window,
                    responsible,
                    channel: normalize_channel(channel),
                    slots,
                }],
            ))
        }
        Command::RescheduleShiftInstance {
            instance_id,
            start,
            end,
            interval,
        } => {
            let instance: &ShiftInstance = state.instance(instance_id)?;
            authorize_edit_instance(actor, state, instance, "reschedule this shift")?;
            let window: ShiftWindow = ShiftWindow::new(start, end, interval)?;
            let existing: Vec<ShiftBooking> = state.bookings_for_instance(instance_id);
            let diff: SlotDiff = diff_slots(&window, &existing);

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Rescheduled shift {instance_id} to {start}..{end}: {} created, {} deleted, {} retained",
                    diff.to_create.len(),
                    diff.to_delete.len(),
                    diff.retained.len()
                )),
            );
            let mut changes: Vec<BookingChange> = vec![BookingChange::UpdateInstanceWindow {
                instance_id,
                window,
            }];
            if !diff.to_delete.is_empty() {
                changes.push(BookingChange::DeleteOpenSlots {
                    booking_ids: diff.to_delete,
                });
            }
            if !diff.to_create.is_empty() {
                changes.push(BookingChange::InsertSlots {
                    instance_id,
                    slots: diff.to_create,
                });
            }
            Ok(TransitionResult {
                warnings: diff.retained,
                ..TransitionResult::new(state, action, changes)
            })
        }
        Command::UpdateShiftDetails {
            instance_id,
            responsible,
            channel,
            bookings_disabled,
        } => {
            let instance: &ShiftInstance = state.instance(instance_id)?;
            authorize_edit_instance(actor, state, instance, "edit this shift")?;

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Updated shift {instance_id} (bookings disabled: {bookings_disabled})"
                )),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::UpdateInstanceDetails {
                    instance_id,
                    responsible,
                    channel: normalize_channel(channel),
                    bookings_disabled,
                }],
            ))
        }
        Command::DeleteShiftInstance { instance_id } => {
            authorize_manage_group(actor, state, "delete shifts")?;
            state.instance(instance_id)?;
            let released: usize = state
                .bookings_for_instance(instance_id)
                .iter()
                .filter(|booking| !booking.is_open())
                .count();

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Deleted shift {instance_id} with {released} occupied slots"
                )),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::DeleteInstance { instance_id }],
            ))
        }
        Command::RemoveTrailingSlots { instance_id, count } => {
            let instance: &ShiftInstance = state.instance(instance_id)?;
            authorize_edit_instance(actor, state, instance, "remove slots from this shift")?;
            let existing: Vec<ShiftBooking> = state.bookings_for_instance(instance_id);
            let (booking_ids, new_end) =
                plan_trailing_slot_removal(&instance.window, &existing, count)?;
            let window: ShiftWindow = ShiftWindow::new(
                instance.window.start(),
                new_end,
                instance.window.interval(),
            )?;

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Removed {count} trailing slots from shift {instance_id}; now ends {new_end}"
                )),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![
                    BookingChange::DeleteOpenSlots { booking_ids },
                    BookingChange::UpdateInstanceWindow {
                        instance_id,
                        window,
                    },
                ],
            ))
        }
        Command::ClaimSlot {
            instance_id,
            slot_start,
        } => {
            check_can_book_slot(actor, state, instance_id, slot_start, now)?;
            let member: &MemberContext = require_member(actor)?;
            let booking: &ShiftBooking = state.occupancy().booking_at(instance_id, slot_start)?;

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Member {} claimed slot {} of shift {instance_id}",
                    member.member_id, booking.id
                )),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::ClaimSlot {
                    booking_id: booking.id,
                    member_id: member.member_id,
                }],
            ))
        }
        Command::ReleaseSlot { booking_id } => {
            let member: &MemberContext = require_member(actor)?;
            let booking: &ShiftBooking = state.booking(booking_id)?;
            let instance: &ShiftInstance = state.instance(booking.shift_instance_id)?;
            let manager: bool = can_edit_instance(actor, state, instance);

            let Some(occupant) = booking.occupant else {
                if manager {
                    return Ok(TransitionResult::new(
                        state,
                        Action::new(name, Some(format!("Slot {booking_id} was already open"))),
                        Vec::new(),
                    ));
                }
                return Err(PolicyViolation::NotSlotOccupant.into());
            };
            if !manager {
                if occupant != member.member_id {
                    return Err(PolicyViolation::NotSlotOccupant.into());
                }
                if booking.slot_start <= now {
                    return Err(PolicyViolation::SlotInPast.into());
                }
            }

            let action: Action = Action::new(
                name,
                Some(format!("Released slot {booking_id} held by member {occupant}")),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::ReleaseSlot {
                    booking_id,
                    occupant,
                }],
            ))
        }
        Command::AssignSlot {
            booking_id,
            member_id,
        } => {
            let booking: &ShiftBooking = state.booking(booking_id)?;
            let instance: &ShiftInstance = state.instance(booking.shift_instance_id)?;
            authorize_edit_instance(actor, state, instance, "assign slots in this shift")?;
            ensure_open(booking)?;

            let action: Action = Action::new(
                name,
                Some(format!("Assigned slot {booking_id} to member {member_id}")),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::ClaimSlot {
                    booking_id,
                    member_id,
                }],
            ))
        }
        Command::UpdateGroupPolicy { policy } => {
            authorize_manage_group(actor, state, "change shift group settings")?;

            let action: Action = Action::new(
                name,
                Some(format!(
                    "Group {} enabled={} distinct_times={} required_for_ticket={}",
                    state.group.id,
                    policy.enabled,
                    policy.require_distinct_times,
                    policy.required_for_ticket_reservation
                )),
            );
            Ok(TransitionResult::new(
                state,
                action,
                vec![BookingChange::UpdateGroupPolicy { policy }],
            ))
        }
        Command::AddResponsibleAdmin { member_id } => {
            authorize_manage_group(actor, state, "change responsible admins")?;
            let changes: Vec<BookingChange> = if state.group.is_responsible_admin(member_id) {
                Vec::new()
            } else {
                vec![BookingChange::AddResponsibleAdmin { member_id }]
            };
            Ok(TransitionResult::new(
                state,
                Action::new(name, Some(format!("Member {member_id} is a responsible admin"))),
                changes,
            ))
        }
        Command::RemoveResponsibleAdmin { member_id } => {
            authorize_manage_group(actor, state, "change responsible admins")?;
            let changes: Vec<BookingChange> = if state.group.is_responsible_admin(member_id) {
                vec![BookingChange::RemoveResponsibleAdmin { member_id }]
            } else {
                Vec::new()
            };
            Ok(TransitionResult::new(
                state,
                Action::new(
                    name,
                    Some(format!("Member {member_id} is no longer a responsible admin")),
                ),
                changes,
            ))
        }
    }
}

fn ensure_open(booking: &ShiftBooking) -> Result<(), CoreError> {
    if booking.is_open() {
        Ok(())
    } else {
        Err(CoreError::SlotAlreadyTaken {
            booking_id: booking.id,
        })
    }
}

fn normalize_channel(channel: Option<String>) -> Option<String> {
    channel
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

