// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Execution of a transition's `BookingChange`s.
//!
//! ## Invariants
//!
//! - All changes of one transition commit together or not at all
//! - A claim only succeeds on a row that is still open at write time
//! - A release only succeeds while the row is still held by the occupant
//!   seen at read time
//! - Rows deleted by reconciliation must still be open at write time
//!
//! The rule layer decides on a snapshot; these conditions make the write
//! fail instead of overwriting a change that happened after the snapshot.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nakki::{BookingChange, TransitionResult};
use nakki_domain::{
    EventId, MemberId, ShiftBookingId, ShiftDefinitionId, ShiftGroupId, ShiftGroupPolicy,
    ShiftInstanceId, ShiftWindow, SlotInterval,
};
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{PersistTransitionResult, flag, format_timestamp};
use crate::diesel_schema::{shift_bookings, shift_group_admins, shift_groups, shift_instances};
use crate::error::PersistenceError;

/// Persists every change of a transition in one database transaction.
///
/// # Errors
///
/// Returns `PersistenceError::SlotAlreadyTaken` if a claimed row is no
/// longer open, `PersistenceError::BookingChanged` if a released or deleted
/// row changed after it was read, and `PersistenceError::BookingNotFound` if
/// a referenced row no longer exists. Nothing is written on error.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    let outcome: PersistTransitionResult = conn.transaction(|conn| {
        let mut outcome = PersistTransitionResult::default();
        for change in &result.changes {
            apply_change(conn, result.event_id, result.group_id, change, &mut outcome)?;
        }
        Ok::<_, PersistenceError>(outcome)
    })?;

    for retained in &result.warnings {
        warn!(
            booking_id = retained.booking_id.value(),
            occupant = retained.occupant.value(),
            blocks_target = retained.blocks_target,
            "Occupied slot retained outside the shift window"
        );
    }
    info!(
        action = %result.action.name,
        event_id = result.event_id.value(),
        changes = result.changes.len(),
        inserted = outcome.inserted_slots,
        deleted = outcome.deleted_slots,
        "Persisted transition"
    );
    Ok(outcome)
}

fn apply_change(
    conn: &mut SqliteConnection,
    event_id: EventId,
    group_id: ShiftGroupId,
    change: &BookingChange,
    outcome: &mut PersistTransitionResult,
) -> Result<(), PersistenceError> {
    match change {
        BookingChange::CreateInstance {
            definition_id,
            window,
            responsible,
            channel,
            slots,
        } => {
            let instance_id: ShiftInstanceId = insert_instance(
                conn,
                event_id,
                *definition_id,
                window,
                *responsible,
                channel.as_deref(),
            )?;
            outcome.inserted_slots += insert_slots(conn, event_id, instance_id, slots)?;
            outcome.created_instance = Some(instance_id);
        }
        BookingChange::UpdateInstanceWindow {
            instance_id,
            window,
        } => {
            let updated: usize = diesel::update(
                shift_instances::table
                    .filter(shift_instances::shift_instance_id.eq(instance_id.value()))
                    .filter(shift_instances::event_id.eq(event_id.value())),
            )
            .set((
                shift_instances::start_time.eq(format_timestamp(window.start())?),
                shift_instances::end_time.eq(format_timestamp(window.end())?),
                shift_instances::interval_seconds.eq(window.interval().whole_seconds()),
            ))
            .execute(conn)?;
            ensure_instance_found(updated, *instance_id)?;
        }
        BookingChange::UpdateInstanceDetails {
            instance_id,
            responsible,
            channel,
            bookings_disabled,
        } => {
            let updated: usize = diesel::update(
                shift_instances::table
                    .filter(shift_instances::shift_instance_id.eq(instance_id.value()))
                    .filter(shift_instances::event_id.eq(event_id.value())),
            )
            .set((
                shift_instances::responsible_member_id.eq(responsible.map(MemberId::value)),
                shift_instances::channel.eq(channel.as_deref()),
                shift_instances::bookings_disabled.eq(flag(*bookings_disabled)),
            ))
            .execute(conn)?;
            ensure_instance_found(updated, *instance_id)?;
        }
        BookingChange::DeleteInstance { instance_id } => {
            let deleted: usize = diesel::delete(
                shift_instances::table
                    .filter(shift_instances::shift_instance_id.eq(instance_id.value()))
                    .filter(shift_instances::event_id.eq(event_id.value())),
            )
            .execute(conn)?;
            ensure_instance_found(deleted, *instance_id)?;
        }
        BookingChange::InsertSlots { instance_id, slots } => {
            outcome.inserted_slots += insert_slots(conn, event_id, *instance_id, slots)?;
        }
        BookingChange::DeleteOpenSlots { booking_ids } => {
            outcome.deleted_slots += delete_open_slots(conn, event_id, booking_ids)?;
        }
        BookingChange::ClaimSlot {
            booking_id,
            member_id,
        } => claim_slot(conn, event_id, *booking_id, *member_id)?,
        BookingChange::ReleaseSlot {
            booking_id,
            occupant,
        } => release_slot(conn, event_id, *booking_id, *occupant)?,
        BookingChange::UpdateGroupPolicy { policy } => {
            update_group_policy(conn, group_id, policy)?;
        }
        BookingChange::AddResponsibleAdmin { member_id } => {
            diesel::insert_or_ignore_into(shift_group_admins::table)
                .values((
                    shift_group_admins::shift_group_id.eq(group_id.value()),
                    shift_group_admins::member_id.eq(member_id.value()),
                ))
                .execute(conn)?;
        }
        BookingChange::RemoveResponsibleAdmin { member_id } => {
            diesel::delete(
                shift_group_admins::table
                    .filter(shift_group_admins::shift_group_id.eq(group_id.value()))
                    .filter(shift_group_admins::member_id.eq(member_id.value())),
            )
            .execute(conn)?;
        }
    }
    Ok(())
}

fn ensure_instance_found(
    affected: usize,
    instance_id: ShiftInstanceId,
) -> Result<(), PersistenceError> {
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "shift instance {instance_id}"
        )));
    }
    Ok(())
}

fn insert_instance(
    conn: &mut SqliteConnection,
    event_id: EventId,
    definition_id: ShiftDefinitionId,
    window: &ShiftWindow,
    responsible: Option<MemberId>,
    channel: Option<&str>,
) -> Result<ShiftInstanceId, PersistenceError> {
    diesel::insert_into(shift_instances::table)
        .values((
            shift_instances::event_id.eq(event_id.value()),
            shift_instances::shift_definition_id.eq(definition_id.value()),
            shift_instances::start_time.eq(format_timestamp(window.start())?),
            shift_instances::end_time.eq(format_timestamp(window.end())?),
            shift_instances::interval_seconds.eq(window.interval().whole_seconds()),
            shift_instances::responsible_member_id.eq(responsible.map(MemberId::value)),
            shift_instances::channel.eq(channel),
            shift_instances::bookings_disabled.eq(0),
        ))
        .execute(conn)?;

    let instance_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        instance_id,
        definition_id = definition_id.value(),
        "Created shift instance"
    );
    Ok(ShiftInstanceId::new(instance_id))
}

fn insert_slots(
    conn: &mut SqliteConnection,
    event_id: EventId,
    instance_id: ShiftInstanceId,
    slots: &[SlotInterval],
) -> Result<usize, PersistenceError> {
    for slot in slots {
        diesel::insert_into(shift_bookings::table)
            .values((
                shift_bookings::shift_instance_id.eq(instance_id.value()),
                shift_bookings::event_id.eq(event_id.value()),
                shift_bookings::slot_start.eq(format_timestamp(slot.start)?),
                shift_bookings::slot_end.eq(format_timestamp(slot.end)?),
                shift_bookings::member_id.eq(None::<i64>),
            ))
            .execute(conn)
            .map_err(|err| match PersistenceError::from(err) {
                PersistenceError::UniqueViolation(_) => {
                    PersistenceError::SlotAlreadyTaken { booking_id: None }
                }
                other => other,
            })?;
    }
    debug!(
        instance_id = instance_id.value(),
        count = slots.len(),
        "Inserted slot rows"
    );
    Ok(slots.len())
}

fn booking_exists(
    conn: &mut SqliteConnection,
    event_id: EventId,
    booking_id: ShiftBookingId,
) -> Result<bool, PersistenceError> {
    let count: i64 = shift_bookings::table
        .filter(shift_bookings::booking_id.eq(booking_id.value()))
        .filter(shift_bookings::event_id.eq(event_id.value()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

fn claim_slot(
    conn: &mut SqliteConnection,
    event_id: EventId,
    booking_id: ShiftBookingId,
    member_id: MemberId,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        shift_bookings::table
            .filter(shift_bookings::booking_id.eq(booking_id.value()))
            .filter(shift_bookings::event_id.eq(event_id.value()))
            .filter(shift_bookings::member_id.is_null()),
    )
    .set(shift_bookings::member_id.eq(Some(member_id.value())))
    .execute(conn)?;

    if updated == 0 {
        if booking_exists(conn, event_id, booking_id)? {
            warn!(
                booking_id = booking_id.value(),
                member_id = member_id.value(),
                "Lost booking race; slot already taken"
            );
            return Err(PersistenceError::SlotAlreadyTaken {
                booking_id: Some(booking_id),
            });
        }
        return Err(PersistenceError::BookingNotFound(booking_id));
    }
    info!(
        booking_id = booking_id.value(),
        member_id = member_id.value(),
        "Claimed slot"
    );
    Ok(())
}

fn release_slot(
    conn: &mut SqliteConnection,
    event_id: EventId,
    booking_id: ShiftBookingId,
    occupant: MemberId,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        shift_bookings::table
            .filter(shift_bookings::booking_id.eq(booking_id.value()))
            .filter(shift_bookings::event_id.eq(event_id.value()))
            .filter(shift_bookings::member_id.eq(occupant.value())),
    )
    .set(shift_bookings::member_id.eq(None::<i64>))
    .execute(conn)?;

    if updated == 0 {
        if booking_exists(conn, event_id, booking_id)? {
            warn!(
                booking_id = booking_id.value(),
                occupant = occupant.value(),
                "Release lost a race; occupant changed"
            );
            return Err(PersistenceError::BookingChanged(booking_id));
        }
        return Err(PersistenceError::BookingNotFound(booking_id));
    }
    info!(
        booking_id = booking_id.value(),
        occupant = occupant.value(),
        "Released slot"
    );
    Ok(())
}

fn delete_open_slots(
    conn: &mut SqliteConnection,
    event_id: EventId,
    booking_ids: &[ShiftBookingId],
) -> Result<usize, PersistenceError> {
    let ids: Vec<i64> = booking_ids.iter().map(|id| id.value()).collect();
    let deleted: usize = diesel::delete(
        shift_bookings::table
            .filter(shift_bookings::booking_id.eq_any(&ids))
            .filter(shift_bookings::event_id.eq(event_id.value()))
            .filter(shift_bookings::member_id.is_null()),
    )
    .execute(conn)?;

    if deleted != ids.len() {
        let remaining: Option<i64> = shift_bookings::table
            .filter(shift_bookings::booking_id.eq_any(&ids))
            .select(shift_bookings::booking_id)
            .first(conn)
            .optional()?;
        return match remaining.or_else(|| ids.first().copied()) {
            Some(id) => {
                warn!(booking_id = id, "Open slot changed before deletion");
                Err(PersistenceError::BookingChanged(ShiftBookingId::new(id)))
            }
            None => Ok(deleted),
        };
    }
    Ok(deleted)
}

fn update_group_policy(
    conn: &mut SqliteConnection,
    group_id: ShiftGroupId,
    policy: &ShiftGroupPolicy,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        shift_groups::table.filter(shift_groups::shift_group_id.eq(group_id.value())),
    )
    .set((
        shift_groups::enabled.eq(flag(policy.enabled)),
        shift_groups::require_distinct_times.eq(flag(policy.require_distinct_times)),
        shift_groups::required_for_ticket_reservation
            .eq(flag(policy.required_for_ticket_reservation)),
        shift_groups::show_link_in_event.eq(flag(policy.show_link_in_event)),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("shift group {group_id}")));
    }
    info!(group_id = group_id.value(), enabled = policy.enabled, "Updated shift group policy");
    Ok(())
}
