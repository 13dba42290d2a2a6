// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift group, definition, instance and booking queries.
//!
//! `load_group_state` is the single read the rule layer works on; handlers
//! never assemble a `ShiftGroupState` by hand.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nakki::ShiftGroupState;
use nakki_domain::{
    EventId, MemberId, ShiftBooking, ShiftBookingId, ShiftDefinition, ShiftDefinitionId,
    ShiftGroup, ShiftGroupId, ShiftInstance, ShiftInstanceId,
};
use tracing::debug;

use crate::data_models::{ShiftBookingRow, ShiftDefinitionRow, ShiftGroupRow, ShiftInstanceRow};
use crate::diesel_schema::{
    shift_bookings, shift_definitions, shift_group_admins, shift_groups, shift_instances,
};
use crate::error::PersistenceError;
use crate::queries::events::get_event;

/// Retrieves the shift group of an event, including its responsible admins.
///
/// # Errors
///
/// Returns `PersistenceError::ShiftGroupNotFound` if the event has no group.
pub fn get_shift_group(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<ShiftGroup, PersistenceError> {
    let row: ShiftGroupRow = shift_groups::table
        .filter(shift_groups::event_id.eq(event_id.value()))
        .select(ShiftGroupRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ShiftGroupNotFound(event_id))?;

    let admins: Vec<i64> = shift_group_admins::table
        .filter(shift_group_admins::shift_group_id.eq(row.shift_group_id))
        .select(shift_group_admins::member_id)
        .order(shift_group_admins::member_id.asc())
        .load(conn)?;

    Ok(ShiftGroup {
        id: ShiftGroupId::new(row.shift_group_id),
        event_id: EventId::new(row.event_id),
        policy: row.policy(),
        responsible_admins: admins.into_iter().map(MemberId::new).collect(),
    })
}

/// Loads the given shift definitions, ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_definitions(
    conn: &mut SqliteConnection,
    definition_ids: &[ShiftDefinitionId],
) -> Result<Vec<ShiftDefinition>, PersistenceError> {
    if definition_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = definition_ids.iter().copied().map(ShiftDefinitionId::value).collect();
    let rows: Vec<ShiftDefinitionRow> = shift_definitions::table
        .filter(shift_definitions::shift_definition_id.eq_any(ids))
        .select(ShiftDefinitionRow::as_select())
        .order(shift_definitions::shift_definition_id.asc())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(ShiftDefinitionRow::into_definition)
        .collect())
}

/// Retrieves a shift definition.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such definition exists.
pub fn get_definition(
    conn: &mut SqliteConnection,
    definition_id: ShiftDefinitionId,
) -> Result<ShiftDefinition, PersistenceError> {
    shift_definitions::table
        .filter(shift_definitions::shift_definition_id.eq(definition_id.value()))
        .select(ShiftDefinitionRow::as_select())
        .first(conn)
        .optional()?
        .map(ShiftDefinitionRow::into_definition)
        .ok_or_else(|| PersistenceError::NotFound(format!("shift definition {definition_id}")))
}

/// Counts booking rows belonging to instances of a definition.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_bookings_for_definition(
    conn: &mut SqliteConnection,
    definition_id: ShiftDefinitionId,
) -> Result<usize, PersistenceError> {
    let count: i64 = shift_bookings::table
        .inner_join(shift_instances::table)
        .filter(shift_instances::shift_definition_id.eq(definition_id.value()))
        .count()
        .get_result(conn)?;
    usize::try_from(count)
        .map_err(|e| PersistenceError::QueryFailed(format!("booking count {count}: {e}")))
}

fn load_instances(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<ShiftInstance>, PersistenceError> {
    let rows: Vec<ShiftInstanceRow> = shift_instances::table
        .filter(shift_instances::event_id.eq(event_id.value()))
        .select(ShiftInstanceRow::as_select())
        .order(shift_instances::shift_instance_id.asc())
        .load(conn)?;
    rows.into_iter().map(ShiftInstanceRow::into_instance).collect()
}

fn load_bookings(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<ShiftBooking>, PersistenceError> {
    let rows: Vec<ShiftBookingRow> = shift_bookings::table
        .filter(shift_bookings::event_id.eq(event_id.value()))
        .select(ShiftBookingRow::as_select())
        .order(shift_bookings::booking_id.asc())
        .load(conn)?;
    let mut bookings: Vec<ShiftBooking> = rows
        .into_iter()
        .map(ShiftBookingRow::into_booking)
        .collect::<Result<_, _>>()?;
    bookings.sort_by_key(|booking| (booking.shift_instance_id, booking.slot_start));
    Ok(bookings)
}

/// Loads everything the rule layer needs about one event's shift group.
///
/// Only the definitions referenced by the group's instances are loaded.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` or
/// `PersistenceError::ShiftGroupNotFound` if either is missing, or an error
/// if a stored row cannot be reconstructed.
pub fn load_group_state(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<ShiftGroupState, PersistenceError> {
    let event = get_event(conn, event_id)?;
    let group: ShiftGroup = get_shift_group(conn, event_id)?;
    let instances: Vec<ShiftInstance> = load_instances(conn, event_id)?;
    let mut referenced: Vec<ShiftDefinitionId> = instances
        .iter()
        .map(|instance| instance.definition_id)
        .collect();
    referenced.sort_unstable();
    referenced.dedup();
    let definitions: Vec<ShiftDefinition> = load_definitions(conn, &referenced)?;
    let bookings: Vec<ShiftBooking> = load_bookings(conn, event_id)?;

    debug!(
        event_id = event_id.value(),
        instances = instances.len(),
        bookings = bookings.len(),
        "Loaded shift group state"
    );

    Ok(ShiftGroupState {
        event,
        group,
        definitions,
        instances,
        bookings,
    })
}

/// Retrieves a single booking row.
///
/// # Errors
///
/// Returns `PersistenceError::BookingNotFound` if no such row exists.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: ShiftBookingId,
) -> Result<ShiftBooking, PersistenceError> {
    shift_bookings::table
        .filter(shift_bookings::booking_id.eq(booking_id.value()))
        .select(ShiftBookingRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::BookingNotFound(booking_id))?
        .into_booking()
}

/// Retrieves the event a shift instance belongs to.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such instance exists.
pub fn get_instance_event(
    conn: &mut SqliteConnection,
    instance_id: ShiftInstanceId,
) -> Result<EventId, PersistenceError> {
    shift_instances::table
        .filter(shift_instances::shift_instance_id.eq(instance_id.value()))
        .select(shift_instances::event_id)
        .first::<i64>(conn)
        .optional()?
        .map(EventId::new)
        .ok_or_else(|| PersistenceError::NotFound(format!("shift instance {instance_id}")))
}

/// Lists every row a member occupies, across all events, ordered by slot start.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_member(
    conn: &mut SqliteConnection,
    member_id: MemberId,
) -> Result<Vec<ShiftBooking>, PersistenceError> {
    let rows: Vec<ShiftBookingRow> = shift_bookings::table
        .filter(shift_bookings::member_id.eq(member_id.value()))
        .select(ShiftBookingRow::as_select())
        .load(conn)?;
    let mut bookings: Vec<ShiftBooking> = rows
        .into_iter()
        .map(ShiftBookingRow::into_booking)
        .collect::<Result<_, _>>()?;
    bookings.sort_by_key(|booking| booking.slot_start);
    Ok(bookings)
}
