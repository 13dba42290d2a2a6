// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nakki_domain::{EventId, EventSchedule, ShiftGroupId, ShiftGroupPolicy};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{EventColumns, flag};
use crate::diesel_schema::{events, shift_groups};
use crate::error::PersistenceError;

/// Creates an event from a schedule. The schedule's `id` is ignored.
///
/// # Errors
///
/// Returns an error if the event cannot be inserted.
pub fn create_event(
    conn: &mut SqliteConnection,
    name: &str,
    schedule: &EventSchedule,
) -> Result<EventId, PersistenceError> {
    let columns: EventColumns = EventColumns::from_schedule(schedule)?;
    diesel::insert_into(events::table)
        .values((
            events::name.eq(name),
            events::publish_date.eq(columns.publish_date),
            events::event_date.eq(columns.event_date),
            events::until.eq(columns.until),
            events::cancelled.eq(flag(schedule.cancelled)),
            events::published_flag.eq(flag(schedule.published_flag)),
            events::signup_enabled.eq(flag(schedule.signup.enabled)),
            events::signup_start.eq(columns.signup_start),
            events::signup_end.eq(columns.signup_end),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    info!(event_id, name, "Created event");
    Ok(EventId::new(event_id))
}

/// Marks an event cancelled or restores it.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no such event exists.
pub fn set_event_cancelled(
    conn: &mut SqliteConnection,
    event_id: EventId,
    cancelled: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(events::table.filter(events::event_id.eq(event_id.value())))
        .set(events::cancelled.eq(flag(cancelled)))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }
    info!(event_id = event_id.value(), cancelled, "Updated event cancellation");
    Ok(())
}

/// Creates the shift group of an event.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the event already has a
/// group, or `PersistenceError::ForeignKeyViolation` if the event does not
/// exist.
pub fn create_shift_group(
    conn: &mut SqliteConnection,
    event_id: EventId,
    policy: &ShiftGroupPolicy,
) -> Result<ShiftGroupId, PersistenceError> {
    diesel::insert_into(shift_groups::table)
        .values((
            shift_groups::event_id.eq(event_id.value()),
            shift_groups::enabled.eq(flag(policy.enabled)),
            shift_groups::require_distinct_times.eq(flag(policy.require_distinct_times)),
            shift_groups::required_for_ticket_reservation
                .eq(flag(policy.required_for_ticket_reservation)),
            shift_groups::show_link_in_event.eq(flag(policy.show_link_in_event)),
        ))
        .execute(conn)?;

    let group_id: i64 = conn.get_last_insert_rowid()?;
    info!(group_id, event_id = event_id.value(), "Created shift group");
    Ok(ShiftGroupId::new(group_id))
}
