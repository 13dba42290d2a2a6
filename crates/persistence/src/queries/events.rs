// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use nakki_domain::{EventId, EventSchedule};

use crate::data_models::EventRow;
use crate::diesel_schema::events;
use crate::error::PersistenceError;

/// Retrieves an event schedule.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no such event exists.
pub fn get_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<EventSchedule, PersistenceError> {
    let row: Option<EventRow> = events::table
        .filter(events::event_id.eq(event_id.value()))
        .select(EventRow::as_select())
        .first(conn)
        .optional()?;
    row.ok_or(PersistenceError::EventNotFound(event_id))?
        .into_schedule()
}

/// Lists all events, ordered by event date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_events(conn: &mut SqliteConnection) -> Result<Vec<EventSchedule>, PersistenceError> {
    let rows: Vec<EventRow> = events::table
        .select(EventRow::as_select())
        .load(conn)?;
    let mut schedules: Vec<EventSchedule> = rows
        .into_iter()
        .map(EventRow::into_schedule)
        .collect::<Result<_, _>>()?;
    schedules.sort_by_key(|schedule| schedule.event_date);
    Ok(schedules)
}
