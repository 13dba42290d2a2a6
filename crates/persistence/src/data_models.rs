// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversion into domain values.
//!
//! Timestamps are stored as RFC 3339 text normalized to UTC, so equal
//! instants always produce equal strings and the
//! `UNIQUE (shift_instance_id, slot_start)` constraint holds on instants.

use diesel::prelude::*;
use nakki::MemberContext;
use nakki_domain::{
    BilingualText, EventId, EventSchedule, MemberId, ShiftBooking, ShiftBookingId,
    ShiftDefinition, ShiftDefinitionId, ShiftGroupPolicy, ShiftInstance, ShiftInstanceId,
    ShiftWindow, SignupWindow,
};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    events, members, sessions, shift_bookings, shift_definitions, shift_groups, shift_instances,
};
use crate::error::PersistenceError;

/// Formats an instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted as RFC 3339.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("formatting {instant}: {e}")))
}

/// Parses a stored instant.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("parsing '{value}': {e}")))
}

fn format_optional(instant: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    instant.map(format_timestamp).transpose()
}

fn parse_optional(value: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

pub(crate) const fn flag(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

/// Column values of an event row, formatted for storage.
pub(crate) struct EventColumns {
    pub publish_date: Option<String>,
    pub event_date: String,
    pub until: Option<String>,
    pub signup_start: Option<String>,
    pub signup_end: Option<String>,
}

impl EventColumns {
    pub(crate) fn from_schedule(schedule: &EventSchedule) -> Result<Self, PersistenceError> {
        Ok(Self {
            publish_date: format_optional(schedule.publish_date)?,
            event_date: format_timestamp(schedule.event_date)?,
            until: format_optional(schedule.until)?,
            signup_start: format_optional(schedule.signup.start)?,
            signup_end: format_optional(schedule.signup.end)?,
        })
    }
}

/// Diesel Queryable struct for event rows.
///
/// The event name column is not selected; scheduling never reads it.
#[derive(Queryable, Selectable)]
#[diesel(table_name = events)]
pub(crate) struct EventRow {
    pub event_id: i64,
    pub publish_date: Option<String>,
    pub event_date: String,
    pub until: Option<String>,
    pub cancelled: i32,
    pub published_flag: i32,
    pub signup_enabled: i32,
    pub signup_start: Option<String>,
    pub signup_end: Option<String>,
}

impl EventRow {
    pub(crate) fn into_schedule(self) -> Result<EventSchedule, PersistenceError> {
        Ok(EventSchedule {
            id: EventId::new(self.event_id),
            publish_date: parse_optional(self.publish_date.as_deref())?,
            event_date: parse_timestamp(&self.event_date)?,
            until: parse_optional(self.until.as_deref())?,
            cancelled: self.cancelled != 0,
            published_flag: self.published_flag != 0,
            signup: SignupWindow {
                enabled: self.signup_enabled != 0,
                start: parse_optional(self.signup_start.as_deref())?,
                end: parse_optional(self.signup_end.as_deref())?,
            },
        })
    }
}

/// Diesel Queryable struct for member rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = members)]
pub(crate) struct MemberRow {
    pub member_id: i64,
    pub display_name: String,
    pub is_admin: i32,
    pub is_active_member: i32,
}

impl MemberRow {
    pub(crate) fn into_context(self) -> MemberContext {
        MemberContext {
            member_id: MemberId::new(self.member_id),
            display_name: self.display_name,
            is_admin: self.is_admin != 0,
            is_active_member: self.is_active_member != 0,
        }
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub(crate) struct SessionRow {
    pub member_id: i64,
    pub expires_at: String,
}

/// Diesel Queryable struct for shift group rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_groups)]
pub(crate) struct ShiftGroupRow {
    pub shift_group_id: i64,
    pub event_id: i64,
    pub enabled: i32,
    pub require_distinct_times: i32,
    pub required_for_ticket_reservation: i32,
    pub show_link_in_event: i32,
}

impl ShiftGroupRow {
    pub(crate) const fn policy(&self) -> ShiftGroupPolicy {
        ShiftGroupPolicy {
            enabled: self.enabled != 0,
            require_distinct_times: self.require_distinct_times != 0,
            required_for_ticket_reservation: self.required_for_ticket_reservation != 0,
            show_link_in_event: self.show_link_in_event != 0,
        }
    }
}

/// Diesel Queryable struct for shift definition rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_definitions)]
pub(crate) struct ShiftDefinitionRow {
    pub shift_definition_id: i64,
    pub name_fi: String,
    pub name_en: String,
    pub description_fi: String,
    pub description_en: String,
    pub active_members_only: i32,
}

impl ShiftDefinitionRow {
    pub(crate) fn into_definition(self) -> ShiftDefinition {
        // Stored names were validated on write.
        ShiftDefinition {
            id: ShiftDefinitionId::new(self.shift_definition_id),
            name: BilingualText {
                fi: self.name_fi,
                en: self.name_en,
            },
            description: BilingualText {
                fi: self.description_fi,
                en: self.description_en,
            },
            active_members_only: self.active_members_only != 0,
        }
    }
}

/// Diesel Queryable struct for shift instance rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_instances)]
pub(crate) struct ShiftInstanceRow {
    pub shift_instance_id: i64,
    pub event_id: i64,
    pub shift_definition_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub interval_seconds: i64,
    pub responsible_member_id: Option<i64>,
    pub channel: Option<String>,
    pub bookings_disabled: i32,
}

impl ShiftInstanceRow {
    pub(crate) fn into_instance(self) -> Result<ShiftInstance, PersistenceError> {
        let window: ShiftWindow = ShiftWindow::new(
            parse_timestamp(&self.start_time)?,
            parse_timestamp(&self.end_time)?,
            Duration::seconds(self.interval_seconds),
        )
        .map_err(|e| {
            PersistenceError::ReconstructionError(format!(
                "shift instance {}: {e}",
                self.shift_instance_id
            ))
        })?;
        Ok(ShiftInstance {
            id: ShiftInstanceId::new(self.shift_instance_id),
            event_id: EventId::new(self.event_id),
            definition_id: ShiftDefinitionId::new(self.shift_definition_id),
            window,
            responsible: self.responsible_member_id.map(MemberId::new),
            channel: self.channel,
            bookings_disabled: self.bookings_disabled != 0,
        })
    }
}

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_bookings)]
pub(crate) struct ShiftBookingRow {
    pub booking_id: i64,
    pub shift_instance_id: i64,
    pub event_id: i64,
    pub slot_start: String,
    pub slot_end: String,
    pub member_id: Option<i64>,
}

impl ShiftBookingRow {
    pub(crate) fn into_booking(self) -> Result<ShiftBooking, PersistenceError> {
        Ok(ShiftBooking::from_stored(
            ShiftBookingId::new(self.booking_id),
            ShiftInstanceId::new(self.shift_instance_id),
            EventId::new(self.event_id),
            parse_timestamp(&self.slot_start)?,
            parse_timestamp(&self.slot_end)?,
            self.member_id.map(MemberId::new),
        ))
    }
}

/// What a persisted transition created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The id of a newly created shift instance.
    pub created_instance: Option<ShiftInstanceId>,
    /// Number of slot rows inserted.
    pub inserted_slots: usize,
    /// Number of slot rows deleted.
    pub deleted_slots: usize,
}
