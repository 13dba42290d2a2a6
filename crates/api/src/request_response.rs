// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw values (RFC 3339 strings, plain ids) and are
//! validated in the handlers. Responses carry UTC timestamps.

use nakki::PolicyViolation;
use nakki_domain::{
    EventId, EventPhase, MemberId, RetainedSlot, ShiftBooking, ShiftBookingId, ShiftGroupPolicy,
    ShiftInstanceId,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Public temporal status of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatusResponse {
    /// The event.
    pub event_id: EventId,
    /// Derived phase.
    pub phase: EventPhase,
    /// Whether the event is live.
    pub is_published: bool,
    /// Whether signups are open.
    pub is_signup_open: bool,
    /// Whether the event is over.
    pub is_finished: bool,
    /// When the event ends.
    #[serde(with = "time::serde::rfc3339")]
    pub effective_end: OffsetDateTime,
    /// Whether the event page links to the shift board.
    pub show_shift_link: bool,
}

/// API request to schedule a shift definition for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShiftInstanceRequest {
    /// The definition to schedule.
    pub definition_id: i64,
    /// Window start (RFC 3339).
    pub start: String,
    /// Window end (RFC 3339).
    pub end: String,
    /// Slot length in minutes.
    pub interval_minutes: i64,
    /// Responsible member.
    #[serde(default)]
    pub responsible_member_id: Option<i64>,
    /// Chat channel.
    #[serde(default)]
    pub channel: Option<String>,
}

/// API request to change a shift's window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleShiftRequest {
    /// Window start (RFC 3339).
    pub start: String,
    /// Window end (RFC 3339).
    pub end: String,
    /// Slot length in minutes.
    pub interval_minutes: i64,
}

/// API request to change a shift's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateShiftDetailsRequest {
    /// Responsible member.
    #[serde(default)]
    pub responsible_member_id: Option<i64>,
    /// Chat channel.
    #[serde(default)]
    pub channel: Option<String>,
    /// Whether further bookings are refused.
    #[serde(default)]
    pub bookings_disabled: bool,
}

/// API request to drop slots from the end of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTrailingSlotsRequest {
    /// How many slots to remove.
    pub count: usize,
}

/// API request to put a member into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSlotRequest {
    /// The member to assign.
    pub member_id: i64,
}

/// API request to replace a shift group's policy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateGroupPolicyRequest {
    /// Whether shift scheduling is active.
    pub enabled: bool,
    /// Whether overlapping bookings across shifts are refused.
    pub require_distinct_times: bool,
    /// Whether a booking is required before reserving a ticket.
    pub required_for_ticket_reservation: bool,
    /// Whether the event page links to the board.
    pub show_link_in_event: bool,
}

impl From<UpdateGroupPolicyRequest> for ShiftGroupPolicy {
    fn from(request: UpdateGroupPolicyRequest) -> Self {
        Self {
            enabled: request.enabled,
            require_distinct_times: request.require_distinct_times,
            required_for_ticket_reservation: request.required_for_ticket_reservation,
            show_link_in_event: request.show_link_in_event,
        }
    }
}

/// API response for a management change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftChangeResponse {
    /// The affected shift.
    pub instance_id: Option<ShiftInstanceId>,
    /// A success message.
    pub message: String,
    /// Occupied slots left outside the new window.
    pub warnings: Vec<RetainedSlot>,
}

/// API response for a change to one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    /// The slot row.
    pub booking_id: ShiftBookingId,
    /// The shift it belongs to.
    pub instance_id: ShiftInstanceId,
    /// Slot start.
    #[serde(with = "time::serde::rfc3339")]
    pub slot_start: OffsetDateTime,
    /// Slot end.
    #[serde(with = "time::serde::rfc3339")]
    pub slot_end: OffsetDateTime,
    /// Occupant after the change.
    pub occupant: Option<MemberId>,
    /// A success message.
    pub message: String,
}

impl BookingResponse {
    pub(crate) fn new(booking: &ShiftBooking, occupant: Option<MemberId>, message: String) -> Self {
        Self {
            booking_id: booking.id,
            instance_id: booking.shift_instance_id,
            slot_start: booking.slot_start,
            slot_end: booking.slot_end,
            occupant,
            message,
        }
    }
}

/// Whether the actor may reserve a ticket for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEligibilityResponse {
    /// The event.
    pub event_id: EventId,
    /// Whether a ticket may be reserved.
    pub eligible: bool,
    /// The reason if not.
    pub reason: Option<PolicyViolation>,
    /// User-readable reason if not.
    pub message: Option<String>,
}

/// One slot held by the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyBookingInfo {
    /// The slot row.
    pub booking_id: ShiftBookingId,
    /// The event.
    pub event_id: EventId,
    /// The shift.
    pub instance_id: ShiftInstanceId,
    /// Slot start.
    #[serde(with = "time::serde::rfc3339")]
    pub slot_start: OffsetDateTime,
    /// Slot end.
    #[serde(with = "time::serde::rfc3339")]
    pub slot_end: OffsetDateTime,
}

impl From<&ShiftBooking> for MyBookingInfo {
    fn from(booking: &ShiftBooking) -> Self {
        Self {
            booking_id: booking.id,
            event_id: booking.event_id,
            instance_id: booking.shift_instance_id,
            slot_start: booking.slot_start,
            slot_end: booking.slot_end,
        }
    }
}

/// API response listing the actor's slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyBookingsResponse {
    /// The actor.
    pub member_id: MemberId,
    /// Held slots, ordered by start.
    pub bookings: Vec<MyBookingInfo>,
}
