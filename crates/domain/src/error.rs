// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{ShiftBookingId, ShiftDefinitionId, ShiftInstanceId};
use time::{Duration, OffsetDateTime};

/// Errors that can occur while evaluating shift scheduling rules.
///
/// `InvalidRange` and `SlotNotFound` indicate programming or data
/// consistency bugs; callers are expected to propagate them as hard
/// failures rather than recover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A time window is empty, reversed, or has a non-positive interval.
    InvalidRange {
        /// The window start.
        start: OffsetDateTime,
        /// The window end.
        end: OffsetDateTime,
        /// The slot interval.
        interval: Duration,
    },
    /// The slot interval is longer than the window it slices.
    InvalidInterval {
        /// The slot interval.
        interval: Duration,
        /// The length of the window.
        span: Duration,
    },
    /// No booking row exists for a slot start within a shift instance.
    SlotNotFound {
        /// The shift instance that was searched.
        shift_instance_id: ShiftInstanceId,
        /// The slot start that has no row.
        slot_start: OffsetDateTime,
    },
    /// A booking does not sit on its shift instance's interval grid.
    MisalignedSlot {
        /// The shift instance the slot was created for.
        shift_instance_id: ShiftInstanceId,
        /// The slot start.
        slot_start: OffsetDateTime,
        /// The slot end.
        slot_end: OffsetDateTime,
    },
    /// A shift definition cannot be deleted while bookings reference it.
    ShiftDefinitionInUse {
        /// The shift definition.
        shift_definition_id: ShiftDefinitionId,
        /// The number of bookings referencing it.
        booking_count: usize,
    },
    /// A trailing slot selected for removal is occupied.
    OccupiedTrailingSlot {
        /// The occupied booking.
        booking_id: ShiftBookingId,
    },
    /// The number of slots requested for removal is out of range.
    InvalidSlotCount {
        /// The requested number of slots.
        requested: usize,
        /// The number of slots currently materialized.
        available: usize,
    },
    /// The shift instance does not exist in the shift group.
    ShiftInstanceNotFound(ShiftInstanceId),
    /// The shift booking does not exist in the shift group.
    BookingNotFound(ShiftBookingId),
    /// The shift definition does not exist.
    ShiftDefinitionNotFound(ShiftDefinitionId),
    /// The timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// The locale code is not supported.
    InvalidLocale(String),
    /// A name or label is empty or invalid.
    InvalidName(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange {
                start,
                end,
                interval,
            } => {
                write!(
                    f,
                    "Invalid time window: start {start} must be before end {end} and interval {interval} must be positive"
                )
            }
            Self::InvalidInterval { interval, span } => {
                write!(
                    f,
                    "Invalid slot interval: {interval} is longer than the window ({span})"
                )
            }
            Self::SlotNotFound {
                shift_instance_id,
                slot_start,
            } => {
                write!(
                    f,
                    "No slot starting at {slot_start} exists for shift {shift_instance_id}"
                )
            }
            Self::MisalignedSlot {
                shift_instance_id,
                slot_start,
                slot_end,
            } => {
                write!(
                    f,
                    "Slot [{slot_start}, {slot_end}) is not aligned with the interval grid of shift {shift_instance_id}"
                )
            }
            Self::ShiftDefinitionInUse {
                shift_definition_id,
                booking_count,
            } => {
                write!(
                    f,
                    "Shift definition {shift_definition_id} cannot be deleted: referenced by {booking_count} bookings"
                )
            }
            Self::OccupiedTrailingSlot { booking_id } => {
                write!(f, "Slot {booking_id} is occupied and cannot be removed")
            }
            Self::InvalidSlotCount {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Cannot remove {requested} slots: shift has {available} slots and at least one must remain"
                )
            }
            Self::ShiftInstanceNotFound(id) => write!(f, "Shift {id} not found"),
            Self::BookingNotFound(id) => write!(f, "Booking {id} not found"),
            Self::ShiftDefinitionNotFound(id) => write!(f, "Shift definition {id} not found"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::InvalidLocale(locale) => write!(f, "Invalid locale: {locale}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
