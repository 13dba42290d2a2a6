// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot occupancy lookups over a shift group's booking rows.
//!
//! An existing row with no occupant is an open slot. A slot start with no
//! row at all is a consistency bug and reported as `SlotNotFound`.

use crate::error::DomainError;
use crate::types::{MemberId, ShiftBooking, ShiftInstanceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotInterval {
    /// Inclusive start.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Exclusive end.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl SlotInterval {
    /// Creates an interval.
    #[must_use]
    pub const fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    /// Returns true if the two intervals share any instant.
    ///
    /// A slot ending exactly when another begins does not overlap it.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Indexed view of booking rows keyed by `(shift instance, slot start)`.
#[derive(Debug, Clone)]
pub struct OccupancyTracker<'a> {
    bookings: &'a [ShiftBooking],
    by_slot: HashMap<(ShiftInstanceId, OffsetDateTime), &'a ShiftBooking>,
}

impl<'a> OccupancyTracker<'a> {
    /// Indexes the given booking rows.
    #[must_use]
    pub fn new(bookings: &'a [ShiftBooking]) -> Self {
        let by_slot = bookings
            .iter()
            .map(|booking| ((booking.shift_instance_id, booking.slot_start), booking))
            .collect();
        Self { bookings, by_slot }
    }

    /// Returns the booking row for a slot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotNotFound` if no row exists for the slot start.
    pub fn booking_at(
        &self,
        shift_instance_id: ShiftInstanceId,
        slot_start: OffsetDateTime,
    ) -> Result<&'a ShiftBooking, DomainError> {
        self.by_slot
            .get(&(shift_instance_id, slot_start))
            .copied()
            .ok_or(DomainError::SlotNotFound {
                shift_instance_id,
                slot_start,
            })
    }

    /// Returns who occupies a slot; `None` for an open slot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotNotFound` if no row exists for the slot start.
    pub fn occupant_of(
        &self,
        shift_instance_id: ShiftInstanceId,
        slot_start: OffsetDateTime,
    ) -> Result<Option<MemberId>, DomainError> {
        Ok(self.booking_at(shift_instance_id, slot_start)?.occupant)
    }

    /// Returns true if the slot exists and nobody occupies it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotNotFound` if no row exists for the slot start.
    pub fn is_free(
        &self,
        shift_instance_id: ShiftInstanceId,
        slot_start: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        Ok(self.occupant_of(shift_instance_id, slot_start)?.is_none())
    }

    /// Returns true if `member` holds a slot in another shift instance
    /// overlapping `candidate`.
    #[must_use]
    pub fn is_member_booked_elsewhere_overlapping(
        &self,
        member: MemberId,
        candidate: &SlotInterval,
        excluding: ShiftInstanceId,
    ) -> bool {
        self.bookings.iter().any(|booking| {
            booking.occupant == Some(member)
                && booking.shift_instance_id != excluding
                && booking.interval().overlaps(candidate)
        })
    }

    /// Returns every row held by `member`, ordered by slot start.
    #[must_use]
    pub fn bookings_of(&self, member: MemberId) -> Vec<&'a ShiftBooking> {
        let mut held: Vec<&ShiftBooking> = self
            .bookings
            .iter()
            .filter(|booking| booking.occupant == Some(member))
            .collect();
        held.sort_by_key(|booking| booking.slot_start);
        held
    }
}
