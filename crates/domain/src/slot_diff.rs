// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of materialized booking rows with a shift window.
//!
//! ## Invariants
//!
//! - A row is kept iff its `[start, end)` exactly matches a target slot
//! - Open rows outside the target grid are deleted
//! - Occupied rows are never deleted; rows outside the grid are retained
//!   and reported so the organizer can resolve them
//! - A target slot whose start is taken by a retained row is not created,
//!   since slot starts are unique per shift instance
//!
//! ## Usage
//!
//! This logic is used by:
//! - Shift creation (every target slot is created)
//! - Rescheduling (start, end or interval changes)
//! - Trailing slot removal

use crate::error::DomainError;
use crate::occupancy::SlotInterval;
use crate::types::{MemberId, ShiftBooking, ShiftBookingId, ShiftDefinition, ShiftWindow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use time::OffsetDateTime;

/// An occupied row left in place outside the target grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedSlot {
    /// The retained row.
    pub booking_id: ShiftBookingId,
    /// The row's slot.
    pub slot: SlotInterval,
    /// The member holding it.
    pub occupant: MemberId,
    /// Whether this row prevented a target slot with the same start
    /// from being created.
    pub blocks_target: bool,
}

/// The row changes needed to bring a shift instance onto its window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotDiff {
    /// Target slots with no matching row, ordered by start.
    pub to_create: Vec<SlotInterval>,
    /// Open rows outside the target grid.
    pub to_delete: Vec<ShiftBookingId>,
    /// Occupied rows outside the target grid.
    pub retained: Vec<RetainedSlot>,
}

impl SlotDiff {
    /// Returns true if no row changes are needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty() && self.retained.is_empty()
    }
}

/// Computes the row changes for one shift instance.
///
/// `existing` must contain the rows of that instance only.
#[must_use]
pub fn diff_slots(window: &ShiftWindow, existing: &[ShiftBooking]) -> SlotDiff {
    let targets: Vec<SlotInterval> = window.slots().collect();
    let target_set: HashSet<SlotInterval> = targets.iter().copied().collect();

    let mut diff = SlotDiff::default();
    let mut matched: HashSet<SlotInterval> = HashSet::new();
    let mut blocked_starts: HashSet<OffsetDateTime> = HashSet::new();

    for booking in existing {
        let slot: SlotInterval = booking.interval();
        if target_set.contains(&slot) {
            matched.insert(slot);
            continue;
        }
        match booking.occupant {
            None => diff.to_delete.push(booking.id),
            Some(occupant) => {
                let blocks_target: bool = targets.iter().any(|t| t.start == slot.start);
                if blocks_target {
                    blocked_starts.insert(slot.start);
                }
                diff.retained.push(RetainedSlot {
                    booking_id: booking.id,
                    slot,
                    occupant,
                    blocks_target,
                });
            }
        }
    }

    diff.to_create = targets
        .into_iter()
        .filter(|slot| !matched.contains(slot) && !blocked_starts.contains(&slot.start))
        .collect();
    diff.retained.sort_by_key(|retained| retained.slot.start);
    diff
}

/// Selects the last `count` slots of a shift instance for removal.
///
/// Only rows on the current window's grid count as slots; occupied rows
/// retained outside the window by an earlier reschedule are left alone.
/// Returns the ids to delete and the new window end (the end of the last
/// remaining slot).
///
/// # Errors
///
/// Returns `DomainError::InvalidSlotCount` if `count` is zero or would leave
/// no slot on the grid, and `DomainError::OccupiedTrailingSlot` if any
/// selected slot is occupied.
pub fn plan_trailing_slot_removal(
    window: &ShiftWindow,
    existing: &[ShiftBooking],
    count: usize,
) -> Result<(Vec<ShiftBookingId>, OffsetDateTime), DomainError> {
    let mut on_grid: Vec<&ShiftBooking> = existing
        .iter()
        .filter(|booking| window.is_grid_slot(booking.slot_start, booking.slot_end))
        .collect();
    let available: usize = on_grid.len();
    if count == 0 || count >= available {
        return Err(DomainError::InvalidSlotCount {
            requested: count,
            available,
        });
    }

    on_grid.sort_by_key(|booking| booking.slot_start);
    let (remaining, trailing) = on_grid.split_at(available - count);

    if let Some(occupied) = trailing.iter().find(|booking| !booking.is_open()) {
        return Err(DomainError::OccupiedTrailingSlot {
            booking_id: occupied.id,
        });
    }

    let new_end: OffsetDateTime = remaining
        .iter()
        .map(|booking| booking.slot_end)
        .max()
        .ok_or(DomainError::InvalidSlotCount {
            requested: count,
            available,
        })?;

    Ok((trailing.iter().map(|booking| booking.id).collect(), new_end))
}

/// Checks that a shift definition has no bookings referencing it.
///
/// # Errors
///
/// Returns `DomainError::ShiftDefinitionInUse` if `booking_count > 0`.
pub fn ensure_definition_deletable(
    definition: &ShiftDefinition,
    booking_count: usize,
) -> Result<(), DomainError> {
    if booking_count > 0 {
        return Err(DomainError::ShiftDefinitionInUse {
            shift_definition_id: definition.id,
            booking_count,
        });
    }
    Ok(())
}
