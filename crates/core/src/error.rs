// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nakki_domain::{DomainError, ShiftBookingId};
use serde::{Deserialize, Serialize};

/// Access failures.
///
/// `Unauthenticated` and `Forbidden` are distinct outcomes: the first means
/// no actor context exists, the second means the actor is known but lacks
/// the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No authenticated actor.
    Unauthenticated,
    /// The actor is authenticated but not authorized.
    Forbidden {
        /// The action that was attempted.
        action: String,
    },
    /// The board exists but is not open to members yet.
    BoardClosed,
}

impl AccessError {
    pub(crate) fn forbidden(action: &str) -> Self {
        Self::Forbidden {
            action: action.to_string(),
        }
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Authentication required"),
            Self::Forbidden { action } => write!(f, "Not authorized to {action}"),
            Self::BoardClosed => write!(f, "The shift board is not open"),
        }
    }
}

impl std::error::Error for AccessError {}

/// A booking rule that rejected an action.
///
/// Each variant carries a stable code and a fixed user-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyViolation {
    /// Shift scheduling or the shift itself does not accept bookings.
    BookingsDisabled,
    /// The member already holds an overlapping slot in another shift.
    DistinctTimesConflict,
    /// The shift is restricted to active members.
    ActiveMembersOnly,
    /// A shift booking is required before reserving a ticket.
    ShiftBookingRequiredForTicket,
    /// The member does not hold the slot.
    NotSlotOccupant,
    /// The slot has already started.
    SlotInPast,
}

impl PolicyViolation {
    /// Returns the machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BookingsDisabled => "bookings_disabled",
            Self::DistinctTimesConflict => "distinct_times_conflict",
            Self::ActiveMembersOnly => "active_members_only",
            Self::ShiftBookingRequiredForTicket => "shift_booking_required_for_ticket",
            Self::NotSlotOccupant => "not_slot_occupant",
            Self::SlotInPast => "slot_in_past",
        }
    }

    /// Returns the user-readable reason.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::BookingsDisabled => "Bookings are currently disabled for this shift",
            Self::DistinctTimesConflict => {
                "You already have a shift that overlaps with this time"
            }
            Self::ActiveMembersOnly => "This shift is reserved for active members",
            Self::ShiftBookingRequiredForTicket => {
                "You need to book a shift before reserving a ticket"
            }
            Self::NotSlotOccupant => "You do not hold this slot",
            Self::SlotInPast => "This slot has already started",
        }
    }
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The actor may not perform the action.
    Access(AccessError),
    /// A booking policy rejected the action.
    Policy(PolicyViolation),
    /// Somebody else holds the slot.
    SlotAlreadyTaken {
        /// The contested slot.
        booking_id: ShiftBookingId,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Access(err) => write!(f, "{err}"),
            Self::Policy(violation) => write!(f, "Policy violation: {violation}"),
            Self::SlotAlreadyTaken { booking_id } => {
                write!(f, "Slot {booking_id} is already taken")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<AccessError> for CoreError {
    fn from(err: AccessError) -> Self {
        Self::Access(err)
    }
}

impl From<PolicyViolation> for CoreError {
    fn from(violation: PolicyViolation) -> Self {
        Self::Policy(violation)
    }
}
