// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nakki_domain::{
    MemberId, ShiftBookingId, ShiftDefinitionId, ShiftGroupPolicy, ShiftInstanceId,
};
use time::{Duration, OffsetDateTime};

/// A command represents user intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Schedule a shift definition for the event.
    CreateShiftInstance {
        /// The definition to schedule.
        definition_id: ShiftDefinitionId,
        /// Window start.
        start: OffsetDateTime,
        /// Window end.
        end: OffsetDateTime,
        /// Slot length.
        interval: Duration,
        /// Responsible member.
        responsible: Option<MemberId>,
        /// Chat channel.
        channel: Option<String>,
    },
    /// Change the window of a shift; slots are diffed against existing rows.
    RescheduleShiftInstance {
        /// The shift.
        instance_id: ShiftInstanceId,
        /// New window start.
        start: OffsetDateTime,
        /// New window end.
        end: OffsetDateTime,
        /// New slot length.
        interval: Duration,
    },
    /// Change the responsible, channel or bookings-disabled flag.
    UpdateShiftDetails {
        /// The shift.
        instance_id: ShiftInstanceId,
        /// Responsible member.
        responsible: Option<MemberId>,
        /// Chat channel.
        channel: Option<String>,
        /// Whether further bookings are disabled.
        bookings_disabled: bool,
    },
    /// Delete a shift and all of its rows.
    DeleteShiftInstance {
        /// The shift.
        instance_id: ShiftInstanceId,
    },
    /// Remove the last `count` open slots of a shift.
    RemoveTrailingSlots {
        /// The shift.
        instance_id: ShiftInstanceId,
        /// Number of slots to remove.
        count: usize,
    },
    /// Book a slot for the acting member.
    ClaimSlot {
        /// The shift.
        instance_id: ShiftInstanceId,
        /// The slot start.
        slot_start: OffsetDateTime,
    },
    /// Clear the occupant of a slot.
    ReleaseSlot {
        /// The slot.
        booking_id: ShiftBookingId,
    },
    /// Book a slot on behalf of a member.
    AssignSlot {
        /// The slot.
        booking_id: ShiftBookingId,
        /// The member receiving the slot.
        member_id: MemberId,
    },
    /// Replace the group policy flags.
    UpdateGroupPolicy {
        /// The new policy.
        policy: ShiftGroupPolicy,
    },
    /// Grant whole-board management to a member.
    AddResponsibleAdmin {
        /// The member.
        member_id: MemberId,
    },
    /// Revoke whole-board management from a member.
    RemoveResponsibleAdmin {
        /// The member.
        member_id: MemberId,
    },
}

impl Command {
    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateShiftInstance { .. } => "CreateShiftInstance",
            Self::RescheduleShiftInstance { .. } => "RescheduleShiftInstance",
            Self::UpdateShiftDetails { .. } => "UpdateShiftDetails",
            Self::DeleteShiftInstance { .. } => "DeleteShiftInstance",
            Self::RemoveTrailingSlots { .. } => "RemoveTrailingSlots",
            Self::ClaimSlot { .. } => "ClaimSlot",
            Self::ReleaseSlot { .. } => "ReleaseSlot",
            Self::AssignSlot { .. } => "AssignSlot",
            Self::UpdateGroupPolicy { .. } => "UpdateGroupPolicy",
            Self::AddResponsibleAdmin { .. } => "AddResponsibleAdmin",
            Self::RemoveResponsibleAdmin { .. } => "RemoveResponsibleAdmin",
        }
    }
}
