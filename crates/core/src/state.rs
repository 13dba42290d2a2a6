// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nakki_domain::{
    DomainError, EventId, EventSchedule, MemberId, OccupancyTracker, RetainedSlot, ShiftBooking,
    ShiftBookingId, ShiftDefinition, ShiftDefinitionId, ShiftGroup, ShiftGroupId, ShiftGroupPolicy,
    ShiftInstance, ShiftInstanceId, ShiftWindow, SlotInterval,
};

/// Everything the rules need about one event's shift group, loaded in a
/// single read.
///
/// Instances and bookings reference each other by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftGroupState {
    /// The owning event's temporal attributes.
    pub event: EventSchedule,
    /// The group and its policy.
    pub group: ShiftGroup,
    /// The shift definitions referenced by the instances, plus any the
    /// caller included for a pending command.
    pub definitions: Vec<ShiftDefinition>,
    /// All shift instances of the event.
    pub instances: Vec<ShiftInstance>,
    /// All booking rows of the event.
    pub bookings: Vec<ShiftBooking>,
}

impl ShiftGroupState {
    /// Looks up a shift instance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ShiftInstanceNotFound` if the group has no such instance.
    pub fn instance(&self, id: ShiftInstanceId) -> Result<&ShiftInstance, DomainError> {
        self.instances
            .iter()
            .find(|instance| instance.id == id)
            .ok_or(DomainError::ShiftInstanceNotFound(id))
    }

    /// Looks up a shift definition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ShiftDefinitionNotFound` if the definition was not loaded.
    pub fn definition(&self, id: ShiftDefinitionId) -> Result<&ShiftDefinition, DomainError> {
        self.definitions
            .iter()
            .find(|definition| definition.id == id)
            .ok_or(DomainError::ShiftDefinitionNotFound(id))
    }

    /// Adds a definition unless it is already present.
    ///
    /// Scheduling a definition the group has not used yet needs it in the
    /// snapshot.
    pub fn include_definition(&mut self, definition: ShiftDefinition) {
        if self.definition(definition.id).is_err() {
            self.definitions.push(definition);
        }
    }

    /// Looks up a booking row.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BookingNotFound` if the group has no such row.
    pub fn booking(&self, id: ShiftBookingId) -> Result<&ShiftBooking, DomainError> {
        self.bookings
            .iter()
            .find(|booking| booking.id == id)
            .ok_or(DomainError::BookingNotFound(id))
    }

    /// Returns the rows of one instance, ordered by slot start.
    #[must_use]
    pub fn bookings_for_instance(&self, id: ShiftInstanceId) -> Vec<ShiftBooking> {
        let mut rows: Vec<ShiftBooking> = self
            .bookings
            .iter()
            .filter(|booking| booking.shift_instance_id == id)
            .cloned()
            .collect();
        rows.sort_by_key(|booking| booking.slot_start);
        rows
    }

    /// Returns an occupancy index over all rows of the group.
    #[must_use]
    pub fn occupancy(&self) -> OccupancyTracker<'_> {
        OccupancyTracker::new(&self.bookings)
    }

    /// Returns true if `member` is responsible for at least one instance.
    #[must_use]
    pub fn is_responsible_for_any(&self, member: MemberId) -> bool {
        self.instances
            .iter()
            .any(|instance| instance.responsible == Some(member))
    }
}

/// A description of the transition that was applied, used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The command name.
    pub name: String,
    /// Human-readable details.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// One storage-level change produced by a transition.
///
/// Changes of a single transition are executed in order inside one
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingChange {
    /// Insert a shift instance and one open row per slot.
    CreateInstance {
        /// The definition being scheduled.
        definition_id: ShiftDefinitionId,
        /// The validated window.
        window: ShiftWindow,
        /// Responsible member.
        responsible: Option<MemberId>,
        /// Chat channel.
        channel: Option<String>,
        /// Slots to materialize.
        slots: Vec<SlotInterval>,
    },
    /// Store a new window on an instance.
    UpdateInstanceWindow {
        /// The instance.
        instance_id: ShiftInstanceId,
        /// The new window.
        window: ShiftWindow,
    },
    /// Store new details on an instance.
    UpdateInstanceDetails {
        /// The instance.
        instance_id: ShiftInstanceId,
        /// Responsible member.
        responsible: Option<MemberId>,
        /// Chat channel.
        channel: Option<String>,
        /// Whether bookings are disabled.
        bookings_disabled: bool,
    },
    /// Delete an instance; its rows cascade.
    DeleteInstance {
        /// The instance.
        instance_id: ShiftInstanceId,
    },
    /// Insert open rows.
    InsertSlots {
        /// The instance.
        instance_id: ShiftInstanceId,
        /// Slots to materialize.
        slots: Vec<SlotInterval>,
    },
    /// Delete rows that must still be open.
    DeleteOpenSlots {
        /// Rows to delete.
        booking_ids: Vec<ShiftBookingId>,
    },
    /// Set the occupant of a row that must still be open.
    ClaimSlot {
        /// The row.
        booking_id: ShiftBookingId,
        /// The new occupant.
        member_id: MemberId,
    },
    /// Clear the occupant of a row that must still be held by `occupant`.
    ReleaseSlot {
        /// The row.
        booking_id: ShiftBookingId,
        /// The occupant at read time.
        occupant: MemberId,
    },
    /// Store new policy flags.
    UpdateGroupPolicy {
        /// The new policy.
        policy: ShiftGroupPolicy,
    },
    /// Add a responsible admin.
    AddResponsibleAdmin {
        /// The member.
        member_id: MemberId,
    },
    /// Remove a responsible admin.
    RemoveResponsibleAdmin {
        /// The member.
        member_id: MemberId,
    },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The event the changes belong to.
    pub event_id: EventId,
    /// The shift group the changes belong to.
    pub group_id: ShiftGroupId,
    /// What was done.
    pub action: Action,
    /// Storage changes to execute, in order.
    pub changes: Vec<BookingChange>,
    /// Occupied rows left outside a rescheduled window.
    pub warnings: Vec<RetainedSlot>,
}

impl TransitionResult {
    pub(crate) const fn new(
        state: &ShiftGroupState,
        action: Action,
        changes: Vec<BookingChange>,
    ) -> Self {
        Self {
            event_id: state.event.id,
            group_id: state.group.id,
            action,
            changes,
            warnings: Vec::new(),
        }
    }
}
