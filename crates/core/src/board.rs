// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Framework-free view model of a shift board.
//!
//! The member board lists every shift of the group. The management board
//! lists the shifts the actor may edit. Occupants are visible only on
//! editable columns and on the actor's own slots.

use crate::actor::{Actor, Capability};
use crate::eligibility::{authorize_manage, authorize_view, can_edit_instance, check_can_book_slot};
use crate::error::{CoreError, PolicyViolation};
use crate::state::ShiftGroupState;
use nakki_domain::{
    EventId, EventPhase, LocalTimeFormatter, Locale, MemberId, ShiftBookingId, ShiftDefinition,
    ShiftGroupId, ShiftInstance, ShiftInstanceId, event_phase,
};
use serde::Serialize;
use time::OffsetDateTime;

/// One slot cell of a board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    /// The booking row.
    pub booking_id: ShiftBookingId,
    /// Slot start.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Slot end.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    /// Local wall-clock label, e.g. `10:00-11:00`.
    pub label: String,
    /// Whether somebody holds the slot.
    pub taken: bool,
    /// Who holds the slot, when visible to the actor.
    pub occupant: Option<MemberId>,
    /// Whether the actor holds the slot.
    pub is_mine: bool,
    /// Whether the actor may book the slot now.
    pub can_book: bool,
    /// Why an open slot cannot be booked.
    pub rejection: Option<PolicyViolation>,
}

/// One shift instance rendered as a board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    /// The shift.
    pub instance_id: ShiftInstanceId,
    /// Localized task name.
    pub name: String,
    /// Localized task description.
    pub description: String,
    /// Local day of the shift start, e.g. `Sat 14.06.`.
    pub day: String,
    /// Responsible member.
    pub responsible: Option<MemberId>,
    /// Chat channel.
    pub channel: Option<String>,
    /// Whether bookings are disabled.
    pub bookings_disabled: bool,
    /// Whether the actor may edit this shift.
    pub can_edit: bool,
    /// Slots ordered by start.
    pub slots: Vec<SlotView>,
}

/// The complete board for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// The event.
    pub event_id: EventId,
    /// The shift group.
    pub group_id: ShiftGroupId,
    /// Derived event phase.
    pub phase: EventPhase,
    /// The actor's capability in the group.
    pub capability: Capability,
    /// Whether the actor may open the management board.
    pub can_manage: bool,
    /// Columns ordered by start time, then name.
    pub columns: Vec<BoardColumn>,
}

/// Assembles the member board.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors,
/// `AccessError::BoardClosed` while the board is closed to members, and a
/// domain error if a label cannot be rendered.
pub fn assemble_board(
    actor: &Actor,
    state: &ShiftGroupState,
    now: OffsetDateTime,
    locale: Locale,
    formatter: &LocalTimeFormatter,
) -> Result<BoardView, CoreError> {
    let capability: Capability = authorize_view(actor, state, now)?;
    build(actor, state, now, locale, formatter, capability, |_| true)
}

/// Assembles the management board.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` for anonymous actors,
/// `AccessError::Forbidden` for members without management rights, and a
/// domain error if a label cannot be rendered.
pub fn assemble_management_board(
    actor: &Actor,
    state: &ShiftGroupState,
    now: OffsetDateTime,
    locale: Locale,
    formatter: &LocalTimeFormatter,
) -> Result<BoardView, CoreError> {
    let capability: Capability = authorize_manage(actor, state)?;
    build(actor, state, now, locale, formatter, capability, |instance| {
        can_edit_instance(actor, state, instance)
    })
}

fn build(
    actor: &Actor,
    state: &ShiftGroupState,
    now: OffsetDateTime,
    locale: Locale,
    formatter: &LocalTimeFormatter,
    capability: Capability,
    include: impl Fn(&ShiftInstance) -> bool,
) -> Result<BoardView, CoreError> {
    let mut columns: Vec<(OffsetDateTime, BoardColumn)> = Vec::new();
    for instance in state.instances.iter().filter(|instance| include(instance)) {
        let column: BoardColumn = build_column(actor, state, instance, now, locale, formatter)?;
        columns.push((instance.window.start(), column));
    }
    columns.sort_by(|(a_start, a), (b_start, b)| {
        a_start.cmp(b_start).then_with(|| a.name.cmp(&b.name))
    });

    Ok(BoardView {
        event_id: state.event.id,
        group_id: state.group.id,
        phase: event_phase(&state.event, now),
        capability,
        can_manage: capability.can_manage(),
        columns: columns.into_iter().map(|(_, column)| column).collect(),
    })
}

fn build_column(
    actor: &Actor,
    state: &ShiftGroupState,
    instance: &ShiftInstance,
    now: OffsetDateTime,
    locale: Locale,
    formatter: &LocalTimeFormatter,
) -> Result<BoardColumn, CoreError> {
    let definition: &ShiftDefinition = state.definition(instance.definition_id)?;
    let can_edit: bool = can_edit_instance(actor, state, instance);
    let me: Option<MemberId> = actor.member_id();

    let mut slots: Vec<SlotView> = Vec::new();
    for booking in state.bookings_for_instance(instance.id) {
        let is_mine: bool = me.is_some() && booking.occupant == me;
        let (can_book, rejection) = if booking.is_open() {
            match check_can_book_slot(actor, state, instance.id, booking.slot_start, now) {
                Ok(()) => (true, None),
                Err(CoreError::Policy(violation)) => (false, Some(violation)),
                Err(_) => (false, None),
            }
        } else {
            (false, None)
        };
        slots.push(SlotView {
            booking_id: booking.id,
            start: booking.slot_start,
            end: booking.slot_end,
            label: formatter.slot_label(&booking.interval())?,
            taken: !booking.is_open(),
            occupant: if can_edit || is_mine {
                booking.occupant
            } else {
                None
            },
            is_mine,
            can_book,
            rejection,
        });
    }

    Ok(BoardColumn {
        instance_id: instance.id,
        name: definition.name.get(locale).to_string(),
        description: definition.description.get(locale).to_string(),
        day: formatter.day_label(instance.window.start())?,
        responsible: instance.responsible,
        channel: instance.channel.clone(),
        bookings_disabled: instance.bookings_disabled,
        can_edit,
        slots,
    })
}
