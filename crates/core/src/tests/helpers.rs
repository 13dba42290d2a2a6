// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, BookingChange, MemberContext, ShiftGroupState, TransitionResult};
use nakki_domain::{
    BilingualText, EventId, EventSchedule, MemberId, ShiftBooking, ShiftBookingId,
    ShiftDefinition, ShiftDefinitionId, ShiftGroup, ShiftGroupId, ShiftGroupPolicy,
    ShiftInstance, ShiftInstanceId, ShiftWindow, SignupWindow,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub const BAR: ShiftInstanceId = ShiftInstanceId::new(1);
pub const DOOR: ShiftInstanceId = ShiftInstanceId::new(2);
pub const BAR_DEFINITION: ShiftDefinitionId = ShiftDefinitionId::new(1);
pub const DOOR_DEFINITION: ShiftDefinitionId = ShiftDefinitionId::new(2);
pub const RESPONSIBLE: MemberId = MemberId::new(50);
pub const GROUP_ADMIN: MemberId = MemberId::new(60);

pub fn now() -> OffsetDateTime {
    datetime!(2025-06-01 12:00 UTC)
}

pub fn create_test_member(id: i64) -> Actor {
    Actor::Member(MemberContext::new(MemberId::new(id), "Test Member"))
}

pub fn create_test_active_member(id: i64) -> Actor {
    Actor::Member(MemberContext {
        is_active_member: true,
        ..MemberContext::new(MemberId::new(id), "Active Member")
    })
}

pub fn create_test_admin() -> Actor {
    Actor::Member(MemberContext {
        is_admin: true,
        ..MemberContext::new(MemberId::new(1), "Admin")
    })
}

pub fn create_test_responsible() -> Actor {
    Actor::Member(MemberContext::new(RESPONSIBLE, "Bar Boss"))
}

pub fn create_test_group_admin() -> Actor {
    Actor::Member(MemberContext::new(GROUP_ADMIN, "Nakkivastaava"))
}

fn instance(
    id: ShiftInstanceId,
    definition_id: ShiftDefinitionId,
    start: OffsetDateTime,
    end: OffsetDateTime,
    responsible: Option<MemberId>,
) -> ShiftInstance {
    ShiftInstance {
        id,
        event_id: EventId::new(1),
        definition_id,
        window: ShiftWindow::new(start, end, Duration::hours(1)).unwrap(),
        responsible,
        channel: Some(String::from("#bar")),
        bookings_disabled: false,
    }
}

fn materialize(instance: &ShiftInstance, first_id: i64) -> Vec<ShiftBooking> {
    instance
        .window
        .slot_starts()
        .zip(first_id..)
        .map(|(start, id)| {
            ShiftBooking::new(ShiftBookingId::new(id), instance, start, None).unwrap()
        })
        .collect()
}

/// An enabled, published group with two shifts on 2025-06-14:
/// the bar 10:00-13:00 (rows 1..=3, responsible member 50) and the door
/// 10:30-12:30 (rows 10..=11). Signup is open at `now()`.
pub fn create_test_state() -> ShiftGroupState {
    let bar = instance(
        BAR,
        BAR_DEFINITION,
        datetime!(2025-06-14 10:00 UTC),
        datetime!(2025-06-14 13:00 UTC),
        Some(RESPONSIBLE),
    );
    let door = instance(
        DOOR,
        DOOR_DEFINITION,
        datetime!(2025-06-14 10:30 UTC),
        datetime!(2025-06-14 12:30 UTC),
        None,
    );
    let mut bookings: Vec<ShiftBooking> = materialize(&bar, 1);
    bookings.extend(materialize(&door, 10));

    ShiftGroupState {
        event: EventSchedule {
            id: EventId::new(1),
            publish_date: Some(datetime!(2025-05-01 09:00 UTC)),
            event_date: datetime!(2025-06-14 15:00 UTC),
            until: None,
            cancelled: false,
            published_flag: true,
            signup: SignupWindow {
                enabled: true,
                start: Some(datetime!(2025-05-15 09:00 UTC)),
                end: Some(datetime!(2025-06-10 21:00 UTC)),
            },
        },
        group: ShiftGroup {
            id: ShiftGroupId::new(1),
            event_id: EventId::new(1),
            policy: ShiftGroupPolicy {
                enabled: true,
                ..ShiftGroupPolicy::default()
            },
            responsible_admins: vec![GROUP_ADMIN],
        },
        definitions: vec![
            ShiftDefinition::new(
                BAR_DEFINITION,
                BilingualText::new("Baari", "Bar"),
                BilingualText::new("Juomien myynti", "Selling drinks"),
                false,
            )
            .unwrap(),
            ShiftDefinition::new(
                DOOR_DEFINITION,
                BilingualText::new("Ovi", "Door"),
                BilingualText::new("Lippujen tarkastus", ""),
                false,
            )
            .unwrap(),
        ],
        instances: vec![bar, door],
        bookings,
    }
}

pub fn set_occupant(state: &mut ShiftGroupState, booking_id: i64, member: i64) {
    let booking = state
        .bookings
        .iter_mut()
        .find(|booking| booking.id == ShiftBookingId::new(booking_id))
        .unwrap();
    booking.occupant = Some(MemberId::new(member));
}

/// Applies the booking changes of a transition to an in-memory state,
/// mirroring what storage does for claims and releases.
pub fn apply_changes(state: &mut ShiftGroupState, result: &TransitionResult) {
    for change in &result.changes {
        match change {
            BookingChange::ClaimSlot {
                booking_id,
                member_id,
            } => {
                let booking = state
                    .bookings
                    .iter_mut()
                    .find(|booking| booking.id == *booking_id)
                    .unwrap();
                assert!(booking.occupant.is_none(), "claim on a taken slot");
                booking.occupant = Some(*member_id);
            }
            BookingChange::ReleaseSlot { booking_id, .. } => {
                let booking = state
                    .bookings
                    .iter_mut()
                    .find(|booking| booking.id == *booking_id)
                    .unwrap();
                booking.occupant = None;
            }
            other => panic!("unexpected change in test: {other:?}"),
        }
    }
}
