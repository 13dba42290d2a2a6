// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use nakki::{Actor, MemberContext};
use nakki_domain::{
    BilingualText, EventId, EventSchedule, LocalTimeFormatter, MemberId, ShiftBookingId,
    ShiftDefinitionId, ShiftGroupPolicy, ShiftInstanceId, SignupWindow,
};
use nakki_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{CreateShiftInstanceRequest, create_shift_instance};

pub fn now() -> OffsetDateTime {
    datetime!(2025-06-01 12:00 UTC)
}

pub fn create_test_formatter() -> LocalTimeFormatter {
    LocalTimeFormatter::new("Europe/Helsinki").unwrap()
}

pub fn create_test_schedule() -> EventSchedule {
    EventSchedule {
        id: EventId::new(0),
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
    }
}

pub fn create_bar_request(definition_id: ShiftDefinitionId) -> CreateShiftInstanceRequest {
    CreateShiftInstanceRequest {
        definition_id: definition_id.value(),
        start: String::from("2025-06-14T10:00:00Z"),
        end: String::from("2025-06-14T13:00:00Z"),
        interval_minutes: 60,
        responsible_member_id: None,
        channel: Some(String::from("#bar")),
    }
}

/// A published event with an enabled shift group and a three-slot bar shift.
pub struct Fixture {
    pub persistence: Persistence,
    pub event_id: EventId,
    pub definition_id: ShiftDefinitionId,
    pub bar: ShiftInstanceId,
    pub admin: Actor,
    pub alice: Actor,
    pub bob: Actor,
}

impl Fixture {
    /// Returns the booking row of the bar shift starting at `hour` UTC.
    pub fn bar_slot(&mut self, hour: i64) -> ShiftBookingId {
        let state = self.persistence.load_group_state(self.event_id).unwrap();
        let start = datetime!(2025-06-14 00:00 UTC) + time::Duration::hours(hour);
        state.occupancy().booking_at(self.bar, start).unwrap().id
    }
}

pub fn create_test_actor(
    persistence: &mut Persistence,
    name: &str,
    is_admin: bool,
    is_active_member: bool,
) -> Actor {
    let member_id: MemberId = persistence
        .create_member(name, is_admin, is_active_member)
        .unwrap();
    let context: MemberContext = persistence.get_member(member_id).unwrap().unwrap();
    Actor::Member(context)
}

pub fn create_test_fixture_with_policy(policy: ShiftGroupPolicy) -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let admin: Actor = create_test_actor(&mut persistence, "Admin", true, true);
    let alice: Actor = create_test_actor(&mut persistence, "Alice", false, true);
    let bob: Actor = create_test_actor(&mut persistence, "Bob", false, false);

    let event_id: EventId = persistence
        .create_event("Kesäjuhlat", &create_test_schedule())
        .unwrap();
    persistence.create_shift_group(event_id, &policy).unwrap();
    let definition_id: ShiftDefinitionId = persistence
        .create_shift_definition(
            &BilingualText::new("Baari", "Bar"),
            &BilingualText::new("Juomien myynti", "Selling drinks"),
            false,
        )
        .unwrap();

    let created = create_shift_instance(
        &mut persistence,
        &admin,
        event_id,
        create_bar_request(definition_id),
        now(),
    )
    .unwrap();

    Fixture {
        persistence,
        event_id,
        definition_id,
        bar: created.instance_id.unwrap(),
        admin,
        alice,
        bob,
    }
}

pub fn create_test_fixture() -> Fixture {
    create_test_fixture_with_policy(ShiftGroupPolicy {
        enabled: true,
        ..ShiftGroupPolicy::default()
    })
}
