// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use nakki::{Actor, Command, MemberContext, ShiftGroupState, TransitionResult, apply};
use nakki_domain::{
    BilingualText, EventId, EventSchedule, MemberId, ShiftDefinitionId, ShiftGroupPolicy,
    ShiftInstanceId, SignupWindow,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub fn now() -> OffsetDateTime {
    datetime!(2025-06-01 12:00 UTC)
}

pub fn create_test_schedule() -> EventSchedule {
    EventSchedule {
        id: EventId::new(0),
        publish_date: Some(datetime!(2025-05-01 09:00 UTC)),
        event_date: datetime!(2025-06-14 15:00 UTC),
        until: None,
        cancelled: false,
        published_flag: false,
        signup: SignupWindow {
            enabled: true,
            start: Some(datetime!(2025-05-15 09:00 UTC)),
            end: Some(datetime!(2025-06-10 21:00 UTC)),
        },
    }
}

pub fn create_test_policy() -> ShiftGroupPolicy {
    ShiftGroupPolicy {
        enabled: true,
        ..ShiftGroupPolicy::default()
    }
}

/// An event with an enabled shift group, one definition and three members.
pub struct Fixture {
    pub persistence: Persistence,
    pub event_id: EventId,
    pub definition_id: ShiftDefinitionId,
    pub admin: Actor,
    pub alice: Actor,
    pub bob: Actor,
}

impl Fixture {
    pub fn state(&mut self) -> ShiftGroupState {
        self.persistence.load_group_state(self.event_id).unwrap()
    }

    /// The group state with the fixture's definition included, for
    /// scheduling it.
    pub fn scheduling_state(&mut self) -> ShiftGroupState {
        let mut state: ShiftGroupState = self.state();
        let definition = self
            .persistence
            .get_shift_definition(self.definition_id)
            .unwrap();
        state.include_definition(definition);
        state
    }

    pub fn run(&mut self, command: Command, actor: &Actor) -> TransitionResult {
        let state: ShiftGroupState = self.state();
        let result: TransitionResult = apply(&state, command, actor, now()).unwrap();
        self.persistence.persist_transition(&result).unwrap();
        result
    }

    /// Schedules the bar shift 10:00-13:00 UTC in one-hour slots.
    pub fn create_bar_shift(&mut self) -> ShiftInstanceId {
        let state: ShiftGroupState = self.scheduling_state();
        let admin: Actor = self.admin.clone();
        let result: TransitionResult = apply(
            &state,
            Command::CreateShiftInstance {
                definition_id: self.definition_id,
                start: datetime!(2025-06-14 10:00 UTC),
                end: datetime!(2025-06-14 13:00 UTC),
                interval: Duration::hours(1),
                responsible: None,
                channel: Some(String::from("#bar")),
            },
            &admin,
            now(),
        )
        .unwrap();
        self.persistence
            .persist_transition(&result)
            .unwrap()
            .created_instance
            .unwrap()
    }
}

fn create_test_actor(persistence: &mut Persistence, name: &str, is_admin: bool) -> Actor {
    let member_id: MemberId = persistence.create_member(name, is_admin, true).unwrap();
    let context: MemberContext = persistence.get_member(member_id).unwrap().unwrap();
    Actor::Member(context)
}

pub fn create_test_fixture() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let admin: Actor = create_test_actor(&mut persistence, "Admin", true);
    let alice: Actor = create_test_actor(&mut persistence, "Alice", false);
    let bob: Actor = create_test_actor(&mut persistence, "Bob", false);

    let event_id: EventId = persistence
        .create_event("Kesäjuhlat", &create_test_schedule())
        .unwrap();
    persistence
        .create_shift_group(event_id, &create_test_policy())
        .unwrap();
    let definition_id: ShiftDefinitionId = persistence
        .create_shift_definition(
            &BilingualText::new("Baari", "Bar"),
            &BilingualText::new("Juomien myynti", "Selling drinks"),
            false,
        )
        .unwrap();

    Fixture {
        persistence,
        event_id,
        definition_id,
        admin,
        alice,
        bob,
    }
}
