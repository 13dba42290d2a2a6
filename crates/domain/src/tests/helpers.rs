// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    EventId, EventSchedule, MemberId, ShiftBooking, ShiftBookingId, ShiftDefinitionId,
    ShiftInstance, ShiftInstanceId, ShiftWindow, SignupWindow,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub fn create_test_instance(
    id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
    interval: Duration,
) -> ShiftInstance {
    ShiftInstance {
        id: ShiftInstanceId::new(id),
        event_id: EventId::new(1),
        definition_id: ShiftDefinitionId::new(1),
        window: ShiftWindow::new(start, end, interval).unwrap(),
        responsible: None,
        channel: None,
        bookings_disabled: false,
    }
}

/// Materializes one row per slot with ids starting at `first_id`.
pub fn materialize_bookings(instance: &ShiftInstance, first_id: i64) -> Vec<ShiftBooking> {
    instance
        .window
        .slot_starts()
        .zip(first_id..)
        .map(|(start, id)| {
            ShiftBooking::new(ShiftBookingId::new(id), instance, start, None).unwrap()
        })
        .collect()
}

pub fn occupy(bookings: &mut [ShiftBooking], index: usize, member: i64) {
    bookings[index].occupant = Some(MemberId::new(member));
}

pub fn create_test_event() -> EventSchedule {
    EventSchedule {
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
    }
}
