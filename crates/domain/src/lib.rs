// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod clock;
mod error;
mod event_state;
mod labels;
mod occupancy;
mod slicing;
mod slot_diff;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use event_state::{
    EventPhase, effective_end, event_phase, is_finished, is_published, is_signup_open,
};
pub use labels::LocalTimeFormatter;
pub use occupancy::{OccupancyTracker, SlotInterval};
pub use slicing::{TimeSlices, expected_slot_count, slice_time_window};
pub use slot_diff::{
    RetainedSlot, SlotDiff, diff_slots, ensure_definition_deletable, plan_trailing_slot_removal,
};

// Re-export public types
pub use types::{
    BilingualText, EventId, EventSchedule, Locale, MemberId, ShiftBooking, ShiftBookingId,
    ShiftDefinition, ShiftDefinitionId, ShiftGroup, ShiftGroupId, ShiftGroupPolicy,
    ShiftInstance, ShiftInstanceId, ShiftWindow, SignupWindow, validate_definition_name,
};
