// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event publication and signup window decisions.
//!
//! These functions are the single source of truth for event visibility.
//! The stored `published_flag` on an event is never consulted.
//!
//! ## Phases
//!
//! `Draft -> Published -> SignupOpen -> SignupClosed -> Finished`, with
//! `Cancelled` reachable from any phase and absorbing.

use crate::types::EventSchedule;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Derived temporal phase of an event. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Not yet published.
    Draft,
    /// Published, signup not open.
    Published,
    /// Published and the signup window contains now.
    SignupOpen,
    /// Published and the signup window has ended.
    SignupClosed,
    /// The event's effective end is in the past.
    Finished,
    /// Cancelled.
    Cancelled,
}

impl EventPhase {
    /// Returns the string representation of the phase.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::SignupOpen => "signup_open",
            Self::SignupClosed => "signup_closed",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Returns true if the event is live at `now`.
///
/// An event without a publish date is never published automatically.
#[must_use]
pub fn is_published(event: &EventSchedule, now: OffsetDateTime) -> bool {
    !event.cancelled && event.publish_date.is_some_and(|publish| publish <= now)
}

/// Returns the instant the event ends: `until` for multiday events,
/// otherwise the event date.
#[must_use]
pub fn effective_end(event: &EventSchedule) -> OffsetDateTime {
    event.until.unwrap_or(event.event_date)
}

/// Returns true if the event's effective end is before `now`.
#[must_use]
pub fn is_finished(event: &EventSchedule, now: OffsetDateTime) -> bool {
    effective_end(event) < now
}

/// Returns true if signups are open at `now`.
///
/// A finished event never reports signup open, whatever its window says.
/// A window missing either bound is treated as closed.
#[must_use]
pub fn is_signup_open(event: &EventSchedule, now: OffsetDateTime) -> bool {
    if is_finished(event, now) {
        return false;
    }
    if !event.signup.enabled {
        return false;
    }
    match (event.signup.start, event.signup.end) {
        (Some(start), Some(end)) => start <= now && now < end,
        _ => false,
    }
}

/// Derives the event phase at `now`.
#[must_use]
pub fn event_phase(event: &EventSchedule, now: OffsetDateTime) -> EventPhase {
    if event.cancelled {
        return EventPhase::Cancelled;
    }
    if !is_published(event, now) {
        return EventPhase::Draft;
    }
    if is_finished(event, now) {
        return EventPhase::Finished;
    }
    if is_signup_open(event, now) {
        return EventPhase::SignupOpen;
    }
    let signup_ended: bool = event.signup.enabled && event.signup.end.is_some_and(|end| end <= now);
    if signup_ended {
        EventPhase::SignupClosed
    } else {
        EventPhase::Published
    }
}
