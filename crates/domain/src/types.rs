// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::occupancy::SlotInterval;
use crate::slicing::TimeSlices;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Declares a database-assigned numeric identifier.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a member (an authenticated actor).
    MemberId
);
id_type!(
    /// Identifies an event.
    EventId
);
id_type!(
    /// Identifies the per-event shift group.
    ShiftGroupId
);
id_type!(
    /// Identifies a reusable shift definition.
    ShiftDefinitionId
);
id_type!(
    /// Identifies a shift instance scheduled for one event.
    ShiftInstanceId
);
id_type!(
    /// Identifies one slot row of a shift instance.
    ShiftBookingId
);

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Finnish.
    #[default]
    Fi,
    /// English.
    En,
}

impl Locale {
    /// Returns the two-letter language code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fi => "fi",
            Self::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fi" => Ok(Self::Fi),
            "en" => Ok(Self::En),
            _ => Err(DomainError::InvalidLocale(s.to_string())),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A text field stored in both Finnish and English.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BilingualText {
    /// Finnish text.
    pub fi: String,
    /// English text.
    pub en: String,
}

impl BilingualText {
    /// Creates a new bilingual text.
    #[must_use]
    pub fn new(fi: &str, en: &str) -> Self {
        Self {
            fi: fi.to_string(),
            en: en.to_string(),
        }
    }

    /// Selects the text for a locale.
    ///
    /// An empty translation falls back to the other language.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        let (primary, fallback) = match locale {
            Locale::Fi => (&self.fi, &self.en),
            Locale::En => (&self.en, &self.fi),
        };
        if primary.trim().is_empty() {
            fallback
        } else {
            primary
        }
    }

    /// Returns true if both translations are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fi.trim().is_empty() && self.en.trim().is_empty()
    }
}

/// A reusable, named task ("nakki") such as "Registration Desk".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// The canonical identifier.
    pub id: ShiftDefinitionId,
    /// The task name.
    pub name: BilingualText,
    /// The task description.
    pub description: BilingualText,
    /// Whether only active members may book this task.
    pub active_members_only: bool,
}

impl ShiftDefinition {
    /// Creates a shift definition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if both name translations are blank.
    pub fn new(
        id: ShiftDefinitionId,
        name: BilingualText,
        description: BilingualText,
        active_members_only: bool,
    ) -> Result<Self, DomainError> {
        validate_definition_name(&name)?;
        Ok(Self {
            id,
            name,
            description,
            active_members_only,
        })
    }
}

/// Validates that a shift definition name has at least one translation.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if both translations are blank.
pub fn validate_definition_name(name: &BilingualText) -> Result<(), DomainError> {
    if name.is_blank() {
        return Err(DomainError::InvalidName(String::from(
            "shift definition name must not be empty",
        )));
    }
    Ok(())
}

/// A validated time range sliced into interval-sized slots.
///
/// ## Invariants
///
/// - `start < end`
/// - `interval > 0`
/// - `interval <= end - start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShiftWindow")]
pub struct ShiftWindow {
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
    interval: Duration,
}

/// Unvalidated wire form of a `ShiftWindow`.
#[derive(Deserialize)]
struct RawShiftWindow {
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
    interval: Duration,
}

impl TryFrom<RawShiftWindow> for ShiftWindow {
    type Error = DomainError;

    fn try_from(raw: RawShiftWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end, raw.interval)
    }
}

impl ShiftWindow {
    /// Creates a validated shift window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRange` if the window is empty or the
    /// interval is not positive, and `DomainError::InvalidInterval` if the
    /// interval is longer than the window.
    pub fn new(
        start: OffsetDateTime,
        end: OffsetDateTime,
        interval: Duration,
    ) -> Result<Self, DomainError> {
        if end <= start || interval <= Duration::ZERO {
            return Err(DomainError::InvalidRange {
                start,
                end,
                interval,
            });
        }
        let span: Duration = end - start;
        if interval > span {
            return Err(DomainError::InvalidInterval { interval, span });
        }
        Ok(Self {
            start,
            end,
            interval,
        })
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Returns the slot interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Iterates the slot start times of this window.
    #[must_use]
    pub fn slot_starts(&self) -> TimeSlices {
        TimeSlices::new(self.start, self.end, self.interval)
    }

    /// Iterates the half-open slot intervals of this window.
    pub fn slots(&self) -> impl Iterator<Item = SlotInterval> + '_ {
        self.slot_starts().filter_map(|start| {
            start
                .checked_add(self.interval)
                .map(|end| SlotInterval::new(start, end))
        })
    }

    /// Returns true if `[slot_start, slot_end)` lies on this window's grid.
    #[must_use]
    pub fn is_grid_slot(&self, slot_start: OffsetDateTime, slot_end: OffsetDateTime) -> bool {
        if slot_start < self.start || slot_start >= self.end {
            return false;
        }
        if slot_end - slot_start != self.interval {
            return false;
        }
        let offset: i128 = (slot_start - self.start).whole_nanoseconds();
        offset % self.interval.whole_nanoseconds() == 0
    }
}

/// One schedulable task for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInstance {
    /// The canonical identifier.
    pub id: ShiftInstanceId,
    /// The owning event.
    pub event_id: EventId,
    /// The shift definition this instance schedules.
    pub definition_id: ShiftDefinitionId,
    /// The time range and slot interval.
    pub window: ShiftWindow,
    /// The member responsible for this task, if any.
    pub responsible: Option<MemberId>,
    /// External chat channel for the task's volunteers.
    pub channel: Option<String>,
    /// Whether further bookings are disabled.
    pub bookings_disabled: bool,
}

/// One interval-sized slot of a shift instance, optionally occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftBooking {
    /// The canonical identifier.
    pub id: ShiftBookingId,
    /// The owning shift instance.
    pub shift_instance_id: ShiftInstanceId,
    /// The owning event (denormalized for queries).
    pub event_id: EventId,
    /// The slot start.
    #[serde(with = "time::serde::rfc3339")]
    pub slot_start: OffsetDateTime,
    /// The slot end.
    #[serde(with = "time::serde::rfc3339")]
    pub slot_end: OffsetDateTime,
    /// The member holding this slot; `None` means the slot is open.
    pub occupant: Option<MemberId>,
}

impl ShiftBooking {
    /// Creates a booking row on the grid of `instance`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MisalignedSlot` if `slot_start` is not a grid
    /// point of the instance window.
    pub fn new(
        id: ShiftBookingId,
        instance: &ShiftInstance,
        slot_start: OffsetDateTime,
        occupant: Option<MemberId>,
    ) -> Result<Self, DomainError> {
        let slot_end: OffsetDateTime = slot_start
            .checked_add(instance.window.interval())
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("computing slot end"),
            })?;
        if !instance.window.is_grid_slot(slot_start, slot_end) {
            return Err(DomainError::MisalignedSlot {
                shift_instance_id: instance.id,
                slot_start,
                slot_end,
            });
        }
        Ok(Self {
            id,
            shift_instance_id: instance.id,
            event_id: instance.event_id,
            slot_start,
            slot_end,
            occupant,
        })
    }

    /// Restores a booking row as stored, without grid validation.
    ///
    /// Stored rows may sit off the current grid when an occupied slot
    /// survived a reschedule.
    #[must_use]
    pub const fn from_stored(
        id: ShiftBookingId,
        shift_instance_id: ShiftInstanceId,
        event_id: EventId,
        slot_start: OffsetDateTime,
        slot_end: OffsetDateTime,
        occupant: Option<MemberId>,
    ) -> Self {
        Self {
            id,
            shift_instance_id,
            event_id,
            slot_start,
            slot_end,
            occupant,
        }
    }

    /// Returns the half-open interval of this slot.
    #[must_use]
    pub const fn interval(&self) -> SlotInterval {
        SlotInterval::new(self.slot_start, self.slot_end)
    }

    /// Returns true if nobody holds this slot.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Event-wide shift scheduling policy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShiftGroupPolicy {
    /// Whether shift scheduling is active for the event.
    pub enabled: bool,
    /// Whether a member may not hold overlapping slots across shifts.
    pub require_distinct_times: bool,
    /// Whether a shift booking is required before reserving a ticket.
    pub required_for_ticket_reservation: bool,
    /// Whether the board link is shown on the public event page.
    pub show_link_in_event: bool,
}

impl Default for ShiftGroupPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            require_distinct_times: true,
            required_for_ticket_reservation: false,
            show_link_in_event: false,
        }
    }
}

/// The per-event shift container ("nakkikone").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftGroup {
    /// The canonical identifier.
    pub id: ShiftGroupId,
    /// The owning event.
    pub event_id: EventId,
    /// Policy flags.
    pub policy: ShiftGroupPolicy,
    /// Members who may manage the whole board.
    pub responsible_admins: Vec<MemberId>,
}

impl ShiftGroup {
    /// Returns true if `member` is a responsible admin of this group.
    #[must_use]
    pub fn is_responsible_admin(&self, member: MemberId) -> bool {
        self.responsible_admins.contains(&member)
    }
}

/// Signup window settings of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignupWindow {
    /// Whether signups are enabled at all.
    pub enabled: bool,
    /// Window start (inclusive).
    #[serde(with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    /// Window end (exclusive).
    #[serde(with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

/// The temporal attributes of an event, read-only for this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    /// The canonical identifier.
    pub id: EventId,
    /// When the event becomes public; `None` means never automatically.
    #[serde(with = "time::serde::rfc3339::option")]
    pub publish_date: Option<OffsetDateTime>,
    /// The event start.
    #[serde(with = "time::serde::rfc3339")]
    pub event_date: OffsetDateTime,
    /// The end of a multiday event; `None` for single-day events.
    #[serde(with = "time::serde::rfc3339::option")]
    pub until: Option<OffsetDateTime>,
    /// Whether the event is cancelled.
    pub cancelled: bool,
    /// Denormalized "published" flag; not authoritative.
    pub published_flag: bool,
    /// Signup window settings.
    pub signup: SignupWindow,
}
