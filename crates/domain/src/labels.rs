// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wall-clock labels for slots in the event's timezone.
//!
//! Slot arithmetic stays in UTC; only the rendered label is local.

use crate::error::DomainError;
use crate::occupancy::SlotInterval;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use time::OffsetDateTime;

/// Formats instants as local wall-clock labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTimeFormatter {
    tz: Tz,
}

impl LocalTimeFormatter {
    /// Creates a formatter for an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is unknown.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// Returns the IANA name of the configured zone.
    #[must_use]
    pub fn timezone_name(&self) -> &'static str {
        self.tz.name()
    }

    fn to_local(&self, instant: OffsetDateTime) -> Result<DateTime<Tz>, DomainError> {
        let utc: DateTime<Utc> =
            DateTime::from_timestamp(instant.unix_timestamp(), instant.nanosecond()).ok_or_else(
                || DomainError::DateArithmeticOverflow {
                    operation: format!("converting {instant} to local time"),
                },
            )?;
        Ok(utc.with_timezone(&self.tz))
    }

    /// Formats a slot as `HH:MM-HH:MM`.
    ///
    /// # Errors
    ///
    /// Returns an error if an instant is out of range.
    pub fn slot_label(&self, slot: &SlotInterval) -> Result<String, DomainError> {
        let start = self.to_local(slot.start)?;
        let end = self.to_local(slot.end)?;
        Ok(format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")))
    }

    /// Formats the local calendar day of an instant, e.g. `Sat 14.06.`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant is out of range.
    pub fn day_label(&self, instant: OffsetDateTime) -> Result<String, DomainError> {
        Ok(self.to_local(instant)?.format("%a %d.%m.").to_string())
    }
}
