// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partitioning of a time range into discrete slot starts.
//!
//! ## Invariants
//!
//! - The sequence is `start, start + interval, ...` while strictly below `end`
//! - `end` itself is never produced
//! - When the range is not a multiple of the interval, the last slot's
//!   implicit end (`value + interval`) extends past `end`; it is not truncated
//!
//! ## Usage
//!
//! This logic is used by:
//! - Shift creation (to materialize one booking row per slot)
//! - Rescheduling (to compute the target slot set for diffing)

use crate::error::DomainError;
use time::{Duration, OffsetDateTime};

/// Iterator over slot start times of a window.
///
/// Restartable by cloning; yields nothing for an invalid window.
#[derive(Debug, Clone)]
pub struct TimeSlices {
    next: Option<OffsetDateTime>,
    end: OffsetDateTime,
    interval: Duration,
}

impl TimeSlices {
    pub(crate) fn new(start: OffsetDateTime, end: OffsetDateTime, interval: Duration) -> Self {
        let next = (interval > Duration::ZERO && start < end).then_some(start);
        Self {
            next,
            end,
            interval,
        }
    }
}

impl Iterator for TimeSlices {
    type Item = OffsetDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current: OffsetDateTime = self.next?;
        self.next = current
            .checked_add(self.interval)
            .filter(|candidate| *candidate < self.end);
        Some(current)
    }
}

/// Slices `[start, end)` into slot start times.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `interval <= 0` or `end <= start`.
///
/// # Example
///
/// ```text
/// slice_time_window(10:00, 13:00, 1h) -> [10:00, 11:00, 12:00]
/// slice_time_window(10:00, 11:30, 1h) -> [10:00, 11:00]   (last slot ends 12:00)
/// ```
pub fn slice_time_window(
    start: OffsetDateTime,
    end: OffsetDateTime,
    interval: Duration,
) -> Result<Vec<OffsetDateTime>, DomainError> {
    if interval <= Duration::ZERO || end <= start {
        return Err(DomainError::InvalidRange {
            start,
            end,
            interval,
        });
    }
    Ok(TimeSlices::new(start, end, interval).collect())
}

/// Returns `ceil((end - start) / interval)`, the number of slots in a window.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `interval <= 0` or `end <= start`.
pub fn expected_slot_count(
    start: OffsetDateTime,
    end: OffsetDateTime,
    interval: Duration,
) -> Result<usize, DomainError> {
    if interval <= Duration::ZERO || end <= start {
        return Err(DomainError::InvalidRange {
            start,
            end,
            interval,
        });
    }
    let span: i128 = (end - start).whole_nanoseconds();
    let step: i128 = interval.whole_nanoseconds();
    let count: i128 = (span + step - 1) / step;
    usize::try_from(count).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("counting slots"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_time_slices_stop_before_end() {
        let slices: Vec<OffsetDateTime> = TimeSlices::new(
            datetime!(2025-06-14 10:00 UTC),
            datetime!(2025-06-14 12:00 UTC),
            Duration::hours(1),
        )
        .collect();
        assert_eq!(
            slices,
            vec![datetime!(2025-06-14 10:00 UTC), datetime!(2025-06-14 11:00 UTC)]
        );
    }

    #[test]
    fn test_time_slices_invalid_window_is_empty() {
        let mut slices = TimeSlices::new(
            datetime!(2025-06-14 12:00 UTC),
            datetime!(2025-06-14 10:00 UTC),
            Duration::hours(1),
        );
        assert!(slices.next().is_none());
    }

    #[test]
    fn test_expected_slot_count_rounds_up() {
        let count: usize = expected_slot_count(
            datetime!(2025-06-14 10:00 UTC),
            datetime!(2025-06-14 11:30 UTC),
            Duration::hours(1),
        )
        .unwrap();
        assert_eq!(count, 2);
    }
}
