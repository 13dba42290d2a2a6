// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use nakki_domain::{DomainError, EventId, ShiftBookingId};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// The requested event was not found.
    EventNotFound(EventId),
    /// The event has no shift group.
    ShiftGroupNotFound(EventId),
    /// The requested booking row was not found.
    BookingNotFound(ShiftBookingId),
    /// The requested resource was not found.
    NotFound(String),
    /// The slot was claimed by somebody else first.
    ///
    /// `booking_id` is `None` when the conflict surfaced as a uniqueness
    /// violation on insert.
    SlotAlreadyTaken {
        /// The contested row, if known.
        booking_id: Option<ShiftBookingId>,
    },
    /// A row changed between read and write.
    BookingChanged(ShiftBookingId),
    /// A referenced row does not exist.
    ForeignKeyViolation(String),
    /// A uniqueness constraint rejected the write.
    UniqueViolation(String),
    /// A domain rule rejected the write.
    DomainViolation(DomainError),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::ShiftGroupNotFound(id) => write!(f, "Event {id} has no shift group"),
            Self::BookingNotFound(id) => write!(f, "Booking not found: {id}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::SlotAlreadyTaken {
                booking_id: Some(id),
            } => write!(f, "Slot {id} is already taken"),
            Self::SlotAlreadyTaken { booking_id: None } => write!(f, "Slot is already taken"),
            Self::BookingChanged(id) => {
                write!(f, "Booking {id} changed since it was read")
            }
            Self::ForeignKeyViolation(msg) => write!(f, "Referenced row missing: {msg}"),
            Self::UniqueViolation(msg) => write!(f, "Uniqueness violation: {msg}"),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
