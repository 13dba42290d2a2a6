// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Nakki shift scheduling system.
//!
//! Built on Diesel with the `SQLite` backend. Migrations are embedded and
//! run on every connection; foreign key enforcement is verified at startup
//! since slot rows rely on `ON DELETE CASCADE` from their shift instance.
//!
//! ## Concurrency
//!
//! The rule layer decides on a snapshot loaded by `load_group_state`.
//! `persist_transition` then writes with conditional statements so that a
//! decision based on a stale snapshot fails instead of overwriting:
//!
//! - claiming a slot: `UPDATE ... WHERE booking_id = ? AND member_id IS NULL`
//! - releasing a slot: `UPDATE ... WHERE booking_id = ? AND member_id = ?`
//! - deleting reconciled rows: `DELETE ... WHERE member_id IS NULL`
//!
//! Of two concurrent claims on one open slot exactly one succeeds; the
//! other receives `PersistenceError::SlotAlreadyTaken`.
//!
//! ## Testing
//!
//! Tests use shared-cache in-memory databases with unique names, so every
//! `Persistence::new_in_memory()` call is isolated.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use nakki::{MemberContext, ShiftGroupState, TransitionResult};
use nakki_domain::{
    BilingualText, EventId, EventSchedule, MemberId, ShiftBooking, ShiftBookingId,
    ShiftDefinition, ShiftDefinitionId, ShiftGroupId, ShiftGroupPolicy, ShiftInstanceId,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::PersistenceBackend;
pub use data_models::{PersistTransitionResult, format_timestamp, parse_timestamp};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the shift scheduling tables.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a distinct shared-cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Members & Sessions
    // ========================================================================

    /// Creates a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member cannot be inserted.
    pub fn create_member(
        &mut self,
        display_name: &str,
        is_admin: bool,
        is_active_member: bool,
    ) -> Result<MemberId, PersistenceError> {
        mutations::identity::create_member(&mut self.conn, display_name, is_admin, is_active_member)
    }

    /// Retrieves a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_member(
        &mut self,
        member_id: MemberId,
    ) -> Result<Option<MemberContext>, PersistenceError> {
        queries::identity::get_member(&mut self.conn, member_id)
    }

    /// Stores a session token issued for a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exists or the member does not.
    pub fn create_session(
        &mut self,
        member_id: MemberId,
        session_token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::identity::create_session(&mut self.conn, member_id, session_token, expires_at)
    }

    /// Deletes a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::identity::delete_session(&mut self.conn, session_token)
    }

    /// Resolves a session token; unknown or expired tokens yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_member_by_session(
        &mut self,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<Option<MemberContext>, PersistenceError> {
        queries::identity::find_member_by_session(&mut self.conn, session_token, now)
    }

    // ========================================================================
    // Events & Shift Groups
    // ========================================================================

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be inserted.
    pub fn create_event(
        &mut self,
        name: &str,
        schedule: &EventSchedule,
    ) -> Result<EventId, PersistenceError> {
        mutations::events::create_event(&mut self.conn, name, schedule)
    }

    /// Retrieves an event schedule.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if the event does not exist.
    pub fn get_event(&mut self, event_id: EventId) -> Result<EventSchedule, PersistenceError> {
        queries::events::get_event(&mut self.conn, event_id)
    }

    /// Lists all events, ordered by event date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_events(&mut self) -> Result<Vec<EventSchedule>, PersistenceError> {
        queries::events::list_events(&mut self.conn)
    }

    /// Marks an event cancelled or restores it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if the event does not exist.
    pub fn set_event_cancelled(
        &mut self,
        event_id: EventId,
        cancelled: bool,
    ) -> Result<(), PersistenceError> {
        mutations::events::set_event_cancelled(&mut self.conn, event_id, cancelled)
    }

    /// Creates the shift group of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event already has a group or does not exist.
    pub fn create_shift_group(
        &mut self,
        event_id: EventId,
        policy: &ShiftGroupPolicy,
    ) -> Result<ShiftGroupId, PersistenceError> {
        mutations::events::create_shift_group(&mut self.conn, event_id, policy)
    }

    /// Loads the full shift group state of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event or its group does not exist.
    pub fn load_group_state(
        &mut self,
        event_id: EventId,
    ) -> Result<ShiftGroupState, PersistenceError> {
        queries::shifts::load_group_state(&mut self.conn, event_id)
    }

    // ========================================================================
    // Shift Definitions
    // ========================================================================

    /// Creates a shift definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub fn create_shift_definition(
        &mut self,
        name: &BilingualText,
        description: &BilingualText,
        active_members_only: bool,
    ) -> Result<ShiftDefinitionId, PersistenceError> {
        mutations::definitions::create_shift_definition(
            &mut self.conn,
            name,
            description,
            active_members_only,
        )
    }

    /// Retrieves a shift definition.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the definition does not exist.
    pub fn get_shift_definition(
        &mut self,
        definition_id: ShiftDefinitionId,
    ) -> Result<ShiftDefinition, PersistenceError> {
        queries::shifts::get_definition(&mut self.conn, definition_id)
    }

    /// Replaces a definition's name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition does not exist or the name is blank.
    pub fn update_shift_definition_text(
        &mut self,
        definition_id: ShiftDefinitionId,
        name: &BilingualText,
        description: &BilingualText,
    ) -> Result<(), PersistenceError> {
        mutations::definitions::update_shift_definition_text(
            &mut self.conn,
            definition_id,
            name,
            description,
        )
    }

    /// Deletes a definition no booking row references.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DomainViolation` if the definition is in use.
    pub fn delete_shift_definition(
        &mut self,
        definition_id: ShiftDefinitionId,
    ) -> Result<(), PersistenceError> {
        mutations::definitions::delete_shift_definition(&mut self.conn, definition_id)
    }

    // ========================================================================
    // Transitions & Bookings
    // ========================================================================

    /// Persists every change of a transition atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SlotAlreadyTaken` if a claim lost a race,
    /// `PersistenceError::BookingChanged` if a row changed since it was read,
    /// or another error if persistence fails. Nothing is written on error.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    /// Retrieves a single booking row.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::BookingNotFound` if the row does not exist.
    pub fn get_booking(
        &mut self,
        booking_id: ShiftBookingId,
    ) -> Result<ShiftBooking, PersistenceError> {
        queries::shifts::get_booking(&mut self.conn, booking_id)
    }

    /// Retrieves the event a shift instance belongs to.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the instance does not exist.
    pub fn get_instance_event(
        &mut self,
        instance_id: ShiftInstanceId,
    ) -> Result<EventId, PersistenceError> {
        queries::shifts::get_instance_event(&mut self.conn, instance_id)
    }

    /// Lists every row a member occupies, ordered by slot start.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_for_member(
        &mut self,
        member_id: MemberId,
    ) -> Result<Vec<ShiftBooking>, PersistenceError> {
        queries::shifts::list_bookings_for_member(&mut self.conn, member_id)
    }
}
