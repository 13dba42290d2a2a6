// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member and session mutations.
//!
//! Credentials are owned by the identity provider; sessions are created
//! with a token it issued.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nakki_domain::MemberId;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{flag, format_timestamp};
use crate::diesel_schema::{members, sessions};
use crate::error::PersistenceError;

/// Creates a member.
///
/// # Errors
///
/// Returns an error if the member cannot be inserted.
pub fn create_member(
    conn: &mut SqliteConnection,
    display_name: &str,
    is_admin: bool,
    is_active_member: bool,
) -> Result<MemberId, PersistenceError> {
    diesel::insert_into(members::table)
        .values((
            members::display_name.eq(display_name),
            members::is_admin.eq(flag(is_admin)),
            members::is_active_member.eq(flag(is_active_member)),
        ))
        .execute(conn)?;

    let member_id: i64 = conn.get_last_insert_rowid()?;
    info!(member_id, is_admin, is_active_member, "Created member");
    Ok(MemberId::new(member_id))
}

/// Stores a session token for a member.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the token already exists,
/// or `PersistenceError::ForeignKeyViolation` if the member does not.
pub fn create_session(
    conn: &mut SqliteConnection,
    member_id: MemberId,
    session_token: &str,
    expires_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::member_id.eq(member_id.value()),
            sessions::expires_at.eq(format_timestamp(expires_at)?),
        ))
        .execute(conn)?;

    info!(member_id = member_id.value(), "Created session");
    Ok(())
}

/// Deletes a session token. Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?;
    Ok(())
}
