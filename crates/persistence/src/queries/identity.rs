// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member and session queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use nakki::MemberContext;
use nakki_domain::MemberId;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::{MemberRow, SessionRow, parse_timestamp};
use crate::diesel_schema::{members, sessions};
use crate::error::PersistenceError;

/// Retrieves a member by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the member is not found.
pub fn get_member(
    conn: &mut SqliteConnection,
    member_id: MemberId,
) -> Result<Option<MemberContext>, PersistenceError> {
    let row: Option<MemberRow> = members::table
        .filter(members::member_id.eq(member_id.value()))
        .select(MemberRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(MemberRow::into_context))
}

/// Resolves a session token to the member it belongs to.
///
/// Expired sessions resolve to `None`.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored timestamp
/// cannot be parsed.
pub fn find_member_by_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    now: OffsetDateTime,
) -> Result<Option<MemberContext>, PersistenceError> {
    let session: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    let Some(session) = session else {
        debug!("Session token not found");
        return Ok(None);
    };

    if parse_timestamp(&session.expires_at)? <= now {
        debug!(member_id = session.member_id, "Session expired");
        return Ok(None);
    }

    get_member(conn, MemberId::new(session.member_id))
}
