// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session resolution.
//!
//! Sessions are issued by the identity provider; this layer only maps a
//! token to an `Actor`. A missing, unknown or expired token is an
//! anonymous actor, not an error: whether anonymity is acceptable is
//! decided per operation by the core.

use nakki::{Actor, MemberContext};
use nakki_persistence::Persistence;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::{ApiError, translate_persistence_error};

/// Resolves a session token to an actor.
///
/// # Errors
///
/// Returns an error only if the session lookup itself fails.
pub fn authenticate_session(
    persistence: &mut Persistence,
    session_token: Option<&str>,
    now: OffsetDateTime,
) -> Result<Actor, ApiError> {
    let Some(token) = session_token.map(str::trim).filter(|token| !token.is_empty()) else {
        return Ok(Actor::Anonymous);
    };

    let member: Option<MemberContext> = persistence
        .find_member_by_session(token, now)
        .map_err(translate_persistence_error)?;

    Ok(member.map_or_else(
        || {
            debug!("Session token did not resolve; treating as anonymous");
            Actor::Anonymous
        },
        Actor::Member,
    ))
}
