// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actors and their capabilities within a shift group.

use nakki_domain::MemberId;
use serde::{Deserialize, Serialize};

/// The identity facts the core needs about an authenticated member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberContext {
    /// The member.
    pub member_id: MemberId,
    /// Name shown on boards.
    pub display_name: String,
    /// Whether the member holds the global elevated role.
    pub is_admin: bool,
    /// Whether the member has active member status.
    pub is_active_member: bool,
}

impl MemberContext {
    /// Creates a context for a regular member.
    #[must_use]
    pub fn new(member_id: MemberId, display_name: &str) -> Self {
        Self {
            member_id,
            display_name: display_name.to_string(),
            is_admin: false,
            is_active_member: false,
        }
    }
}

/// Whoever issued a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    /// No session.
    Anonymous,
    /// An authenticated member.
    Member(MemberContext),
}

impl Actor {
    /// Returns the member context, or `None` for anonymous actors.
    #[must_use]
    pub const fn member(&self) -> Option<&MemberContext> {
        match self {
            Self::Anonymous => None,
            Self::Member(context) => Some(context),
        }
    }

    /// Returns the member id, or `None` for anonymous actors.
    #[must_use]
    pub fn member_id(&self) -> Option<MemberId> {
        self.member().map(|context| context.member_id)
    }

    /// Returns a short label for logging.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Anonymous => String::from("anonymous"),
            Self::Member(context) => format!("member:{}", context.member_id),
        }
    }
}

/// What an actor may do with one shift group.
///
/// Computed per group; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Not logged in.
    Anonymous,
    /// Logged in; may book slots.
    Member,
    /// Responsible for at least one shift in the group.
    Responsible,
    /// Global admin or responsible admin of the group.
    Admin,
}

impl Capability {
    /// Returns true if the capability grants access to the management board.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Responsible | Self::Admin)
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Member => "member",
            Self::Responsible => "responsible",
            Self::Admin => "admin",
        }
    }
}
