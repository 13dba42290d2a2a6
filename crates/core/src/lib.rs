// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod actor;
mod apply;
mod board;
mod command;
mod eligibility;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use actor::{Actor, Capability, MemberContext};
pub use apply::apply;
pub use board::{BoardColumn, BoardView, SlotView, assemble_board, assemble_management_board};
pub use command::Command;
pub use eligibility::{
    authorize_edit_instance, authorize_manage, authorize_manage_group, authorize_view,
    can_book_slot, can_edit_instance, can_manage, capability_for, check_can_book_slot,
    check_ticket_reservation, require_member,
};
pub use error::{AccessError, CoreError, PolicyViolation};
pub use state::{Action, BookingChange, ShiftGroupState, TransitionResult};
