// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Nakki shift scheduling system.
//!
//! This crate turns requests into core commands, persists the resulting
//! transitions and translates every lower-layer error into `ApiError`.
//! It knows nothing about HTTP.

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

mod auth;
mod error;
mod handlers;
mod input;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::authenticate_session;
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    add_responsible_admin, assign_slot, check_ticket_reservation, claim_slot,
    create_shift_instance, delete_shift_instance, get_event_status, get_management_board,
    get_shift_board, list_my_bookings, release_slot, remove_responsible_admin,
    remove_trailing_slots, reschedule_shift_instance, update_group_policy, update_shift_details,
};
pub use input::{InputError, parse_locale, parse_timestamp, parse_window};
pub use request_response::{
    AssignSlotRequest, BookingResponse, CreateShiftInstanceRequest, EventStatusResponse,
    MyBookingInfo, MyBookingsResponse, RemoveTrailingSlotsRequest, RescheduleShiftRequest,
    ShiftChangeResponse, TicketEligibilityResponse, UpdateGroupPolicyRequest,
    UpdateShiftDetailsRequest,
};

pub use nakki::{Actor, BoardView, MemberContext};
