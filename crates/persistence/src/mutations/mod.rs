// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! All mutations use Diesel DSL; the only raw SQL is `last_insert_rowid()`,
//! reached through the `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `identity`: Members and sessions
//! - `events`: Events and shift groups
//! - `definitions`: Shift definitions
//! - `transition`: Execution of `BookingChange`s (`persist_transition`)

pub mod definitions;
pub mod events;
pub mod identity;
pub mod transition;

pub use transition::persist_transition;
