// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! All queries use Diesel DSL. Timestamp comparisons happen in Rust after
//! parsing, never on the stored text.
//!
//! ## Module Organization
//!
//! - `identity`: Members and sessions
//! - `events`: Event schedules
//! - `shifts`: Shift groups, definitions, instances and booking rows

pub mod events;
pub mod identity;
pub mod shifts;
