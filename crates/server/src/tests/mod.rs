// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driving the server with `oneshot` requests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod booking_route_tests;
mod helpers;
mod management_route_tests;
