// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Every route resolves its actor through the `Session` extractor. A missing,
//! malformed, unknown or expired token yields an anonymous actor; the API
//! layer decides whether anonymity is acceptable for the operation.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use nakki::Actor;
use nakki_api::{ApiError, authenticate_session};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// The resolved actor of a request.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     AxumState(app_state): AxumState<AppState>,
///     session: Session,
/// ) -> Result<Json<Response>, HttpError> {
///     let result = some_api_call(&mut persistence, &session.actor)
///         .map_err(|err| session.reject(err))?;
///     Ok(Json(result))
/// }
/// ```
pub struct Session {
    /// The authenticated member, or `Actor::Anonymous`.
    pub actor: Actor,
    /// Where to send the caller if the operation requires a login.
    login_redirect: String,
}

impl Session {
    /// Converts an API error into an HTTP error for this request.
    ///
    /// `Unauthenticated` becomes a redirect to the login page that returns
    /// the caller to the original path.
    pub fn reject(&self, err: ApiError) -> HttpError {
        HttpError::from_api(err, &self.login_redirect)
    }
}

/// Extracts the bearer token from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?;
    let Ok(value) = header.to_str() else {
        warn!("Invalid Authorization header encoding");
        return None;
    };
    let token = value.strip_prefix("Bearer ");
    if token.is_none() {
        debug!("Authorization header does not start with 'Bearer '");
    }
    token
}

/// Builds `{login_url}?redirect=<original path>`.
fn login_redirect(login_url: &str, parts: &Parts) -> String {
    let original: &str = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |path_and_query| path_and_query.as_str());
    format!("{login_url}?redirect={}", urlencoding::encode(original))
}

impl FromRequestParts<AppState> for Session {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let login_redirect: String = login_redirect(&state.login_url, parts);
        let token: Option<&str> = bearer_token(parts);

        let mut persistence = state.persistence.lock().await;
        let actor: Actor = authenticate_session(&mut persistence, token, state.clock.now())
            .map_err(|err| HttpError::from_api(err, &login_redirect))?;
        drop(persistence);

        if let Some(member_id) = actor.member_id() {
            debug!(member_id = %member_id, "Session resolved");
        }

        Ok(Self {
            actor,
            login_redirect,
        })
    }
}
