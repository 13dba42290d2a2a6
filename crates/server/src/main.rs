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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use nakki::BoardView;
use nakki_api::{
    ApiError, AssignSlotRequest, BookingResponse, CreateShiftInstanceRequest,
    EventStatusResponse, MyBookingsResponse, RemoveTrailingSlotsRequest, RescheduleShiftRequest,
    ShiftChangeResponse, TicketEligibilityResponse, UpdateGroupPolicyRequest,
    UpdateShiftDetailsRequest, parse_locale,
};
use nakki_domain::{
    Clock, EventId, LocalTimeFormatter, Locale, MemberId, ShiftBookingId, ShiftInstanceId,
    SystemClock,
};
use nakki_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::Session;

/// Nakki Server - HTTP server for event shift boards
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// IANA timezone used for slot labels
    #[arg(long, default_value = "Europe/Helsinki")]
    timezone: String,

    /// Login page unauthenticated requests are redirected to
    #[arg(long, default_value = "/login")]
    login_url: String,

    /// Locale used when a request does not name one (`fi` or `en`)
    #[arg(long, default_value = "fi")]
    default_locale: String,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex, so each request's
/// load-check-write runs to completion before the next one starts.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Source of "now" for every request.
    clock: Arc<dyn Clock>,
    /// Renders slot labels in the event timezone.
    formatter: LocalTimeFormatter,
    /// Login page for unauthenticated requests.
    login_url: String,
    /// Locale used when a request does not name one.
    default_locale: Locale,
}

/// Query parameters for board endpoints.
#[derive(Debug, Deserialize)]
struct BoardQuery {
    /// `fi` or `en`.
    locale: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable policy code.
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable policy code.
    code: Option<String>,
    /// The error message.
    message: String,
    /// Redirect target for `303 See Other`.
    location: Option<String>,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            code: None,
            message,
            location: None,
        }
    }

    /// Maps an API error onto its HTTP status.
    ///
    /// `login_redirect` is used when the caller must log in first.
    fn from_api(err: ApiError, login_redirect: &str) -> Self {
        match err {
            ApiError::Unauthenticated => Self {
                status: StatusCode::SEE_OTHER,
                code: None,
                message: err.to_string(),
                location: Some(login_redirect.to_string()),
            },
            ApiError::Forbidden { .. } => Self::new(StatusCode::FORBIDDEN, err.to_string()),
            ApiError::PolicyViolation { code, message } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: Some(code),
                message,
                location: None,
            },
            ApiError::SlotAlreadyTaken => Self::new(
                StatusCode::CONFLICT,
                String::from("Someone else just took this slot, please pick another"),
            ),
            ApiError::Conflict { .. } => Self::new(StatusCode::CONFLICT, err.to_string()),
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Internal server error"),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let Some(location) = self.location {
            return (self.status, [(LOCATION, location)]).into_response();
        }
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Resolves the locale of a board request.
fn request_locale(
    app_state: &AppState,
    session: &Session,
    query: &BoardQuery,
) -> Result<Locale, HttpError> {
    parse_locale(query.locale.as_deref(), app_state.default_locale)
        .map_err(|err| session.reject(err.into()))
}

/// Handler for GET `/events/{event_id}/status` endpoint.
///
/// Returns the derived temporal status of an event. Public.
async fn handle_get_event_status(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(event_id): Path<i64>,
) -> Result<Json<EventStatusResponse>, HttpError> {
    info!(event_id = event_id, "Handling get_event_status request");

    let mut persistence = app_state.persistence.lock().await;
    let response: EventStatusResponse = nakki_api::get_event_status(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/shifts` endpoint.
///
/// Returns the member view of the shift board.
async fn handle_get_shift_board(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(event_id): Path<i64>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardView>, HttpError> {
    info!(event_id = event_id, "Handling get_shift_board request");
    let locale: Locale = request_locale(&app_state, &session, &query)?;

    let mut persistence = app_state.persistence.lock().await;
    let board: BoardView = nakki_api::get_shift_board(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        app_state.clock.now(),
        locale,
        &app_state.formatter,
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(board))
}

/// Handler for GET `/events/{event_id}/shifts/manage` endpoint.
///
/// Returns the management view of the shift board.
async fn handle_get_management_board(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(event_id): Path<i64>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardView>, HttpError> {
    info!(event_id = event_id, "Handling get_management_board request");
    let locale: Locale = request_locale(&app_state, &session, &query)?;

    let mut persistence = app_state.persistence.lock().await;
    let board: BoardView = nakki_api::get_management_board(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        app_state.clock.now(),
        locale,
        &app_state.formatter,
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(board))
}

/// Handler for POST `/events/{event_id}/shifts` endpoint.
///
/// Schedules a shift definition for the event.
async fn handle_create_shift_instance(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(event_id): Path<i64>,
    Json(req): Json<CreateShiftInstanceRequest>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(
        event_id = event_id,
        definition_id = req.definition_id,
        "Handling create_shift_instance request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::create_shift_instance(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        req,
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/events/{event_id}/shift-group` endpoint.
///
/// Replaces the policy flags of the event's shift group.
async fn handle_update_group_policy(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateGroupPolicyRequest>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(event_id = event_id, "Handling update_group_policy request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::update_group_policy(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        req,
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/events/{event_id}/shift-group/admins/{member_id}`.
async fn handle_add_responsible_admin(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path((event_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(
        event_id = event_id,
        member_id = member_id,
        "Handling add_responsible_admin request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::add_responsible_admin(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        MemberId::new(member_id),
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/events/{event_id}/shift-group/admins/{member_id}`.
async fn handle_remove_responsible_admin(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path((event_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(
        event_id = event_id,
        member_id = member_id,
        "Handling remove_responsible_admin request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::remove_responsible_admin(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
        MemberId::new(member_id),
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/ticket-eligibility` endpoint.
async fn handle_check_ticket_reservation(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(event_id): Path<i64>,
) -> Result<Json<TicketEligibilityResponse>, HttpError> {
    info!(event_id = event_id, "Handling check_ticket_reservation request");

    let mut persistence = app_state.persistence.lock().await;
    let response: TicketEligibilityResponse = nakki_api::check_ticket_reservation(
        &mut persistence,
        &session.actor,
        EventId::new(event_id),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/shifts/{instance_id}/times` endpoint.
///
/// Moves or resizes a shift. Occupied slots outside the new window are
/// kept and reported as warnings.
async fn handle_reschedule_shift_instance(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(instance_id): Path<i64>,
    Json(req): Json<RescheduleShiftRequest>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(instance_id = instance_id, "Handling reschedule_shift_instance request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::reschedule_shift_instance(
        &mut persistence,
        &session.actor,
        ShiftInstanceId::new(instance_id),
        &req,
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/shifts/{instance_id}/details` endpoint.
async fn handle_update_shift_details(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(instance_id): Path<i64>,
    Json(req): Json<UpdateShiftDetailsRequest>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(instance_id = instance_id, "Handling update_shift_details request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::update_shift_details(
        &mut persistence,
        &session.actor,
        ShiftInstanceId::new(instance_id),
        req,
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/shifts/{instance_id}/trim` endpoint.
///
/// Removes open slots from the end of a shift.
async fn handle_remove_trailing_slots(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(instance_id): Path<i64>,
    Json(req): Json<RemoveTrailingSlotsRequest>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(
        instance_id = instance_id,
        count = req.count,
        "Handling remove_trailing_slots request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::remove_trailing_slots(
        &mut persistence,
        &session.actor,
        ShiftInstanceId::new(instance_id),
        req,
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/shifts/{instance_id}` endpoint.
async fn handle_delete_shift_instance(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(instance_id): Path<i64>,
) -> Result<Json<ShiftChangeResponse>, HttpError> {
    info!(instance_id = instance_id, "Handling delete_shift_instance request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftChangeResponse = nakki_api::delete_shift_instance(
        &mut persistence,
        &session.actor,
        ShiftInstanceId::new(instance_id),
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bookings/{booking_id}/claim` endpoint.
async fn handle_claim_slot(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(booking_id = booking_id, "Handling claim_slot request");

    let mut persistence = app_state.persistence.lock().await;
    let response: BookingResponse = nakki_api::claim_slot(
        &mut persistence,
        &session.actor,
        ShiftBookingId::new(booking_id),
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bookings/{booking_id}/release` endpoint.
async fn handle_release_slot(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(booking_id = booking_id, "Handling release_slot request");

    let mut persistence = app_state.persistence.lock().await;
    let response: BookingResponse = nakki_api::release_slot(
        &mut persistence,
        &session.actor,
        ShiftBookingId::new(booking_id),
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bookings/{booking_id}/assign` endpoint.
async fn handle_assign_slot(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
    Path(booking_id): Path<i64>,
    Json(req): Json<AssignSlotRequest>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(
        booking_id = booking_id,
        member_id = req.member_id,
        "Handling assign_slot request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: BookingResponse = nakki_api::assign_slot(
        &mut persistence,
        &session.actor,
        ShiftBookingId::new(booking_id),
        req,
        app_state.clock.now(),
    )
    .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/me/bookings` endpoint.
async fn handle_list_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    session: Session,
) -> Result<Json<MyBookingsResponse>, HttpError> {
    info!("Handling list_my_bookings request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MyBookingsResponse =
        nakki_api::list_my_bookings(&mut persistence, &session.actor)
            .map_err(|err| session.reject(err))?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/events/{event_id}/status", get(handle_get_event_status))
        .route(
            "/events/{event_id}/shifts",
            get(handle_get_shift_board).post(handle_create_shift_instance),
        )
        .route(
            "/events/{event_id}/shifts/manage",
            get(handle_get_management_board),
        )
        .route(
            "/events/{event_id}/shift-group",
            put(handle_update_group_policy),
        )
        .route(
            "/events/{event_id}/shift-group/admins/{member_id}",
            put(handle_add_responsible_admin).delete(handle_remove_responsible_admin),
        )
        .route(
            "/events/{event_id}/ticket-eligibility",
            get(handle_check_ticket_reservation),
        )
        .route(
            "/shifts/{instance_id}/times",
            put(handle_reschedule_shift_instance),
        )
        .route(
            "/shifts/{instance_id}/details",
            put(handle_update_shift_details),
        )
        .route("/shifts/{instance_id}/trim", post(handle_remove_trailing_slots))
        .route("/shifts/{instance_id}", delete(handle_delete_shift_instance))
        .route("/bookings/{booking_id}/claim", post(handle_claim_slot))
        .route("/bookings/{booking_id}/release", post(handle_release_slot))
        .route("/bookings/{booking_id}/assign", post(handle_assign_slot))
        .route("/me/bookings", get(handle_list_my_bookings))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Nakki Server");

    let formatter: LocalTimeFormatter = LocalTimeFormatter::new(&args.timezone)?;
    let default_locale: Locale = args.default_locale.parse()?;
    info!(
        timezone = formatter.timezone_name(),
        default_locale = %default_locale,
        "Slot labels configured"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Arc::new(SystemClock),
        formatter,
        login_url: args.login_url,
        default_locale,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
