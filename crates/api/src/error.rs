// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Domain, core and persistence errors are translated explicitly; none of
//! them leaks through the API contract.

use nakki::{AccessError, CoreError, PolicyViolation};
use nakki_domain::DomainError;
use nakki_persistence::PersistenceError;
use tracing::error;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No authenticated actor; the caller should log in.
    Unauthenticated,
    /// The actor is authenticated but may not perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
    },
    /// A booking policy rejected the action.
    PolicyViolation {
        /// Stable machine-readable code.
        code: String,
        /// User-readable reason.
        message: String,
    },
    /// The slot is held by somebody else.
    SlotAlreadyTaken,
    /// The resource changed or is in a state that prevents the action.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Authentication required"),
            Self::Forbidden { action } => write!(f, "Not authorized to {action}"),
            Self::PolicyViolation { code, message } => {
                write!(f, "Policy violation ({code}): {message}")
            }
            Self::SlotAlreadyTaken => write!(f, "The slot is already taken"),
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PolicyViolation> for ApiError {
    fn from(violation: PolicyViolation) -> Self {
        Self::PolicyViolation {
            code: violation.code().to_string(),
            message: violation.message().to_string(),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => Self::Unauthenticated,
            AccessError::Forbidden { action } => Self::Forbidden { action },
            AccessError::BoardClosed => Self::Forbidden {
                action: String::from("view the shift board"),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// Consistency bugs (`InvalidRange`, `SlotNotFound`, `MisalignedSlot`)
/// become internal errors and are logged.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRange { .. }
        | DomainError::SlotNotFound { .. }
        | DomainError::MisalignedSlot { .. } => {
            error!(error = %err, "Shift data consistency failure");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
        DomainError::InvalidInterval { .. } => ApiError::InvalidInput {
            field: String::from("interval_minutes"),
            message: err.to_string(),
        },
        DomainError::InvalidSlotCount { .. } => ApiError::InvalidInput {
            field: String::from("count"),
            message: err.to_string(),
        },
        DomainError::ShiftDefinitionInUse { .. } | DomainError::OccupiedTrailingSlot { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        DomainError::ShiftInstanceNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Shift"),
            message: format!("Shift {id} does not exist"),
        },
        DomainError::BookingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {id} does not exist"),
        },
        DomainError::ShiftDefinitionNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Shift definition"),
            message: format!("Shift definition {id} does not exist"),
        },
        DomainError::InvalidTimezone(_) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: err.to_string(),
        },
        DomainError::InvalidLocale(_) => ApiError::InvalidInput {
            field: String::from("locale"),
            message: err.to_string(),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Access(access_err) => access_err.into(),
        CoreError::Policy(violation) => violation.into(),
        CoreError::SlotAlreadyTaken { .. } => ApiError::SlotAlreadyTaken,
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::EventNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Event"),
            message: format!("Event {id} does not exist"),
        },
        PersistenceError::ShiftGroupNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Shift group"),
            message: format!("Event {id} has no shift group"),
        },
        PersistenceError::BookingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {id} does not exist"),
        },
        PersistenceError::NotFound(what) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message: format!("{what} does not exist"),
        },
        PersistenceError::SlotAlreadyTaken { .. } => ApiError::SlotAlreadyTaken,
        PersistenceError::BookingChanged(id) => ApiError::Conflict {
            message: format!("Booking {id} changed while the request was processed"),
        },
        PersistenceError::UniqueViolation(msg) => ApiError::Conflict { message: msg },
        PersistenceError::ForeignKeyViolation(msg) => ApiError::InvalidInput {
            field: String::from("reference"),
            message: msg,
        },
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        other => {
            error!(error = %other, "Persistence failure");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
