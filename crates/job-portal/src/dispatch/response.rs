use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::PortalError;

/// Transport-neutral response: a status code plus a JSON payload. The api
/// service turns this into an actual HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(payload: impl Serialize) -> Self {
        Self::with_payload(200, payload)
    }

    pub fn created(payload: impl Serialize) -> Self {
        Self::with_payload(201, payload)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::message(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::message(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::message(404, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::message(500, message)
    }

    fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }

    fn with_payload(status: u16, payload: impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status, body },
            Err(err) => {
                error!(%err, "failed to serialize response payload");
                Self::server_error("Serialization error")
            }
        }
    }

    /// The single translation point from error kind to response shape.
    /// Internal detail goes to the log, not to the caller.
    pub fn from_error(err: &PortalError) -> Self {
        match err {
            PortalError::Internal(detail) => {
                error!(%detail, "request failed with internal error");
                Self::server_error("Internal server error")
            }
            PortalError::Forbidden(message) => Self::forbidden(message.clone()),
            PortalError::NotFound(message) => Self::not_found(message.clone()),
            PortalError::Validation(message)
            | PortalError::MissingReference(message)
            | PortalError::StateConflict(message)
            | PortalError::Duplicate(message) => {
                warn!(status = err.status_code(), %message, "request rejected");
                Self::bad_request(message.clone())
            }
        }
    }
}
