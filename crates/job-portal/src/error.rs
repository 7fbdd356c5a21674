use rusqlite::ErrorCode;

/// Failure taxonomy shared by repositories, services, and the dispatcher.
///
/// Every business-rule violation is raised where the rule lives and crosses
/// layers unchanged; the dispatcher is the single point that turns a variant
/// into a response status.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Malformed or missing input. Always client-caused.
    #[error("{0}")]
    Validation(String),
    /// A referenced entity is absent or soft-deleted.
    #[error("{0}")]
    MissingReference(String),
    /// A referenced entity exists but its status forbids the operation.
    #[error("{0}")]
    StateConflict(String),
    /// A uniqueness rule was violated.
    #[error("{0}")]
    Duplicate(String),
    /// A role or ownership gate failed.
    #[error("{0}")]
    Forbidden(String),
    /// The targeted row is absent, soft-deleted, or the route is unknown.
    #[error("{0}")]
    NotFound(String),
    /// Store or other unexpected failure. Detail is logged at the dispatch
    /// boundary, not echoed to the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::MissingReference(_)
            | Self::StateConflict(_)
            | Self::Duplicate(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}

impl From<rusqlite::Error> for PortalError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Duplicate("uniqueness constraint violated".to_string())
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failure: {err}"))
    }
}
