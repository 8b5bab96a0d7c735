//! Error types for Roster

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Missing or malformed input. The client can fix the request.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    NotFound(String),

    /// A uniqueness rule (email) would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend I/O or internal failure, including timeouts.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RosterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RosterError::Conflict(_))
    }

    /// Short machine-readable kind, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::Validation(_) => "validation",
            RosterError::NotFound(_) => "not_found",
            RosterError::Conflict(_) => "conflict",
            RosterError::Storage(_) => "storage",
        }
    }
}
