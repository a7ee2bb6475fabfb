//! Errors returned by scheduling and billing operations.
//!
//! Every failure reaches the caller as one of four kinds (validation,
//! conflict, not-found, storage) plus `Forbidden` for role gating, with a
//! stable code the UI shell can switch on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::authorization::Capability;
use crate::blob::BlobError;
use crate::db::DatabaseError;
use crate::models::{InvalidYearMonth, Role};

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Time slot conflicts with appointment {conflicting_id} ({start} to {end})")]
    Conflict {
        conflicting_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Role '{role}' is not allowed to {capability}")]
    Forbidden { role: Role, capability: Capability },

    #[error("Storage error: {0}")]
    Storage(DatabaseError),

    #[error("Receipt storage error: {0}")]
    Blob(#[from] BlobError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Forbidden,
    Storage,
}

/// What the UI needs to render a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl ClinicError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Storage(_) | Self::Blob(_) => ErrorKind::Storage,
        }
    }

    /// Conflicts and validation failures leave no trace and can be retried
    /// with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::Conflict)
    }

    pub fn detail(&self) -> ErrorDetail {
        let code = match self.kind() {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Storage => "STORAGE",
        };
        ErrorDetail {
            code,
            message: self.to_string(),
        }
    }
}

impl From<DatabaseError> for ClinicError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Storage(other),
        }
    }
}

impl From<InvalidYearMonth> for ClinicError {
    fn from(err: InvalidYearMonth) -> Self {
        Self::Validation(err.to_string())
    }
}
