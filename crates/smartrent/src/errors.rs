//! Error types for the smartrent crate.

use thiserror::Error;

use crate::entities::AlertStatus;

/// Coarse classification used at the use-case boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Validation,
    InvalidTransition,
    Conflict,
    Internal,
}

impl ErrorKind {
    /// Stable wire code for this kind
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Comprehensive error types for alert and department management
#[derive(Error, Debug, Clone)]
pub enum SmartRentError {
    // Lookup errors
    #[error("Alert '{alert_id}' not found")]
    AlertNotFound { alert_id: String },

    #[error("User '{user_id}' not found")]
    UserNotFound { user_id: String },

    #[error("Department '{department_id}' not found")]
    DepartmentNotFound { department_id: String },

    // Permission errors
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    // Input errors
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("Invalid status: '{status}'")]
    InvalidStatus { status: String },

    #[error("Invalid priority: '{priority}'")]
    InvalidPriority { priority: String },

    #[error("Invalid category: '{category}'")]
    InvalidCategory { category: String },

    #[error("Invalid role: '{role}'")]
    InvalidRole { role: String },

    // State machine errors
    #[error(
        "Cannot transition alert from {from} to {to}. Valid transitions: {}",
        format_transitions(.valid)
    )]
    InvalidTransition {
        from: AlertStatus,
        to: AlertStatus,
        valid: Vec<AlertStatus>,
    },

    // Conflict errors
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Alert '{alert_id}' was modified concurrently (expected version {expected})")]
    VersionConflict { alert_id: String, expected: u64 },

    // Storage errors
    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    #[error("Failed to parse JSON: {reason}")]
    JsonParseError { reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

fn format_transitions(valid: &[AlertStatus]) -> String {
    if valid.is_empty() {
        "none".to_string()
    } else {
        valid
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl SmartRentError {
    /// Classify this error for the use-case boundary
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlertNotFound { .. } | Self::UserNotFound { .. } | Self::DepartmentNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Validation { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidPriority { .. }
            | Self::InvalidCategory { .. }
            | Self::InvalidRole { .. } => ErrorKind::Validation,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Conflict { .. } | Self::VersionConflict { .. } => ErrorKind::Conflict,
            Self::StorageError { .. }
            | Self::FileReadError { .. }
            | Self::FileWriteError { .. }
            | Self::JsonParseError { .. }
            | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Shorthand for a validation failure
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a permission failure
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Shorthand for a conflict
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for SmartRentError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SmartRentError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for smartrent operations
pub type SmartRentResult<T> = Result<T, SmartRentError>;
