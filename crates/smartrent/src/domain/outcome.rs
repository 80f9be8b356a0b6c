//! Tagged success/error results returned at the use-case boundary.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::error;

use crate::errors::{ErrorKind, SmartRentError, SmartRentResult};

/// Message shown for internal failures in place of their detail
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Error payload of a failed outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    #[serde(skip)]
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
}

impl ErrorBody {
    /// Convert an error, hiding internal detail
    pub fn from_error(err: &SmartRentError) -> Self {
        let kind = err.kind();
        let message = if kind == ErrorKind::Internal {
            error!(error = %err, "Unexpected failure in use-case");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            err.to_string()
        };
        Self {
            kind,
            code: kind.code(),
            message,
        }
    }
}

/// Result of a use-case as reported to clients.
///
/// Serializes as `{"success": true, "data": ..}` or
/// `{"success": false, "error": {"code": .., "message": ..}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorBody),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            Self::Success(_) => None,
            Self::Failure(body) => Some(body),
        }
    }
}

impl<T> From<SmartRentResult<T>> for Outcome<T> {
    fn from(result: SmartRentResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(ErrorBody::from_error(&err)),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(body) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", body)?;
            }
        }
        state.end()
    }
}
