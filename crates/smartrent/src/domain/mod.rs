//! Use-case layer.
//!
//! Each domain takes its repositories at construction time and enforces the
//! role rules before touching storage.

mod alerts;
mod departments;
mod outcome;
mod permissions;

pub use alerts::{AlertQuery, AlertsDomain, NOTE_MAX_LEN};
pub use departments::{DepartmentsDomain, NewDepartment};
pub use outcome::{ErrorBody, Outcome, INTERNAL_ERROR_MESSAGE};
pub use permissions::Requester;
