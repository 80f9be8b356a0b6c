#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

//! # SmartRent
//!
//! Maintenance alert lifecycle for a property-rental backend.
//!
//! This crate provides:
//! - The `Alert` entity and its status state machine
//! - Users and departments (rental units) referenced by alerts
//! - Repository traits plus an in-memory store with optional JSON snapshots
//! - Use-case domains enforcing role-based permissions
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use smartrent::{AlertsDomain, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new());
//! let alerts = AlertsDomain::new(store.clone(), store.clone(), store);
//!
//! let page = alerts.list_alerts(&AlertQuery::default(), &requester).await?;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Storage layer
pub mod storage;

// Use-case domains
pub mod domain;

// Re-export key types for convenience
pub use domain::{
    AlertQuery, AlertsDomain, DepartmentsDomain, ErrorBody, NewDepartment, Outcome, Requester,
};
pub use entities::{
    Alert, AlertCategory, AlertNote, AlertPriority, AlertState, AlertStats, AlertStatus,
    Department, MonthlyTrend, NewAlert, User, UserRole,
};
pub use errors::{ErrorKind, SmartRentError, SmartRentResult};
pub use storage::{
    AlertFilters, AlertRepository, DepartmentRepository, ListOptions, MemoryStore, Page,
    Pagination, SortKey, SortOrder, UserRepository,
};
