//! Core data structures for alert and unit management.

mod alert;
mod department;
mod state;
mod stats;
mod user;

pub use alert::{
    Alert, AlertCategory, AlertNote, AlertPriority, AlertStatus, NewAlert, DESCRIPTION_MAX_LEN,
    MAX_IMAGES, TITLE_MAX_LEN,
};
pub use department::{normalize_code, Department};
pub use state::AlertState;
pub use stats::{AlertStats, MonthlyTrend, OVERDUE_AFTER_DAYS, TREND_MONTHS};
pub use user::{User, UserRole};
