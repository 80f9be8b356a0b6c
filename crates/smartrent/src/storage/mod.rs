//! Storage layer for alert, user and department persistence.

mod memory;
mod query;
mod traits;

pub use memory::MemoryStore;
pub use query::{
    AlertFilters, ListOptions, Page, Pagination, SortKey, SortOrder, DEFAULT_LIMIT, MAX_LIMIT,
};
pub use traits::{AlertRepository, DepartmentRepository, UserRepository};

#[cfg(test)]
pub use traits::MockAlertRepository;
