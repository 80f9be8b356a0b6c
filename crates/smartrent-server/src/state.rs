//! Shared handler state.

use std::sync::Arc;

use smartrent::{AlertsDomain, DepartmentsDomain, MemoryStore};

/// Domains shared by every request
#[derive(Clone)]
pub struct AppState {
    pub alerts: Arc<AlertsDomain>,
    pub departments: Arc<DepartmentsDomain>,
}

impl AppState {
    /// Wire both domains to a single store
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            alerts: Arc::new(AlertsDomain::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            departments: Arc::new(DepartmentsDomain::new(store.clone(), store)),
        }
    }
}
