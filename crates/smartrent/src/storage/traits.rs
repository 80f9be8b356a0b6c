//! Repository trait definitions.

use async_trait::async_trait;

use super::query::{AlertFilters, ListOptions, Page};
use crate::entities::{Alert, AlertStats, Department, User};
use crate::errors::SmartRentResult;

/// Persistence interface for alerts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Persist a new alert, assigning its id
    async fn create(&self, alert: Alert) -> SmartRentResult<Alert>;

    /// Load a single alert by ID
    async fn find_by_id(&self, id: &str) -> SmartRentResult<Option<Alert>>;

    /// Filtered, sorted, paginated listing
    async fn find_many(
        &self,
        filters: &AlertFilters,
        options: &ListOptions,
    ) -> SmartRentResult<Page<Alert>>;

    /// Save changes to an existing alert.
    ///
    /// Succeeds only when the stored version equals `alert.version()`;
    /// otherwise returns `SmartRentError::VersionConflict`. The returned
    /// alert carries the new version.
    async fn update(&self, alert: &Alert) -> SmartRentResult<Alert>;

    /// Free-text search over title and description, within `filters`
    async fn search_by_text(
        &self,
        term: &str,
        filters: &AlertFilters,
        options: &ListOptions,
    ) -> SmartRentResult<Page<Alert>>;

    /// Aggregate statistics over matching alerts
    async fn get_stats(&self, filters: &AlertFilters) -> SmartRentResult<AlertStats>;

    /// Count matching alerts
    async fn count(&self, filters: &AlertFilters) -> SmartRentResult<u64>;

    /// Remove an alert; returns `false` if it did not exist
    async fn delete(&self, id: &str) -> SmartRentResult<bool>;
}

/// Persistence interface for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> SmartRentResult<Option<User>>;

    async fn exists(&self, id: &str) -> SmartRentResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Insert or replace a user
    async fn create(&self, user: User) -> SmartRentResult<User>;
}

/// Persistence interface for departments
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> SmartRentResult<Option<Department>>;

    async fn find_by_code(&self, code: &str) -> SmartRentResult<Option<Department>>;

    async fn exists(&self, id: &str) -> SmartRentResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// All departments ordered by code
    async fn list(&self) -> SmartRentResult<Vec<Department>>;

    async fn create(&self, department: Department) -> SmartRentResult<Department>;

    async fn update(&self, department: &Department) -> SmartRentResult<()>;

    async fn delete(&self, id: &str) -> SmartRentResult<bool>;
}
