//! Filtering, sorting and pagination types shared by repositories.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{Alert, AlertCategory, AlertPriority, AlertStatus};
use crate::errors::{SmartRentError, SmartRentResult};

/// Default page size
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted page size
pub const MAX_LIMIT: u32 = 100;

/// Alert filter set; empty lists and `None` mean "any"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilters {
    pub reporter_id: Option<String>,
    pub department_id: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Vec<AlertStatus>,
    pub category: Vec<AlertCategory>,
    pub priority: Vec<AlertPriority>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub active_only: bool,
}

impl AlertFilters {
    pub fn matches(&self, alert: &Alert) -> bool {
        if let Some(reporter) = &self.reporter_id {
            if alert.reporter_id() != reporter {
                return false;
            }
        }
        if let Some(department) = &self.department_id {
            if alert.department_id() != department {
                return false;
            }
        }
        if let Some(assignee) = &self.assigned_to {
            if alert.assigned_to() != Some(assignee.as_str()) {
                return false;
            }
        }
        if !self.status.is_empty() && !self.status.contains(&alert.status()) {
            return false;
        }
        if !self.category.is_empty() && !self.category.contains(&alert.category()) {
            return false;
        }
        if !self.priority.is_empty() && !self.priority.contains(&alert.priority()) {
            return false;
        }
        if self.created_from.is_some_and(|from| alert.created_at() < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| alert.created_at() > to) {
            return false;
        }
        !self.active_only || alert.is_active()
    }
}

/// Sortable alert fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
}

impl std::str::FromStr for SortKey {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "createdat" => Ok(Self::CreatedAt),
            "updatedat" => Ok(Self::UpdatedAt),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            _ => Err(SmartRentError::validation(format!(
                "unsupported sort key '{s}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(SmartRentError::validation(format!(
                "unsupported sort order '{s}'"
            ))),
        }
    }
}

/// Page selection and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based
    pub page: u32,
    pub limit: u32,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListOptions {
    pub fn validate(&self) -> SmartRentResult<()> {
        if self.page == 0 {
            return Err(SmartRentError::validation("page must be at least 1"));
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(SmartRentError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Ordering of two alerts under this sort; ties fall back to creation time
    pub fn compare(&self, a: &Alert, b: &Alert) -> Ordering {
        let primary = match self.sort {
            SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortKey::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
            SortKey::Priority => a.priority().cmp(&b.priority()),
            SortKey::Status => a.status().cmp(&b.status()),
        };
        let ordering = primary
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.id().cmp(&b.id()));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub limit: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = u32::try_from(total_count.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Slice an already filtered and sorted result set
    pub fn from_sorted(all: Vec<T>, options: &ListOptions) -> Self {
        let total = all.len() as u64;
        let limit = options.limit.max(1) as usize;
        let skip = (options.page.max(1) as usize - 1).saturating_mul(limit);
        let items = all.into_iter().skip(skip).take(limit).collect();
        Self {
            items,
            pagination: Pagination::new(options.page.max(1), options.limit, total),
        }
    }
}
