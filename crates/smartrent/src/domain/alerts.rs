//! Alerts domain facade.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::permissions::{ensure_admin, ensure_can_access, Requester};
use crate::entities::{Alert, AlertPriority, AlertStats, AlertStatus, NewAlert, MAX_IMAGES};
use crate::errors::{SmartRentError, SmartRentResult};
use crate::storage::{
    AlertFilters, AlertRepository, DepartmentRepository, ListOptions, Page, UserRepository,
};

/// Maximum note length in characters (after trimming)
pub const NOTE_MAX_LEN: usize = 500;

/// Listing request: filters, page selection and optional text search
#[derive(Debug, Clone, Default)]
pub struct AlertQuery {
    pub filters: AlertFilters,
    pub options: ListOptions,
    /// Searches title and description instead of plain listing
    pub search: Option<String>,
}

fn validated_note(note: &str) -> SmartRentResult<&str> {
    let note = note.trim();
    if note.is_empty() {
        return Err(SmartRentError::validation("note must not be empty"));
    }
    if note.chars().count() > NOTE_MAX_LEN {
        return Err(SmartRentError::validation(format!(
            "note must be at most {NOTE_MAX_LEN} characters"
        )));
    }
    Ok(note)
}

/// Alert use-cases: permission check, load, mutate, persist
pub struct AlertsDomain {
    alerts: Arc<dyn AlertRepository>,
    users: Arc<dyn UserRepository>,
    departments: Arc<dyn DepartmentRepository>,
}

impl AlertsDomain {
    /// Create a new alerts domain
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        users: Arc<dyn UserRepository>,
        departments: Arc<dyn DepartmentRepository>,
    ) -> Self {
        Self {
            alerts,
            users,
            departments,
        }
    }

    async fn load(&self, alert_id: &str) -> SmartRentResult<Alert> {
        self.alerts
            .find_by_id(alert_id)
            .await?
            .ok_or_else(|| SmartRentError::AlertNotFound {
                alert_id: alert_id.to_string(),
            })
    }

    /// Load an alert the requester may act on as reporter or admin
    async fn load_accessible(
        &self,
        alert_id: &str,
        requester: &Requester,
    ) -> SmartRentResult<Alert> {
        let alert = self.load(alert_id).await?;
        ensure_can_access(requester, &alert)?;
        Ok(alert)
    }

    /// File a new alert. Identical submissions are all accepted.
    pub async fn create_alert(&self, input: NewAlert) -> SmartRentResult<Alert> {
        if !self.users.exists(&input.reporter_id).await? {
            return Err(SmartRentError::UserNotFound {
                user_id: input.reporter_id,
            });
        }
        if !self.departments.exists(&input.department_id).await? {
            return Err(SmartRentError::DepartmentNotFound {
                department_id: input.department_id,
            });
        }
        if input.images.len() > MAX_IMAGES {
            return Err(SmartRentError::validation(format!(
                "an alert can have at most {MAX_IMAGES} images"
            )));
        }

        let alert = self.alerts.create(Alert::new(input)?).await?;
        info!(
            alert_id = alert.id().unwrap_or_default(),
            reporter_id = alert.reporter_id(),
            department_id = alert.department_id(),
            category = %alert.category(),
            priority = %alert.priority(),
            "Alert created"
        );
        Ok(alert)
    }

    /// Get a specific alert by ID
    pub async fn get_alert(&self, alert_id: &str, requester: &Requester) -> SmartRentResult<Alert> {
        let alert = self.load_accessible(alert_id, requester).await?;
        debug!(alert_id, requester_id = %requester.id, "Alert loaded");
        Ok(alert)
    }

    /// List alerts visible to the requester
    pub async fn list_alerts(
        &self,
        query: &AlertQuery,
        requester: &Requester,
    ) -> SmartRentResult<Page<Alert>> {
        query.options.validate()?;

        let mut filters = query.filters.clone();
        if !requester.is_admin() {
            filters.reporter_id = Some(requester.id.clone());
        }

        let page = match query.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                self.alerts
                    .search_by_text(term, &filters, &query.options)
                    .await?
            }
            _ => self.alerts.find_many(&filters, &query.options).await?,
        };

        debug!(
            requester_id = %requester.id,
            returned = page.items.len(),
            total = page.pagination.total_count,
            "Alerts listed"
        );
        Ok(page)
    }

    /// Move an alert through its lifecycle (admin only).
    ///
    /// Entering IN_PROGRESS without an assignee assigns the requester.
    pub async fn update_status(
        &self,
        alert_id: &str,
        status: AlertStatus,
        requester: &Requester,
        notes: Option<&str>,
    ) -> SmartRentResult<Alert> {
        ensure_admin(requester, "change alert status")?;

        let note = match notes.map(str::trim) {
            Some(text) if !text.is_empty() => Some(validated_note(text)?),
            _ => None,
        };

        let mut alert = self.load(alert_id).await?;
        let from = alert.status();

        if let Err(err) = alert.transition_to(status) {
            warn!(alert_id, %from, to = %status, "Rejected status transition");
            return Err(err);
        }
        if let Some(text) = note {
            alert.add_note(text, requester.id.clone())?;
        }
        if status == AlertStatus::InProgress && alert.assigned_to().is_none() {
            alert.assign_to(requester.id.clone());
        }

        let alert = self.alerts.update(&alert).await?;
        info!(
            alert_id,
            %from,
            to = %status,
            requester_id = %requester.id,
            "Alert status updated"
        );
        Ok(alert)
    }

    /// Append a note as reporter or admin
    pub async fn add_note(
        &self,
        alert_id: &str,
        note: &str,
        requester: &Requester,
    ) -> SmartRentResult<Alert> {
        let note = validated_note(note)?;
        let mut alert = self.load_accessible(alert_id, requester).await?;
        alert.add_note(note, requester.id.clone())?;

        let alert = self.alerts.update(&alert).await?;
        info!(alert_id, author_id = %requester.id, "Note added to alert");
        Ok(alert)
    }

    /// Change urgency (admin only, any status)
    pub async fn update_priority(
        &self,
        alert_id: &str,
        priority: AlertPriority,
        requester: &Requester,
    ) -> SmartRentResult<Alert> {
        ensure_admin(requester, "change alert priority")?;
        let mut alert = self.load(alert_id).await?;
        alert.update_priority(priority);

        let alert = self.alerts.update(&alert).await?;
        info!(alert_id, priority = %priority, "Alert priority updated");
        Ok(alert)
    }

    /// Assign staff to an alert (admin only, any status)
    pub async fn assign_alert(
        &self,
        alert_id: &str,
        staff_id: &str,
        requester: &Requester,
    ) -> SmartRentResult<Alert> {
        ensure_admin(requester, "assign alerts")?;
        if !self.users.exists(staff_id).await? {
            return Err(SmartRentError::UserNotFound {
                user_id: staff_id.to_string(),
            });
        }
        let mut alert = self.load(alert_id).await?;
        alert.assign_to(staff_id);

        let alert = self.alerts.update(&alert).await?;
        info!(alert_id, staff_id, "Alert assigned");
        Ok(alert)
    }

    pub async fn add_image(
        &self,
        alert_id: &str,
        url: &str,
        requester: &Requester,
    ) -> SmartRentResult<Alert> {
        let mut alert = self.load_accessible(alert_id, requester).await?;
        alert.add_image(url)?;

        let alert = self.alerts.update(&alert).await?;
        info!(alert_id, images = alert.images().len(), "Image attached to alert");
        Ok(alert)
    }

    /// Detach an image; unknown URLs leave the alert untouched
    pub async fn remove_image(
        &self,
        alert_id: &str,
        url: &str,
        requester: &Requester,
    ) -> SmartRentResult<Alert> {
        let mut alert = self.load_accessible(alert_id, requester).await?;
        if !alert.remove_image(url) {
            return Ok(alert);
        }

        let alert = self.alerts.update(&alert).await?;
        info!(alert_id, images = alert.images().len(), "Image removed from alert");
        Ok(alert)
    }

    /// Administrative cleanup
    pub async fn delete_alert(&self, alert_id: &str, requester: &Requester) -> SmartRentResult<()> {
        ensure_admin(requester, "delete alerts")?;
        if !self.alerts.delete(alert_id).await? {
            return Err(SmartRentError::AlertNotFound {
                alert_id: alert_id.to_string(),
            });
        }
        info!(alert_id, requester_id = %requester.id, "Alert deleted");
        Ok(())
    }

    /// Dashboard statistics (admin only)
    pub async fn get_stats(
        &self,
        filters: &AlertFilters,
        requester: &Requester,
    ) -> SmartRentResult<AlertStats> {
        ensure_admin(requester, "view alert statistics")?;
        self.alerts.get_stats(filters).await
    }
}
