//! Requester identity and the role rules shared by all domains.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::entities::{Alert, UserRole};
use crate::errors::{SmartRentError, SmartRentResult};

/// The authenticated caller of a use-case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub role: UserRole,
}

impl Requester {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, UserRole::Admin)
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(id, UserRole::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Fail unless the requester is an administrator
pub(crate) fn ensure_admin(requester: &Requester, action: &str) -> SmartRentResult<()> {
    if requester.is_admin() {
        return Ok(());
    }
    warn!(requester_id = %requester.id, action, "Admin-only action denied");
    Err(SmartRentError::forbidden(format!(
        "only administrators may {action}"
    )))
}

/// Administrators see every alert; other users only their own reports
pub(crate) fn ensure_can_access(requester: &Requester, alert: &Alert) -> SmartRentResult<()> {
    if requester.is_admin() || alert.reporter_id() == requester.id {
        return Ok(());
    }
    warn!(
        requester_id = %requester.id,
        alert_id = alert.id().unwrap_or_default(),
        "Alert access denied"
    );
    Err(SmartRentError::forbidden(
        "you can only access alerts you reported",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AlertCategory, AlertPriority, NewAlert};

    fn alert_by(reporter: &str) -> Alert {
        Alert::new(NewAlert {
            title: "Noisy neighbours".to_string(),
            description: "Loud music every night".to_string(),
            category: AlertCategory::Noise,
            priority: AlertPriority::Low,
            reporter_id: reporter.to_string(),
            department_id: "D1".to_string(),
            images: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_admin_can_access_any_alert() {
        assert!(ensure_can_access(&Requester::admin("A1"), &alert_by("U1")).is_ok());
    }

    #[test]
    fn test_user_limited_to_own_alerts() {
        let alert = alert_by("U1");
        assert!(ensure_can_access(&Requester::user("U1"), &alert).is_ok());
        let err = ensure_can_access(&Requester::user("U2"), &alert).unwrap_err();
        assert!(matches!(err, SmartRentError::Forbidden { .. }));
    }

    #[test]
    fn test_ensure_admin() {
        assert!(ensure_admin(&Requester::admin("A1"), "do things").is_ok());
        let err = ensure_admin(&Requester::user("U1"), "change alert status").unwrap_err();
        assert!(err.to_string().contains("change alert status"));
    }
}
