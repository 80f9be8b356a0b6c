//! Department (rental unit) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rentable unit that alerts are filed against
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,

    /// Unique, upper-case unit code (e.g. "A-101")
    pub code: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Current tenant, if occupied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Department {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            code: normalize_code(&code.into()),
            name: name.into(),
            description: description.into(),
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.tenant_id.is_some()
    }

    pub fn set_tenant(&mut self, tenant_id: Option<String>) {
        self.tenant_id = tenant_id;
        self.updated_at = Utc::now();
    }
}

/// Canonical form of a unit code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
