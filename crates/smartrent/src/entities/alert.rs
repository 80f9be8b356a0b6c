//! Alert entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::AlertState;
use crate::errors::{SmartRentError, SmartRentResult};

/// Maximum title length in characters (after trimming)
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum description length in characters (after trimming)
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Maximum number of images attached to one alert
pub const MAX_IMAGES: usize = 3;

/// Normalize a wire token: trim, upper-case, `-`/space to `_`
pub(crate) fn wire_token(s: &str) -> String {
    s.trim().to_uppercase().replace(['-', ' '], "_")
}

/// Deserialize through `FromStr` so JSON bodies accept the same spellings
/// as query strings.
macro_rules! deserialize_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let raw = String::deserialize(deserializer)?;
                    raw.parse().map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

pub(crate) use deserialize_from_str;

/// Alert lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Cancelled,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Resolved,
        Self::Cancelled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "PENDING" | "PENDIENTE" => Ok(Self::Pending),
            "IN_PROGRESS" | "INPROGRESS" | "EN_PROGRESO" => Ok(Self::InProgress),
            "RESOLVED" | "RESUELTO" => Ok(Self::Resolved),
            "CANCELLED" | "CANCELED" | "CANCELADO" => Ok(Self::Cancelled),
            _ => Err(SmartRentError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Alert urgency, independent of status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl AlertPriority {
    pub const ALL: [AlertPriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl std::fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertPriority {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "LOW" | "BAJA" => Ok(Self::Low),
            "MEDIUM" | "MED" | "MEDIA" => Ok(Self::Medium),
            "HIGH" | "ALTA" => Ok(Self::High),
            "URGENT" | "URGENTE" => Ok(Self::Urgent),
            _ => Err(SmartRentError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// What kind of problem the alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    Maintenance,
    Cleaning,
    Security,
    Services,
    Noise,
    Other,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 6] = [
        Self::Maintenance,
        Self::Cleaning,
        Self::Security,
        Self::Services,
        Self::Noise,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maintenance => "MAINTENANCE",
            Self::Cleaning => "CLEANING",
            Self::Security => "SECURITY",
            Self::Services => "SERVICES",
            Self::Noise => "NOISE",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertCategory {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "MAINTENANCE" | "MANTENIMIENTO" => Ok(Self::Maintenance),
            "CLEANING" | "LIMPIEZA" => Ok(Self::Cleaning),
            "SECURITY" | "SEGURIDAD" => Ok(Self::Security),
            "SERVICES" | "SERVICIOS" => Ok(Self::Services),
            "NOISE" | "RUIDO" => Ok(Self::Noise),
            "OTHER" | "OTRO" => Ok(Self::Other),
            _ => Err(SmartRentError::InvalidCategory {
                category: s.to_string(),
            }),
        }
    }
}

deserialize_from_str!(AlertStatus, AlertPriority, AlertCategory);

/// A note appended to an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNote {
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Display for AlertNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}]: {}",
            self.created_at.to_rfc3339(),
            self.author_id,
            self.text
        )
    }
}

/// Input for constructing an alert
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub title: String,
    pub description: String,
    pub category: AlertCategory,
    pub priority: AlertPriority,
    pub reporter_id: String,
    pub department_id: String,
    pub images: Vec<String>,
}

/// Maintenance report raised against a rental unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Assigned by the repository on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    title: String,
    description: String,
    category: AlertCategory,
    priority: AlertPriority,

    #[serde(default)]
    status: AlertStatus,

    reporter_id: String,
    department_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_to: Option<String>,

    #[serde(default)]
    images: Vec<String>,

    /// Append-only
    #[serde(default)]
    notes: Vec<AlertNote>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolved_at: Option<DateTime<Utc>>,

    /// Write counter maintained by the repository
    #[serde(default)]
    version: u64,
}

fn validated_text(field: &str, value: &str, max: usize) -> SmartRentResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SmartRentError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(SmartRentError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validated_image(url: &str) -> SmartRentResult<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(SmartRentError::validation("image URL must not be empty"));
    }
    Ok(trimmed.to_string())
}

impl Alert {
    /// Create a new PENDING alert, validating every field
    pub fn new(input: NewAlert) -> SmartRentResult<Self> {
        let title = validated_text("title", &input.title, TITLE_MAX_LEN)?;
        let description = validated_text("description", &input.description, DESCRIPTION_MAX_LEN)?;

        if input.images.len() > MAX_IMAGES {
            return Err(SmartRentError::validation(format!(
                "an alert can have at most {MAX_IMAGES} images"
            )));
        }
        let images = input
            .images
            .iter()
            .map(|url| validated_image(url))
            .collect::<SmartRentResult<Vec<_>>>()?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            title,
            description,
            category: input.category,
            priority: input.priority,
            status: AlertStatus::Pending,
            reporter_id: input.reporter_id,
            department_id: input.department_id,
            assigned_to: None,
            images,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
            version: 0,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> AlertCategory {
        self.category
    }

    pub fn priority(&self) -> AlertPriority {
        self.priority
    }

    pub fn status(&self) -> AlertStatus {
        self.status
    }

    pub fn reporter_id(&self) -> &str {
        &self.reporter_id
    }

    pub fn department_id(&self) -> &str {
        &self.department_id
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn notes(&self) -> &[AlertNote] {
        &self.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set the storage identity. Repositories call this on `create`.
    pub fn assign_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Set the write counter. Repositories call this after each save.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Policy for the current status
    pub fn state(&self) -> &'static AlertState {
        AlertState::of(self.status)
    }

    pub fn valid_transitions(&self) -> &'static [AlertStatus] {
        self.state().valid_transitions()
    }

    pub fn can_transition_to(&self, status: AlertStatus) -> bool {
        self.state().can_transition_to(status)
    }

    /// Move to `status` if the state machine allows it
    pub fn transition_to(&mut self, status: AlertStatus) -> SmartRentResult<()> {
        let next = self.state().transition(status)?;
        let now = Utc::now();
        self.status = next;
        self.updated_at = now;
        if next == AlertStatus::Resolved && self.resolved_at.is_none() {
            self.resolved_at = Some(now);
        }
        Ok(())
    }

    pub fn assign_to(&mut self, staff_id: impl Into<String>) {
        self.assigned_to = Some(staff_id.into());
        self.updated_at = Utc::now();
    }

    /// Append a note; blank text is rejected
    pub fn add_note(&mut self, text: &str, author_id: impl Into<String>) -> SmartRentResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SmartRentError::validation("note must not be empty"));
        }
        let now = Utc::now();
        self.notes.push(AlertNote {
            author_id: author_id.into(),
            text: text.to_string(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    pub fn update_priority(&mut self, priority: AlertPriority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    pub fn add_image(&mut self, url: &str) -> SmartRentResult<()> {
        if self.images.len() >= MAX_IMAGES {
            return Err(SmartRentError::validation(format!(
                "an alert can have at most {MAX_IMAGES} images"
            )));
        }
        self.images.push(validated_image(url)?);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove an image; returns `false` when the URL was not attached
    pub fn remove_image(&mut self, url: &str) -> bool {
        let url = url.trim();
        if let Some(idx) = self.images.iter().position(|u| u == url) {
            self.images.remove(idx);
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, AlertStatus::Pending | AlertStatus::InProgress)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == AlertStatus::Resolved
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AlertStatus::Cancelled
    }

    pub fn is_high_priority(&self) -> bool {
        matches!(self.priority, AlertPriority::High | AlertPriority::Urgent)
    }

    /// Whole days the alert has been (or was) open, rounded up
    pub fn days_open(&self) -> i64 {
        self.days_open_at(Utc::now())
    }

    pub fn days_open_at(&self, now: DateTime<Utc>) -> i64 {
        const DAY_MS: i64 = 86_400_000;
        let end = self.resolved_at.unwrap_or(now);
        let elapsed = (end - self.created_at).num_milliseconds().max(0);
        (elapsed + DAY_MS - 1) / DAY_MS
    }

    /// Case-insensitive match against title and description
    pub fn matches_text(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }

    /// Re-check the construction rules on an alert loaded from elsewhere
    pub fn validate(&self) -> SmartRentResult<()> {
        validated_text("title", &self.title, TITLE_MAX_LEN)?;
        validated_text("description", &self.description, DESCRIPTION_MAX_LEN)?;
        if self.images.len() > MAX_IMAGES {
            return Err(SmartRentError::validation(format!(
                "an alert can have at most {MAX_IMAGES} images"
            )));
        }
        for url in &self.images {
            validated_image(url)?;
        }
        if self.status == AlertStatus::Resolved && self.resolved_at.is_none() {
            return Err(SmartRentError::validation(
                "resolved alert is missing its resolution time",
            ));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = created_at;
    }
}
