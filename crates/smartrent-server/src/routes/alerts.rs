//! Alert endpoints.

use std::str::FromStr;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use smartrent::{
    Alert, AlertCategory, AlertFilters, AlertPriority, AlertQuery, AlertStats, AlertStatus,
    ListOptions, NewAlert, Outcome, Page, SmartRentError, SmartRentResult,
};

use crate::error::{respond, ApiError, ApiResult};
use crate::extract::Authenticated;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/alerts", post(create_alert).get(list_alerts))
        .route("/api/alerts/stats", get(get_stats))
        .route("/api/alerts/{id}", get(get_alert).delete(delete_alert))
        .route("/api/alerts/{id}/status", patch(update_status))
        .route("/api/alerts/{id}/notes", post(add_note))
        .route("/api/alerts/{id}/priority", patch(update_priority))
        .route("/api/alerts/{id}/assign", patch(assign_alert))
        .route("/api/alerts/{id}/images", post(add_image).delete(remove_image))
}

/// Query string for listing and statistics; values arrive as raw text
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    sort: Option<String>,
    order: Option<String>,
    /// Comma-separated
    status: Option<String>,
    category: Option<String>,
    priority: Option<String>,
    department_id: Option<String>,
    assigned_to: Option<String>,
    reporter_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    active_only: Option<String>,
    search: Option<String>,
}

fn parse_list<T: FromStr<Err = SmartRentError>>(raw: Option<&str>) -> SmartRentResult<Vec<T>> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse::<T>)
            .collect()
    })
    .unwrap_or_else(|| Ok(Vec::new()))
}

fn parse_number(name: &str, raw: Option<&str>, default: u32) -> SmartRentResult<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            SmartRentError::validation(format!("{name} must be a positive integer"))
        }),
    }
}

/// Accepts RFC 3339 timestamps or plain dates; a plain `to` date covers the whole day
fn parse_date(
    name: &str,
    raw: Option<&str>,
    end_of_day: bool,
) -> SmartRentResult<Option<DateTime<Utc>>> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        SmartRentError::validation(format!("{name} must be a date or RFC 3339 timestamp"))
    })?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    Ok(time.map(|t| t.and_utc()))
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

impl ListParams {
    pub fn filters(&self) -> SmartRentResult<AlertFilters> {
        Ok(AlertFilters {
            reporter_id: non_empty(self.reporter_id.as_deref()),
            department_id: non_empty(self.department_id.as_deref()),
            assigned_to: non_empty(self.assigned_to.as_deref()),
            status: parse_list(self.status.as_deref())?,
            category: parse_list(self.category.as_deref())?,
            priority: parse_list(self.priority.as_deref())?,
            created_from: parse_date("from", self.from.as_deref(), false)?,
            created_to: parse_date("to", self.to.as_deref(), true)?,
            active_only: matches!(
                self.active_only.as_deref().map(str::trim),
                Some("true" | "1" | "yes")
            ),
        })
    }

    pub fn query(&self) -> SmartRentResult<AlertQuery> {
        let defaults = ListOptions::default();
        let options = ListOptions {
            page: parse_number("page", self.page.as_deref(), defaults.page)?,
            limit: parse_number("limit", self.limit.as_deref(), defaults.limit)?,
            sort: match self.sort.as_deref() {
                Some(raw) if !raw.trim().is_empty() => raw.parse()?,
                _ => defaults.sort,
            },
            order: match self.order.as_deref() {
                Some(raw) if !raw.trim().is_empty() => raw.parse()?,
                _ => defaults.order,
            },
        };
        Ok(AlertQuery {
            filters: self.filters()?,
            options,
            search: non_empty(self.search.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAlertBody {
    title: String,
    description: String,
    category: AlertCategory,
    #[serde(default)]
    priority: AlertPriority,
    department_id: String,
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: AlertStatus,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NoteBody {
    note: String,
}

#[derive(Debug, Deserialize)]
struct PriorityBody {
    priority: AlertPriority,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignBody {
    staff_id: String,
}

#[derive(Debug, Deserialize)]
struct ImageBody {
    url: String,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
}

async fn create_alert(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    payload: Result<Json<CreateAlertBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Outcome<Alert>>), ApiError> {
    let Json(body) = payload?;
    let input = NewAlert {
        title: body.title,
        description: body.description,
        category: body.category,
        priority: body.priority,
        reporter_id: requester.id,
        department_id: body.department_id,
        images: body.images,
    };
    let alert = state.alerts.create_alert(input).await?;
    Ok((StatusCode::CREATED, Json(Outcome::Success(alert))))
}

async fn list_alerts(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Alert>> {
    let query = params.query()?;
    respond(state.alerts.list_alerts(&query, &requester).await)
}

async fn get_stats(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Query(params): Query<ListParams>,
) -> ApiResult<AlertStats> {
    let filters = params.filters()?;
    respond(state.alerts.get_stats(&filters, &requester).await)
}

async fn get_alert(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Alert> {
    respond(state.alerts.get_alert(&id, &requester).await)
}

async fn delete_alert(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    state.alerts.delete_alert(&id, &requester).await?;
    respond(Ok(Deleted { id }))
}

async fn update_status(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<StatusBody>, JsonRejection>,
) -> ApiResult<Alert> {
    let Json(body) = payload?;
    respond(
        state
            .alerts
            .update_status(&id, body.status, &requester, body.notes.as_deref())
            .await,
    )
}

async fn add_note(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<NoteBody>, JsonRejection>,
) -> ApiResult<Alert> {
    let Json(body) = payload?;
    respond(state.alerts.add_note(&id, &body.note, &requester).await)
}

async fn update_priority(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<PriorityBody>, JsonRejection>,
) -> ApiResult<Alert> {
    let Json(body) = payload?;
    respond(
        state
            .alerts
            .update_priority(&id, body.priority, &requester)
            .await,
    )
}

async fn assign_alert(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<AssignBody>, JsonRejection>,
) -> ApiResult<Alert> {
    let Json(body) = payload?;
    respond(
        state
            .alerts
            .assign_alert(&id, &body.staff_id, &requester)
            .await,
    )
}

async fn add_image(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<ImageBody>, JsonRejection>,
) -> ApiResult<Alert> {
    let Json(body) = payload?;
    respond(state.alerts.add_image(&id, &body.url, &requester).await)
}

async fn remove_image(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<ImageBody>, JsonRejection>,
) -> ApiResult<Alert> {
    let Json(body) = payload?;
    respond(state.alerts.remove_image(&id, &body.url, &requester).await)
}
