//! Department (rental unit) endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use smartrent::{Department, NewDepartment, Outcome};

use super::alerts::Deleted;
use crate::error::{respond, ApiError, ApiResult};
use crate::extract::Authenticated;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/departments",
            get(list_departments).post(create_department),
        )
        .route(
            "/api/departments/{id}",
            get(get_department).delete(delete_department),
        )
        .route(
            "/api/departments/{id}/tenant",
            put(assign_tenant).delete(release_tenant),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TenantBody {
    tenant_id: String,
}

async fn list_departments(
    State(state): State<AppState>,
    Authenticated(_requester): Authenticated,
) -> ApiResult<Vec<Department>> {
    respond(state.departments.list_departments().await)
}

async fn create_department(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    payload: Result<Json<NewDepartment>, JsonRejection>,
) -> Result<(StatusCode, Json<Outcome<Department>>), ApiError> {
    let Json(input) = payload?;
    let department = state
        .departments
        .create_department(input, &requester)
        .await?;
    Ok((StatusCode::CREATED, Json(Outcome::Success(department))))
}

async fn get_department(
    State(state): State<AppState>,
    Authenticated(_requester): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    respond(state.departments.get_department(&id).await)
}

async fn delete_department(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    state.departments.delete_department(&id, &requester).await?;
    respond(Ok(Deleted { id }))
}

async fn assign_tenant(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<TenantBody>, JsonRejection>,
) -> ApiResult<Department> {
    let Json(body) = payload?;
    respond(
        state
            .departments
            .assign_tenant(&id, &body.tenant_id, &requester)
            .await,
    )
}

async fn release_tenant(
    State(state): State<AppState>,
    Authenticated(requester): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    respond(state.departments.release_tenant(&id, &requester).await)
}
