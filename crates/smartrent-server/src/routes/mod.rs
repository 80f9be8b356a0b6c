//! HTTP route table.

mod alerts;
mod departments;
mod health;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(alerts::router())
        .merge(departments::router())
}
