//! HTTP surface for SmartRent.
//!
//! Handlers translate requests into use-case calls and render every result
//! as a tagged `Outcome` envelope.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use config::{LogFormat, ServerConfig};
pub use state::AppState;

/// Build the application router with request tracing
pub fn build_router(state: AppState) -> Router {
    routes::router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
