//! Route table for the HTTP surface.

use super::handlers::{oauth, platforms, projects, webhooks};
use super::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Builds the application router over shared state.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/oauth/{platform}", get(oauth::begin))
        .route("/oauth/{platform}/callback", get(oauth::callback))
        .route("/platforms", get(platforms::list).post(platforms::connect))
        .route(
            "/platforms/{platform}",
            get(platforms::status).delete(platforms::disconnect),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::get).delete(projects::delete),
        )
        .route("/projects/{id}/deploy", post(projects::deploy))
        .route(
            "/projects/{id}/domains",
            get(projects::list_domains)
                .post(projects::add_domain)
                .delete(projects::remove_domain),
        )
        .route("/projects/{id}/status", get(projects::status))
        .route("/projects/{id}/logs", get(projects::logs))
        .route("/webhook/{platform}", post(webhooks::receive))
        .with_state(state)
}
