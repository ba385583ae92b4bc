//! Route definitions for the REST API.

mod events;
mod health;
mod issues;
mod webhook;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Webhook ingestion
        .route("/webhook", get(webhook::webhook_probe))
        .route("/webhook", post(webhook::handle_webhook))
        .route("/events", get(events::recent_events))
        // Liveness
        .route("/healthz", get(health::health_check))
        // Issue CRUD proxy
        .route("/issues", post(issues::create_issue))
        .route("/issues", get(issues::list_issues))
        .route("/issues/:number", get(issues::get_issue))
        .route("/issues/:number", patch(issues::update_issue))
        .route("/issues/:number/comments", post(issues::comment_issue))
        // Attach state
        .with_state(state)
}
