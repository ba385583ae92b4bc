//! Recent-event retrieval for debugging.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::ApiResult;
use crate::state::AppState;
use octobridge_core::webhook::EventSummary;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventSummary>,
}

/// Recent stored events, newest first.
/// GET /events?limit=N
///
/// Storage failures degrade to an empty list; this endpoint must never
/// take the service down.
pub async fn recent_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Json<EventsResponse>> {
    let events = match state.store.recent(query.limit) {
        Ok(events) => events,
        Err(e) => {
            error!(error = %e, "failed to retrieve webhook events");
            Vec::new()
        }
    };

    Ok(Json(EventsResponse { events }))
}
