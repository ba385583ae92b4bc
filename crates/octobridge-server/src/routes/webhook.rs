//! Webhook ingestion endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;

use crate::error::ApiResult;
use crate::state::AppState;
use octobridge_core::webhook::Delivery;

/// Liveness probe for the webhook endpoint (GitHub verification).
/// GET /webhook
pub async fn webhook_probe() -> Json<serde_json::Value> {
    Json(json!({
        "message": "octobridge webhook endpoint",
        "status": "active"
    }))
}

/// Ingest a GitHub webhook delivery.
/// POST /webhook
///
/// Accepts `issues`, `issue_comment`, and `ping` events. Acknowledges
/// with an empty 204 so GitHub's delivery tracking stays green.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let delivery = Delivery {
        body: &body,
        signature: header_str(&headers, "X-Hub-Signature-256"),
        event: header_str(&headers, "X-GitHub-Event"),
        delivery_id: header_str(&headers, "X-GitHub-Delivery"),
    };

    state.pipeline.ingest(delivery)?;

    Ok(StatusCode::NO_CONTENT)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
