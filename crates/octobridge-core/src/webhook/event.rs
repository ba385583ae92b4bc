//! Webhook event classification and stored-event summaries.

use serde::{Deserialize, Serialize};

/// Webhook event categories this service handles.
///
/// Anything else on the `X-GitHub-Event` header is rejected by the
/// pipeline before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Issues,
    IssueComment,
    Ping,
}

impl EventKind {
    /// Parse the `X-GitHub-Event` header value.
    pub fn from_header(value: &str) -> Option<Self> {
        match value {
            "issues" => Some(Self::Issues),
            "issue_comment" => Some(Self::IssueComment),
            "ping" => Some(Self::Ping),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::IssueComment => "issue_comment",
            Self::Ping => "ping",
        }
    }
}

/// A stored event row as returned by [`super::EventStore::recent`].
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    /// GitHub's delivery id; NULL rows come from deliveries that lacked
    /// the `X-GitHub-Delivery` header.
    pub delivery_id: Option<String>,
    pub event_type: String,
    pub action: String,
    pub issue_number: Option<i64>,
    pub received_at: String,
}
