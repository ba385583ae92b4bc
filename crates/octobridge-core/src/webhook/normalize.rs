//! Payload normalization for issue and issue-comment events.
//!
//! Webhook payload shapes vary by event type; normalization extracts one
//! uniform record and never fails, degrading every missing field to a
//! default instead.

use serde::Serialize;
use serde_json::Value;

/// Uniform record extracted from a webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    /// The payload's `action` field, `"unknown"` when absent.
    pub action: String,
    /// Issue number, from `issue.number` or `comment.issue.number`.
    pub issue_number: Option<i64>,
    /// Top-level issue title, empty when absent.
    pub issue_title: String,
    /// Comment body, empty when the payload carries no comment.
    pub comment_body: String,
    /// `sender.login`, `"unknown"` when absent.
    pub actor: String,
}

/// Extract a [`NormalizedEvent`] from a raw webhook payload.
pub fn normalize(payload: &Value) -> NormalizedEvent {
    let issue = payload.get("issue");
    let comment = payload.get("comment");

    // A top-level issue object wins even if it lacks a number; only
    // payloads without one fall through to the comment's nested issue.
    let issue_number = if let Some(issue) = issue {
        issue.get("number").and_then(Value::as_i64)
    } else {
        comment
            .and_then(|c| c.get("issue"))
            .and_then(|i| i.get("number"))
            .and_then(Value::as_i64)
    };

    NormalizedEvent {
        action: str_field(payload, "action", "unknown"),
        issue_number,
        issue_title: issue.map(|i| str_field(i, "title", "")).unwrap_or_default(),
        comment_body: comment.map(|c| str_field(c, "body", "")).unwrap_or_default(),
        actor: payload
            .get("sender")
            .and_then(|s| s.get("login"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn str_field(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_issue_event_fields() {
        let payload = json!({
            "action": "opened",
            "issue": {"number": 42, "title": "Bug"},
            "sender": {"login": "alice"}
        });

        let record = normalize(&payload);

        assert_eq!(record.action, "opened");
        assert_eq!(record.issue_number, Some(42));
        assert_eq!(record.issue_title, "Bug");
        assert_eq!(record.comment_body, "");
        assert_eq!(record.actor, "alice");
    }

    #[test]
    fn extracts_comment_event_fields() {
        let payload = json!({
            "action": "created",
            "comment": {"body": "looks good", "issue": {"number": 7}},
            "sender": {"login": "bob"}
        });

        let record = normalize(&payload);

        assert_eq!(record.action, "created");
        assert_eq!(record.issue_number, Some(7));
        assert_eq!(record.comment_body, "looks good");
        assert_eq!(record.actor, "bob");
    }

    #[test]
    fn top_level_issue_wins_over_nested_issue() {
        let payload = json!({
            "issue": {"number": 1},
            "comment": {"issue": {"number": 2}}
        });

        assert_eq!(normalize(&payload).issue_number, Some(1));
    }

    #[test]
    fn issue_without_number_does_not_fall_through() {
        let payload = json!({
            "issue": {"title": "no number"},
            "comment": {"issue": {"number": 2}}
        });

        assert_eq!(normalize(&payload).issue_number, None);
    }

    #[test]
    fn degrades_to_defaults_on_empty_payload() {
        let record = normalize(&json!({}));

        assert_eq!(record.action, "unknown");
        assert_eq!(record.issue_number, None);
        assert_eq!(record.issue_title, "");
        assert_eq!(record.comment_body, "");
        assert_eq!(record.actor, "unknown");
    }

    #[test]
    fn tolerates_non_object_payloads() {
        let record = normalize(&json!([1, 2, 3]));

        assert_eq!(record.action, "unknown");
        assert_eq!(record.issue_number, None);
        assert_eq!(record.actor, "unknown");
    }

    #[test]
    fn tolerates_wrongly_typed_fields() {
        let payload = json!({
            "action": 5,
            "issue": {"number": "not-a-number", "title": true},
            "sender": "alice"
        });

        let record = normalize(&payload);

        assert_eq!(record.action, "unknown");
        assert_eq!(record.issue_number, None);
        assert_eq!(record.issue_title, "");
        assert_eq!(record.actor, "unknown");
    }
}
