//! Webhook ingestion pipeline: verify, parse, classify, store.

use serde_json::Value;
use tracing::{info, warn};

use crate::webhook::event::EventKind;
use crate::webhook::normalize::normalize;
use crate::webhook::signature::verify_signature;
use crate::webhook::store::EventStore;

/// A raw webhook delivery as received over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    /// Raw request body, exactly as signed by the sender.
    pub body: &'a [u8],
    /// `X-Hub-Signature-256` header value.
    pub signature: Option<&'a str>,
    /// `X-GitHub-Event` header value.
    pub event: Option<&'a str>,
    /// `X-GitHub-Delivery` header value, the idempotency key.
    pub delivery_id: Option<&'a str>,
}

/// Why a delivery was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Signature missing or mismatched; callers must not distinguish
    /// the two.
    Unauthorized,
    /// Body was not valid JSON.
    MalformedPayload,
    /// Event type this service does not handle.
    UnsupportedEvent(String),
}

/// Orchestrates verification, parsing, classification, and storage for
/// one delivery at a time.
pub struct WebhookPipeline {
    secret: String,
    store: EventStore,
}

impl WebhookPipeline {
    pub fn new(secret: impl Into<String>, store: EventStore) -> Self {
        Self {
            secret: secret.into(),
            store,
        }
    }

    /// Ingest one delivery, either acknowledging (`Ok`) or rejecting it.
    ///
    /// Storage failures never reject: the delivery is acknowledged and
    /// the failure logged, so transient database trouble cannot cascade
    /// into GitHub disabling the webhook after repeated non-2xx
    /// responses. Retries are GitHub's responsibility, not ours.
    pub fn ingest(&self, delivery: Delivery<'_>) -> Result<(), Rejection> {
        if !verify_signature(delivery.body, delivery.signature, &self.secret) {
            warn!(delivery_id = ?delivery.delivery_id, "invalid webhook signature");
            return Err(Rejection::Unauthorized);
        }

        let payload: Value =
            serde_json::from_slice(delivery.body).map_err(|_| Rejection::MalformedPayload)?;

        let event = delivery.event.unwrap_or("");
        let kind = EventKind::from_header(event)
            .ok_or_else(|| Rejection::UnsupportedEvent(event.to_string()))?;

        // GitHub's webhook test; acknowledged but never stored.
        if kind == EventKind::Ping {
            info!(delivery_id = ?delivery.delivery_id, "received ping event");
            return Ok(());
        }

        if delivery.delivery_id.is_none() {
            warn!(
                event = kind.as_str(),
                "delivery without X-GitHub-Delivery header, idempotency weakened"
            );
        }

        let record = normalize(&payload);

        match self.store.insert_if_absent(
            delivery.delivery_id,
            kind,
            &record.action,
            record.issue_number,
            &payload,
        ) {
            Ok(true) => info!(
                delivery_id = ?delivery.delivery_id,
                event = kind.as_str(),
                action = %record.action,
                issue = ?record.issue_number,
                "stored webhook event"
            ),
            Ok(false) => info!(
                delivery_id = ?delivery.delivery_id,
                event = kind.as_str(),
                "duplicate delivery, already stored"
            ),
            Err(e) => warn!(
                delivery_id = ?delivery.delivery_id,
                event = kind.as_str(),
                error = %e,
                "failed to store webhook event"
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    const SECRET: &str = "test-secret";

    fn sign(body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn pipeline() -> (WebhookPipeline, EventStore) {
        let store = EventStore::open(":memory:").unwrap();
        (WebhookPipeline::new(SECRET, store.clone()), store)
    }

    fn delivery<'a>(
        body: &'a [u8],
        signature: &'a str,
        event: &'a str,
        id: &'a str,
    ) -> Delivery<'a> {
        Delivery {
            body,
            signature: Some(signature),
            event: Some(event),
            delivery_id: Some(id),
        }
    }

    #[test]
    fn issues_event_is_acknowledged_and_stored() {
        let (pipeline, store) = pipeline();
        let body =
            br#"{"action":"opened","issue":{"number":42,"title":"Bug"},"sender":{"login":"alice"}}"#;
        let signature = sign(body);

        let result = pipeline.ingest(delivery(body, &signature, "issues", "d-1"));

        assert_eq!(result, Ok(()));
        let events = store.recent(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "issues");
        assert_eq!(events[0].action, "opened");
        assert_eq!(events[0].issue_number, Some(42));
    }

    #[test]
    fn comment_event_stores_nested_issue_number() {
        let (pipeline, store) = pipeline();
        let body = br#"{"action":"created","comment":{"body":"hi","issue":{"number":7}}}"#;
        let signature = sign(body);

        pipeline
            .ingest(delivery(body, &signature, "issue_comment", "d-2"))
            .unwrap();

        let events = store.recent(10).unwrap();
        assert_eq!(events[0].event_type, "issue_comment");
        assert_eq!(events[0].issue_number, Some(7));
    }

    #[test]
    fn ping_is_acknowledged_but_never_stored() {
        let (pipeline, store) = pipeline();
        let body = br#"{"zen":"Keep it logically awesome."}"#;
        let signature = sign(body);

        let result = pipeline.ingest(delivery(body, &signature, "ping", "d-3"));

        assert_eq!(result, Ok(()));
        assert!(store.recent(10).unwrap().is_empty());
    }

    #[test]
    fn duplicate_delivery_is_stored_once() {
        let (pipeline, store) = pipeline();
        let body = br#"{"action":"opened","issue":{"number":42}}"#;
        let signature = sign(body);

        pipeline
            .ingest(delivery(body, &signature, "issues", "same-id"))
            .unwrap();
        pipeline
            .ingest(delivery(body, &signature, "issues", "same-id"))
            .unwrap();

        assert_eq!(store.recent(10).unwrap().len(), 1);
    }

    #[test]
    fn invalid_signature_is_unauthorized() {
        let (pipeline, store) = pipeline();
        let body = br#"{"action":"opened"}"#;

        let result = pipeline.ingest(delivery(body, "sha256=bogus", "issues", "d-4"));

        assert_eq!(result, Err(Rejection::Unauthorized));
        assert!(store.recent(10).unwrap().is_empty());
    }

    #[test]
    fn missing_signature_is_unauthorized() {
        let (pipeline, _) = pipeline();
        let body = br#"{"action":"opened"}"#;

        let result = pipeline.ingest(Delivery {
            body,
            signature: None,
            event: Some("issues"),
            delivery_id: Some("d-5"),
        });

        assert_eq!(result, Err(Rejection::Unauthorized));
    }

    #[test]
    fn malformed_json_is_rejected_after_verification() {
        let (pipeline, _) = pipeline();
        let body = b"not json";
        let signature = sign(body);

        let result = pipeline.ingest(delivery(body, &signature, "issues", "d-6"));

        assert_eq!(result, Err(Rejection::MalformedPayload));
    }

    #[test]
    fn unsupported_event_type_is_rejected_by_name() {
        let (pipeline, store) = pipeline();
        let body = br#"{"ref":"refs/heads/main"}"#;
        let signature = sign(body);

        let result = pipeline.ingest(delivery(body, &signature, "push", "d-7"));

        assert_eq!(result, Err(Rejection::UnsupportedEvent("push".to_string())));
        assert!(store.recent(10).unwrap().is_empty());
    }

    #[test]
    fn missing_event_header_is_unsupported() {
        let (pipeline, _) = pipeline();
        let body = br#"{}"#;
        let signature = sign(body);

        let result = pipeline.ingest(Delivery {
            body,
            signature: Some(&signature),
            event: None,
            delivery_id: Some("d-8"),
        });

        assert_eq!(result, Err(Rejection::UnsupportedEvent(String::new())));
    }

    #[test]
    fn missing_delivery_id_is_tolerated() {
        let (pipeline, store) = pipeline();
        let body = br#"{"action":"opened","issue":{"number":1}}"#;
        let signature = sign(body);

        let result = pipeline.ingest(Delivery {
            body,
            signature: Some(&signature),
            event: Some("issues"),
            delivery_id: None,
        });

        assert_eq!(result, Ok(()));
        let events = store.recent(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].delivery_id, None);
    }
}
