//! Server state management.

use std::sync::Arc;

use octobridge_core::webhook::{EventStore, WebhookPipeline};
use octobridge_core::{BridgeResult, ServiceConfig};
use octobridge_github::IssuesClient;

/// Shared application state.
///
/// The store is the only shared mutable resource; everything else is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,
    pub pipeline: Arc<WebhookPipeline>,
    pub issues: Arc<IssuesClient>,
}

impl AppState {
    /// Build state from configuration, opening the event store once at
    /// process start.
    pub fn from_config(config: &ServiceConfig) -> BridgeResult<Self> {
        let store = EventStore::open(&config.db_path)?;
        Ok(Self::new(
            store,
            &config.webhook_secret,
            IssuesClient::new(&config.github),
        ))
    }

    /// Build state from already-constructed parts.
    pub fn new(store: EventStore, webhook_secret: &str, issues: IssuesClient) -> Self {
        let pipeline = WebhookPipeline::new(webhook_secret, store.clone());
        Self {
            store,
            pipeline: Arc::new(pipeline),
            issues: Arc::new(issues),
        }
    }
}
