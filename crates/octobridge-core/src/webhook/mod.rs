//! Webhook ingestion: signature verification, payload normalization,
//! idempotent storage, and the pipeline that wires them together.

pub mod event;
pub mod normalize;
pub mod pipeline;
pub mod signature;
pub mod store;

pub use event::{EventKind, EventSummary};
pub use normalize::{normalize, NormalizedEvent};
pub use pipeline::{Delivery, Rejection, WebhookPipeline};
pub use signature::verify_signature;
pub use store::EventStore;
