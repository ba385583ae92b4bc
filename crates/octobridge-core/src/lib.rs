//! octobridge-core - webhook ingestion pipeline for the octobridge service.
//!
//! This crate holds everything the HTTP layer builds on: service
//! configuration, the shared error type, and the webhook domain
//! (signature verification, payload normalization, idempotent event
//! storage, and the ingestion pipeline that wires them together).

pub mod config;
pub mod error;
pub mod webhook;

pub use config::{GithubConfig, ServiceConfig};
pub use error::{BridgeError, BridgeResult};
