//! octobridge-github - GitHub Issues API client.
//!
//! A thin, repository-scoped client for the upstream Issues REST API.
//! Responses are flattened into the normalized [`Issue`] and
//! [`IssueComment`] shapes the HTTP facade serves.

pub mod client;
pub mod types;

pub use client::IssuesClient;
pub use types::{Issue, IssueComment, ListIssuesParams, NewIssue, UpdateIssue};
