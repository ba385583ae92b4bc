//! Normalized issue and comment representations.

use serde::{Deserialize, Serialize};

/// A GitHub issue, flattened for API responses.
///
/// Label objects are reduced to their names; everything else passes
/// through from the upstream representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub html_url: String,
    pub state: String,
    pub title: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A comment on a GitHub issue, with the author flattened to a login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: i64,
    pub html_url: String,
    pub body: String,
    pub user: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Fields to change on an existing issue. `None` fields are left
/// untouched upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIssue {
    pub title: Option<String>,
    pub body: Option<String>,
    /// `open` or `closed`.
    pub state: Option<String>,
}

/// Query parameters for listing issues, mirroring GitHub's pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIssuesParams {
    #[serde(default = "default_state")]
    pub state: String,
    pub labels: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_state() -> String {
    "open".to_string()
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    30
}

impl Default for ListIssuesParams {
    fn default() -> Self {
        Self {
            state: default_state(),
            labels: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}
