//! Repository-scoped client for the GitHub Issues REST API.

use octobridge_core::config::GithubConfig;
use octobridge_core::error::{BridgeError, BridgeResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::types::{Issue, IssueComment, ListIssuesParams, NewIssue, UpdateIssue};

/// Client for one repository's issues endpoints.
pub struct IssuesClient {
    client: Client,
    token: String,
    base_url: String,
}

/// Raw issue shape as returned by GitHub.
#[derive(Debug, Deserialize)]
struct RawIssue {
    number: i64,
    html_url: String,
    state: String,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<RawLabel>,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: i64,
    html_url: String,
    body: String,
    user: RawUser,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Self {
            number: raw.number,
            html_url: raw.html_url,
            state: raw.state,
            title: raw.title,
            body: raw.body,
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl From<RawComment> for IssueComment {
    fn from(raw: RawComment) -> Self {
        Self {
            id: raw.id,
            html_url: raw.html_url,
            body: raw.body,
            user: raw.user.login,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl IssuesClient {
    /// Create a client for the configured repository.
    pub fn new(config: &GithubConfig) -> Self {
        Self::with_base_url(config, config.repo_url())
    }

    /// Create a client with an explicit base URL (tests, GitHub
    /// Enterprise).
    pub fn with_base_url(config: &GithubConfig, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("octobridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            token: config.token.clone(),
            base_url: base_url.into(),
        }
    }

    fn headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", self.token).parse().unwrap(),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            "application/vnd.github+json".parse().unwrap(),
        );
        headers
    }

    /// Create a new issue.
    pub async fn create_issue(&self, request: &NewIssue) -> BridgeResult<Issue> {
        let response = self
            .client
            .post(format!("{}/issues", self.base_url))
            .headers(self.headers())
            .json(request)
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("Failed to create issue: {}", e)))?;

        let raw: RawIssue = Self::parse(response).await?;
        Ok(raw.into())
    }

    /// List issues with GitHub's pagination semantics.
    pub async fn list_issues(&self, params: &ListIssuesParams) -> BridgeResult<Vec<Issue>> {
        let mut query: Vec<(&str, String)> = vec![
            ("state", params.state.clone()),
            ("page", params.page.to_string()),
            ("per_page", params.per_page.to_string()),
        ];
        if let Some(ref labels) = params.labels {
            query.push(("labels", labels.clone()));
        }

        let response = self
            .client
            .get(format!("{}/issues", self.base_url))
            .headers(self.headers())
            .query(&query)
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("Failed to list issues: {}", e)))?;

        let raw: Vec<RawIssue> = Self::parse(response).await?;
        Ok(raw.into_iter().map(Into::into).collect())
    }

    /// Get an issue by number.
    pub async fn get_issue(&self, number: i64) -> BridgeResult<Issue> {
        let response = self
            .client
            .get(format!("{}/issues/{}", self.base_url, number))
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("Failed to get issue: {}", e)))?;

        let raw: RawIssue = Self::parse(response).await?;
        Ok(raw.into())
    }

    /// Update an existing issue; only the provided fields change.
    pub async fn update_issue(&self, number: i64, request: &UpdateIssue) -> BridgeResult<Issue> {
        let mut body = json!({});
        if let Some(ref title) = request.title {
            body["title"] = json!(title);
        }
        if let Some(ref text) = request.body {
            body["body"] = json!(text);
        }
        if let Some(ref state) = request.state {
            body["state"] = json!(state);
        }

        let response = self
            .client
            .patch(format!("{}/issues/{}", self.base_url, number))
            .headers(self.headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("Failed to update issue: {}", e)))?;

        let raw: RawIssue = Self::parse(response).await?;
        Ok(raw.into())
    }

    /// Add a comment to an issue.
    pub async fn create_comment(&self, number: i64, body: &str) -> BridgeResult<IssueComment> {
        let response = self
            .client
            .post(format!("{}/issues/{}/comments", self.base_url, number))
            .headers(self.headers())
            .json(&json!({ "body": body }))
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("Failed to create comment: {}", e)))?;

        let raw: RawComment = Self::parse(response).await?;
        Ok(raw.into())
    }

    /// Check the status and deserialize the response body.
    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> BridgeResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BridgeError::upstream(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| BridgeError::network(format!("Failed to parse response: {}", e)))
    }
}
