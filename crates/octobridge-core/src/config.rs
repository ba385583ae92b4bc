//! Service configuration loaded from the environment.

use crate::error::{BridgeError, BridgeResult};

/// Upstream repository coordinates and credentials.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Personal access token used as a bearer credential.
    pub token: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl GithubConfig {
    /// Base URL for the repository's REST endpoints.
    pub fn repo_url(&self) -> String {
        format!("https://api.github.com/repos/{}/{}", self.owner, self.repo)
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub github: GithubConfig,
    /// Shared secret for webhook signature verification. May be empty,
    /// in which case every delivery fails verification.
    pub webhook_secret: String,
    pub host: String,
    pub port: u16,
    /// Path to the webhook event database.
    pub db_path: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `GITHUB_TOKEN`, `GITHUB_OWNER`, and `GITHUB_REPO` are required;
    /// everything else has a default.
    pub fn from_env() -> BridgeResult<Self> {
        let token = require_var("GITHUB_TOKEN")?;
        let owner = require_var("GITHUB_OWNER")?;
        let repo = require_var("GITHUB_REPO")?;

        let webhook_secret = std::env::var("WEBHOOK_SECRET").unwrap_or_default();
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| {
                BridgeError::Configuration("PORT must be a valid port number".to_string())
            })?;
        let db_path =
            std::env::var("WEBHOOK_DB").unwrap_or_else(|_| "webhook_events.db".to_string());

        Ok(Self {
            github: GithubConfig { token, owner, repo },
            webhook_secret,
            host,
            port,
            db_path,
        })
    }
}

fn require_var(name: &str) -> BridgeResult<String> {
    std::env::var(name).map_err(|_| BridgeError::Configuration(format!("{} not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_url_points_at_the_configured_repository() {
        let config = GithubConfig {
            token: "t".to_string(),
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
        };

        assert_eq!(
            config.repo_url(),
            "https://api.github.com/repos/octocat/hello-world"
        );
    }
}
