use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Versioned representation requested from the REST API
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// The slice of `GET /repos/{owner}/{repo}` we care about; every other field is ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub stargazers_count: u32,
    pub forks_count: u32,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    /// Client for `https://api.github.com`, GitHub Enterprise or a local stand-in API
    pub fn with_base_url(token: Option<String>, base_url: String, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(crate::USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(GITHUB_ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a single repository. One request, no retries.
    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<GitHubRepo> {
        let url = self.repository_url(owner, name);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(format!("{}/{}", owner, name)));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GitHubError::AuthRequired);
        }

        // GitHub signals an exhausted quota with 403 plus a zeroed remaining header
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && is_quota_exhausted(response.headers()))
        {
            return Err(GitHubError::RateLimitExceeded);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let repo: GitHubRepo = serde_json::from_str(&body)?;
        Ok(repo)
    }

    fn repository_url(&self, owner: &str, name: &str) -> String {
        format!("{}/repos/{}/{}", self.base_url, owner, name)
    }
}

fn is_quota_exhausted(headers: &reqwest::header::HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false)
}
