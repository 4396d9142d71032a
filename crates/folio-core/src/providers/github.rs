// GitHub provider - bridges GitHubClient with the MetricsSource trait
use async_trait::async_trait;
use folio_api::{GitHubClient, GitHubRepo};

use crate::{metrics::MetricsSource, models::RepoMetrics, Error, Result};

/// Wrapper around GitHubClient that implements MetricsSource
pub struct GitHubMetricsSource {
    client: GitHubClient,
}

impl GitHubMetricsSource {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for GitHubMetricsSource {
    async fn fetch(&self, owner: &str, repo: &str) -> Result<RepoMetrics> {
        let repo = self
            .client
            .get_repository(owner, repo)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))?;

        Ok(github_to_metrics(&repo))
    }
}

/// Counts are passed through untouched
fn github_to_metrics(gh: &GitHubRepo) -> RepoMetrics {
    RepoMetrics {
        stars: gh.stargazers_count,
        forks: gh.forks_count,
    }
}
