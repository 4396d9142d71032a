// Per-card repository metrics - N independent requests, N independent outcomes
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::{
    models::{Catalog, MetricsState, ProjectRecord, RepoMetrics},
    render::{repo_owner, repo_short_name, CardHandles},
    surface::Surface,
    Result,
};

/// Where star/fork counts come from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch(&self, owner: &str, repo: &str) -> Result<RepoMetrics>;
}

/// Summary of one metrics pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MetricsReport {
    pub requested: usize,
    pub shown: usize,
    pub hidden: usize,
}

pub struct MetricsFetcher {
    source: Box<dyn MetricsSource>,
    owner: Option<String>,
}

impl MetricsFetcher {
    /// Fetcher that takes the owner from each record's repository URL
    pub fn new(source: Box<dyn MetricsSource>) -> Self {
        Self {
            source,
            owner: None,
        }
    }

    /// Use a fixed owner for every record; an empty owner is ignored
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        self.owner = if owner.trim().is_empty() {
            None
        } else {
            Some(owner.trim().to_string())
        };
        self
    }

    /// Resolve the metrics outcome for one record. Never fails.
    ///
    /// Anything short of a successful response, including a record with no
    /// repository URL, ends in `Hidden`.
    pub async fn fetch_one(&self, record: &ProjectRecord) -> MetricsState {
        let Some((owner, repo)) = self.target(record) else {
            debug!("{} has no repository to query, hiding stats", record.id);
            return MetricsState::Hidden;
        };

        match self.source.fetch(&owner, &repo).await {
            Ok(metrics) => {
                debug!(
                    "{}/{}: {} stars, {} forks",
                    owner, repo, metrics.stars, metrics.forks
                );
                MetricsState::Shown(metrics)
            }
            Err(e) => {
                warn!("Metrics for {}/{} unavailable: {}", owner, repo, e);
                MetricsState::Hidden
            }
        }
    }

    /// Request metrics for every rendered card and apply each outcome as it lands
    ///
    /// Requests run concurrently and settle independently. Each outcome only
    /// touches the stats section of its own card.
    pub async fn fetch_all(
        &self,
        catalog: &Catalog,
        handles: &CardHandles,
        surface: &mut Surface,
    ) -> MetricsReport {
        let mut in_flight: FuturesUnordered<_> = catalog
            .iter()
            .filter_map(|record| handles.get(&record.id).map(|handle| (record, handle)))
            .map(move |(record, handle)| async move { (handle, self.fetch_one(record).await) })
            .collect();

        let mut report = MetricsReport {
            requested: in_flight.len(),
            ..MetricsReport::default()
        };

        while let Some((handle, state)) = in_flight.next().await {
            if !surface.set_metrics(handle, state) {
                continue;
            }
            match state {
                MetricsState::Shown(_) => report.shown += 1,
                MetricsState::Hidden => report.hidden += 1,
                MetricsState::Pending => {}
            }
        }

        info!(
            "Metrics settled for {} cards ({} shown, {} hidden)",
            report.requested, report.shown, report.hidden
        );
        report
    }

    fn target(&self, record: &ProjectRecord) -> Option<(String, String)> {
        let url = record.source()?;
        let repo = repo_short_name(url)?;
        let owner = match &self.owner {
            Some(owner) => owner.clone(),
            None => repo_owner(url)?,
        };
        Some((owner, repo))
    }
}
