// Page orchestration: load -> render -> metrics
use std::time::Duration;

use folio_api::{CatalogClient, CatalogLocation, GitHubClient};
use tracing::error;

use crate::{
    config::Config,
    loader::CatalogLoader,
    metrics::{MetricsFetcher, MetricsReport},
    models::{Catalog, CatalogOrigin},
    providers::{GitHubMetricsSource, HttpCatalogSource},
    render::{CardHandles, Renderer},
    surface::{ImageState, Surface},
    Error, Result,
};

/// Message shown in the inline error panel
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load projects right now.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered { origin: CatalogOrigin, cards: usize },
    /// Nothing could be loaded; the surface shows the error panel
    Failed { reason: String },
}

impl LoadOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered { .. })
    }
}

/// The project section of one page view
pub struct Page {
    surface: Surface,
    loader: CatalogLoader,
    fetcher: MetricsFetcher,
    rendered: Option<Rendered>,
}

struct Rendered {
    catalog: Catalog,
    handles: CardHandles,
    metrics_requested: bool,
}

impl Page {
    pub fn new(loader: CatalogLoader, fetcher: MetricsFetcher) -> Self {
        Self {
            surface: Surface::new(),
            loader,
            fetcher,
            rendered: None,
        }
    }

    /// Page wired to the live catalog source and the GitHub API
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(catalog_loader(config)?, metrics_fetcher(config)?))
    }

    /// Load the catalog and render it, or show the error panel if even the fallback fails
    pub async fn load_and_render(&mut self) -> LoadOutcome {
        self.surface.show_loading();

        match self.loader.load().await {
            Ok(catalog) => {
                let handles = Renderer::render(&catalog, &mut self.surface);
                let outcome = LoadOutcome::Rendered {
                    origin: catalog.origin(),
                    cards: handles.len(),
                };
                self.rendered = Some(Rendered {
                    catalog,
                    handles,
                    metrics_requested: false,
                });
                outcome
            }
            Err(e) => {
                error!("Failed to load projects: {}", e);
                self.rendered = None;
                self.surface.clear();
                self.surface.hide_loading();
                self.surface.show_error(LOAD_ERROR_MESSAGE);
                LoadOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Enrich the cards of the last render
    ///
    /// Runs once per render; later calls, or calls with nothing rendered, are no-ops.
    pub async fn fetch_metrics(&mut self) -> MetricsReport {
        match self.rendered.as_mut() {
            Some(rendered) if !rendered.metrics_requested => {
                rendered.metrics_requested = true;
                self.fetcher
                    .fetch_all(&rendered.catalog, &rendered.handles, &mut self.surface)
                    .await
            }
            _ => MetricsReport::default(),
        }
    }

    /// The error panel's reload action
    pub async fn reload(&mut self) -> LoadOutcome {
        self.load_and_render().await
    }

    /// Full pipeline in order: catalog, cards, then metrics
    pub async fn run(&mut self) -> (LoadOutcome, MetricsReport) {
        let outcome = self.load_and_render().await;
        let report = self.fetch_metrics().await;
        (outcome, report)
    }

    /// A card scrolled into view; true when its entrance animation should run
    pub fn mark_visible(&mut self, record_id: &str) -> bool {
        self.surface.notify_visible(record_id)
    }

    pub fn mark_image_loaded(&mut self, record_id: &str) -> bool {
        self.surface.set_image_state(record_id, ImageState::Loaded)
    }

    pub fn mark_image_failed(&mut self, record_id: &str) -> bool {
        self.surface.set_image_state(record_id, ImageState::Failed)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.rendered.as_ref().map(|r| &r.catalog)
    }
}

/// Loader reading the configured catalog location, with the embedded fallback
pub fn catalog_loader(config: &Config) -> Result<CatalogLoader> {
    let client = CatalogClient::new(
        CatalogLocation::parse(&config.catalog.url),
        config.catalog.cache_bust,
        Duration::from_secs(config.catalog.request_timeout_secs),
    )
    .map_err(|e| Error::ConfigError(format!("Failed to build catalog client: {}", e)))?;

    Ok(CatalogLoader::new(Box::new(HttpCatalogSource::new(client))))
}

/// Fetcher backed by the configured GitHub API
pub fn metrics_fetcher(config: &Config) -> Result<MetricsFetcher> {
    let client = GitHubClient::with_base_url(
        config.github.token.clone(),
        config.github.api_url.clone(),
        Duration::from_secs(config.github.request_timeout_secs),
    )
    .map_err(|e| Error::ConfigError(format!("Failed to build GitHub client: {}", e)))?;

    let fetcher = MetricsFetcher::new(Box::new(GitHubMetricsSource::new(client)));
    Ok(match &config.github.owner {
        Some(owner) => fetcher.with_owner(owner.clone()),
        None => fetcher,
    })
}
