// Catalog pipeline: load projects, render cards, enrich them with repository metrics
pub mod config;
pub mod drift;
pub mod error;
pub mod export;
pub mod fallback;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod page;
pub mod providers;
pub mod render;
pub mod reveal;
pub mod surface;

pub use config::Config;
pub use drift::{compare_catalogs, CatalogDrift};
pub use error::Error;
pub use export::{ExportFormat, ExportOptions, Exporter};
pub use fallback::{fallback_records, EmbeddedFallback, FALLBACK_CATALOG_JSON};
pub use loader::{CatalogLoader, CatalogSource};
pub use metrics::{MetricsFetcher, MetricsReport, MetricsSource};
pub use models::{Catalog, CatalogOrigin, MetricsState, ProjectRecord, ProjectStatus, RepoMetrics};
pub use page::{LoadOutcome, Page};
pub use render::{CardHandle, CardHandles, Renderer};
pub use surface::Surface;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;
