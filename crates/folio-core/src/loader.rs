use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    fallback::EmbeddedFallback,
    models::{Catalog, CatalogOrigin, ProjectRecord},
    Error, Result,
};

/// Anything that can produce the list of project records
///
/// The live HTTP/file source and the embedded fallback both implement this,
/// which keeps the loader testable without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ProjectRecord>>;

    /// Human readable name for log lines
    fn describe(&self) -> String;
}

/// Loads the catalog, preferring freshness but never leaving the page empty
///
/// Any failure of the primary source (transport, status, payload, duplicate
/// ids) swaps in the fallback source. Only when the fallback fails too does
/// `load` return an error.
pub struct CatalogLoader {
    primary: Box<dyn CatalogSource>,
    fallback: Box<dyn CatalogSource>,
}

impl CatalogLoader {
    /// Loader with the embedded fallback dataset
    pub fn new(primary: Box<dyn CatalogSource>) -> Self {
        Self::with_fallback(primary, Box::new(EmbeddedFallback))
    }

    pub fn with_fallback(primary: Box<dyn CatalogSource>, fallback: Box<dyn CatalogSource>) -> Self {
        Self { primary, fallback }
    }

    /// Load the catalog, failing over to the fallback source
    pub async fn load(&self) -> Result<Catalog> {
        let primary_err = match self.load_live().await {
            Ok(catalog) => {
                info!("Loaded {} projects from {}", catalog.len(), self.primary.describe());
                return Ok(catalog);
            }
            Err(e) => e,
        };

        warn!(
            "Catalog source {} failed ({}), using {}",
            self.primary.describe(),
            primary_err,
            self.fallback.describe()
        );

        let records = self.fallback.fetch().await.map_err(|e| {
            Error::CatalogUnavailable(format!(
                "primary: {}; fallback: {}",
                primary_err, e
            ))
        })?;

        let catalog = Catalog::new(records, CatalogOrigin::Fallback).map_err(|e| {
            Error::CatalogUnavailable(format!(
                "primary: {}; fallback: {}",
                primary_err, e
            ))
        })?;

        info!("Loaded {} fallback projects", catalog.len());
        Ok(catalog)
    }

    /// Load from the primary source only, no failover
    pub async fn load_live(&self) -> Result<Catalog> {
        let records = self.primary.fetch().await?;
        Catalog::new(records, CatalogOrigin::Live)
    }
}
