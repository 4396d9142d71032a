// Embedded fallback catalog - what the page shows when the live source is unreachable
use async_trait::async_trait;

use crate::{loader::CatalogSource, models::ProjectRecord, Result};

/// The fallback dataset, parsed with the same schema as the live catalog
pub const FALLBACK_CATALOG_JSON: &str = include_str!("../data/fallback_catalog.json");

/// Decode the embedded dataset
pub fn fallback_records() -> Result<Vec<ProjectRecord>> {
    Ok(serde_json::from_str(FALLBACK_CATALOG_JSON)?)
}

/// `CatalogSource` backed by [`FALLBACK_CATALOG_JSON`]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedFallback;

#[async_trait]
impl CatalogSource for EmbeddedFallback {
    async fn fetch(&self) -> Result<Vec<ProjectRecord>> {
        fallback_records()
    }

    fn describe(&self) -> String {
        "embedded fallback catalog".to_string()
    }
}
