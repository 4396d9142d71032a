use thiserror::Error;

/// All the ways the catalog pipeline can go wrong
///
/// Only `CatalogUnavailable` ever reaches the page as a visible failure;
/// everything else is recovered (fallback catalog, hidden stats) and logged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Duplicate project id in catalog: {0}")]
    DuplicateRecordId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
