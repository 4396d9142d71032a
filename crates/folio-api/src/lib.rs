// HTTP clients for the two upstreams the site talks to
pub mod catalog;
pub mod github;

#[cfg(test)]
mod test_server;

// Re-export common types
pub use catalog::{CatalogClient, CatalogFetchError, CatalogLocation};
pub use github::{GitHubClient, GitHubError, GitHubRepo};

/// User agent sent with every request
pub(crate) const USER_AGENT: &str = "Folio/0.1.0";
