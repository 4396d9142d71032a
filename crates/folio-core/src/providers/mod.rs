// Bridges between the HTTP clients and the pipeline's source traits
pub mod catalog;
pub mod github;

pub use catalog::HttpCatalogSource;
pub use github::GitHubMetricsSource;
