// Catalog JSON client - remote URL or a file on disk
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Query parameter appended to remote catalog requests so caches never serve a stale copy
pub const CACHE_BUST_PARAM: &str = "t";

#[derive(Error, Debug)]
pub enum CatalogFetchError {
    #[error("Catalog request failed with status {0}")]
    BadStatus(u16),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Failed to read catalog file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog payload: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogFetchError>;

/// Where the catalog lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Remote(String),
    Local(PathBuf),
}

impl CatalogLocation {
    /// `http://` and `https://` are remote, everything else is a path
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            CatalogLocation::Remote(raw.to_string())
        } else {
            let path = raw.strip_prefix("file://").unwrap_or(raw);
            CatalogLocation::Local(PathBuf::from(path))
        }
    }
}

impl std::fmt::Display for CatalogLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogLocation::Remote(url) => write!(f, "{}", url),
            CatalogLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct CatalogClient {
    client: reqwest::Client,
    location: CatalogLocation,
    cache_bust: bool,
}

impl CatalogClient {
    pub fn new(location: CatalogLocation, cache_bust: bool, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(crate::USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            location,
            cache_bust,
        })
    }

    pub fn location(&self) -> &CatalogLocation {
        &self.location
    }

    /// Fetch the catalog and decode it as `T`
    pub async fn fetch_json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = match &self.location {
            CatalogLocation::Remote(url) => self.fetch_remote(url).await?,
            CatalogLocation::Local(path) => {
                debug!("Reading catalog from {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogFetchError::IoError {
                        path: path.display().to_string(),
                        source,
                    })?
            }
        };

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);
        if self.cache_bust {
            request = request.query(&[cache_buster(Utc::now())]);
        }

        debug!("GET {} (cache bust: {})", url, self.cache_bust);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFetchError::BadStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

/// Cache-busting query pair for a request issued at `now`
pub fn cache_buster(now: DateTime<Utc>) -> (&'static str, String) {
    (CACHE_BUST_PARAM, now.timestamp_millis().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::OneShotServer;
    use chrono::TimeZone;
    use std::io::Write;

    #[test]
    fn test_location_parse() {
        assert_eq!(
            CatalogLocation::parse("https://example.com/data/projects.json"),
            CatalogLocation::Remote("https://example.com/data/projects.json".to_string())
        );
        assert_eq!(
            CatalogLocation::parse("HTTP://example.com/p.json"),
            CatalogLocation::Remote("HTTP://example.com/p.json".to_string())
        );
        assert_eq!(
            CatalogLocation::parse("data/projects.json"),
            CatalogLocation::Local(PathBuf::from("data/projects.json"))
        );
        assert_eq!(
            CatalogLocation::parse("file:///srv/site/projects.json"),
            CatalogLocation::Local(PathBuf::from("/srv/site/projects.json"))
        );
    }

    #[test]
    fn test_cache_buster_uses_millis() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let (key, value) = cache_buster(now);
        assert_eq!(key, "t");
        assert_eq!(value, now.timestamp_millis().to_string());
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "a"}}, {{"id": "b"}}]"#).unwrap();

        let client = CatalogClient::new(
            CatalogLocation::Local(file.path().to_path_buf()),
            true,
            Duration::from_secs(1),
        )
        .unwrap();

        let items: Vec<serde_json::Value> = client.fetch_json().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], "b");
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = CatalogClient::new(
            CatalogLocation::Local(dir.path().join("nope.json")),
            false,
            Duration::from_secs(1),
        )
        .unwrap();

        let result = client.fetch_json::<Vec<serde_json::Value>>().await;
        assert!(matches!(result, Err(CatalogFetchError::IoError { .. })));
    }

    #[tokio::test]
    async fn test_malformed_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let client = CatalogClient::new(
            CatalogLocation::Local(file.path().to_path_buf()),
            false,
            Duration::from_secs(1),
        )
        .unwrap();

        let result = client.fetch_json::<Vec<serde_json::Value>>().await;
        assert!(matches!(result, Err(CatalogFetchError::ParseError(_))));
    }

    fn remote_client(server: &OneShotServer, cache_bust: bool) -> CatalogClient {
        CatalogClient::new(
            CatalogLocation::Remote(format!("{}/data/projects.json", server.base_url)),
            cache_bust,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_remote_request_carries_cache_buster() {
        let server = OneShotServer::start("200 OK", &[], r#"[{"id": "a"}]"#).await;
        let client = remote_client(&server, true);

        let before = Utc::now().timestamp_millis();
        let items: Vec<serde_json::Value> = client.fetch_json().await.unwrap();
        let after = Utc::now().timestamp_millis();
        assert_eq!(items.len(), 1);

        let request = server.received().await;
        let millis: i64 = request
            .target()
            .strip_prefix("/data/projects.json?t=")
            .unwrap()
            .parse()
            .unwrap();
        assert!(millis >= before && millis <= after);
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_cache_buster_can_be_disabled() {
        let server = OneShotServer::start("200 OK", &[], "[]").await;
        let client = remote_client(&server, false);

        let items: Vec<serde_json::Value> = client.fetch_json().await.unwrap();
        assert!(items.is_empty());
        assert_eq!(server.received().await.target(), "/data/projects.json");
    }

    #[tokio::test]
    async fn test_non_success_status_is_bad_status() {
        let server = OneShotServer::start("503 Service Unavailable", &[], "").await;
        let client = remote_client(&server, true);

        let result = client.fetch_json::<Vec<serde_json::Value>>().await;
        assert!(matches!(result, Err(CatalogFetchError::BadStatus(503))));
    }

    #[tokio::test]
    async fn test_remote_malformed_body_is_parse_error() {
        let server = OneShotServer::start("200 OK", &[], "<html>oops</html>").await;
        let client = remote_client(&server, false);

        let result = client.fetch_json::<Vec<serde_json::Value>>().await;
        assert!(matches!(result, Err(CatalogFetchError::ParseError(_))));
    }
}
