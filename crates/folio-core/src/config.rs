use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from the config file; CLI flags and env vars are layered on top
/// by the binary. Priority: CLI > Env > File > Defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit file; a missing file is an error here
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            crate::Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/folio/config.toml` (XDG on Linux, AppData on Windows)
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("folio");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL or file path of the projects JSON
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Append a timestamp query parameter to remote requests
    #[serde(default = "default_true")]
    pub cache_bust: bool,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "data/projects.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            cache_bust: default_true(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Account owning the repositories. Unset means "take it from each project URL".
    #[serde(default)]
    pub owner: Option<String>,

    /// GitHub personal access token, lifts the anonymous rate limit
    #[serde(default)]
    pub token: Option<String>,

    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: None,
            token: None,
            api_url: default_github_url(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Document title for full-page exports
    #[serde(default = "default_title")]
    pub title: String,

    /// Where `folio build` writes its output
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Wrap HTML output in a complete document instead of a bare section
    #[serde(default = "default_true")]
    pub full_document: bool,
}

fn default_title() -> String {
    "Projects".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("index.html")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            output: default_output(),
            full_document: default_true(),
        }
    }
}
