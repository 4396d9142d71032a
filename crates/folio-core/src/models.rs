use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One project's metadata - drives exactly one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    /// Source repository URL
    #[serde(default, rename = "github", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Live demo URL
    #[serde(default, rename = "demo", skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
}

impl ProjectRecord {
    /// Source URL, treating an empty string as absent
    pub fn source(&self) -> Option<&str> {
        non_empty(self.source_url.as_deref())
    }

    /// Demo URL, treating an empty string as absent
    pub fn demo(&self) -> Option<&str> {
        non_empty(self.demo_url.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Completed", alias = "completed")]
    Completed,
    #[serde(
        rename = "In Progress",
        alias = "in-progress",
        alias = "in_progress",
        alias = "in progress"
    )]
    InProgress,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In Progress",
        }
    }

    /// Class used for the status badge
    pub fn css_class(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in-progress",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which source a catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogOrigin {
    Live,
    Fallback,
}

impl std::fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogOrigin::Live => write!(f, "live"),
            CatalogOrigin::Fallback => write!(f, "fallback"),
        }
    }
}

/// Ordered, immutable list of records loaded for one page view
///
/// A reload produces a brand new `Catalog`; there is no way to edit one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    records: Vec<ProjectRecord>,
    origin: CatalogOrigin,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn new(records: Vec<ProjectRecord>, origin: CatalogOrigin) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if record.id.trim().is_empty() {
                return Err(Error::InvalidCatalog(format!(
                    "project \"{}\" has an empty id",
                    record.title
                )));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(Error::DuplicateRecordId(record.id.clone()));
            }
        }

        Ok(Self { records, origin })
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ProjectRecord;
    type IntoIter = std::slice::Iter<'a, ProjectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Popularity counts, exactly as the metrics source reported them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetrics {
    pub stars: u32,
    pub forks: u32,
}

/// Per-card metrics lifecycle: `Pending -> Shown | Hidden`, both terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MetricsState {
    Pending,
    Shown(RepoMetrics),
    Hidden,
}

impl MetricsState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MetricsState::Pending)
    }

    pub fn metrics(&self) -> Option<RepoMetrics> {
        match self {
            MetricsState::Shown(m) => Some(*m),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn record(id: &str, source_url: Option<&str>) -> ProjectRecord {
    ProjectRecord {
        id: id.to_string(),
        title: format!("Project {}", id),
        description: format!("Description of {}", id),
        image: format!("assets/{}.png", id),
        source_url: source_url.map(str::to_string),
        demo_url: None,
        technologies: vec!["Rust".to_string()],
        status: ProjectStatus::Completed,
    }
}
