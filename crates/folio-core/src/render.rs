use std::collections::HashMap;

use tracing::debug;

use crate::{
    models::{Catalog, MetricsState, ProjectRecord},
    surface::{Card, CardImage, ImageState, StatsSection, Surface},
};

pub const STATS_SUFFIX: &str = "-stats";
pub const STARS_SUFFIX: &str = "-stars";
pub const FORKS_SUFFIX: &str = "-forks";
const CARD_PREFIX: &str = "project-";

pub fn card_element_id(record_id: &str) -> String {
    format!("{}{}", CARD_PREFIX, record_id)
}

pub fn stats_element_id(record_id: &str) -> String {
    format!("{}{}", record_id, STATS_SUFFIX)
}

pub fn stars_element_id(record_id: &str) -> String {
    format!("{}{}", record_id, STARS_SUFFIX)
}

pub fn forks_element_id(record_id: &str) -> String {
    format!("{}{}", record_id, FORKS_SUFFIX)
}

/// Repository short-name: the final path segment of a repository URL
///
/// Trailing slashes, query strings, fragments and a `.git` suffix are ignored.
pub fn repo_short_name(url: &str) -> Option<String> {
    path_segments(url).last().map(|s| s.to_string())
}

/// Owner segment of a repository URL (the one before the short-name)
pub fn repo_owner(url: &str) -> Option<String> {
    let segments = path_segments(url);
    if segments.len() < 2 {
        return None;
    }
    segments.get(segments.len() - 2).map(|s| s.to_string())
}

fn path_segments(url: &str) -> Vec<&str> {
    // `://` only separates a scheme when nothing path-like comes before it
    let scheme_end = url
        .find("://")
        .filter(|&pos| !url[..pos].contains(|c: char| matches!(c, '/' | '?' | '#')));
    let without_scheme = match scheme_end {
        Some(pos) => &url[pos + 3..],
        None => url,
    };
    let path = without_scheme
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    let mut segments: Vec<&str> = path
        .split('/')
        .skip(if scheme_end.is_some() { 1 } else { 0 })
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(last) = segments.pop() {
        let trimmed = last.strip_suffix(".git").unwrap_or(last);
        if !trimmed.is_empty() {
            segments.push(trimmed);
        }
    }

    segments
}

/// Where a rendered card lives and how to address its stats elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHandle {
    /// Position in the surface container at render time
    pub index: usize,
    pub record_id: String,
    pub card_id: String,
    pub stats_id: String,
    pub stars_id: String,
    pub forks_id: String,
}

impl CardHandle {
    pub fn new(index: usize, record_id: &str) -> Self {
        Self {
            index,
            record_id: record_id.to_string(),
            card_id: card_element_id(record_id),
            stats_id: stats_element_id(record_id),
            stars_id: stars_element_id(record_id),
            forks_id: forks_element_id(record_id),
        }
    }
}

/// Record id to card handle, built once per render and handed to the metrics step
#[derive(Debug, Clone, Default)]
pub struct CardHandles {
    by_id: HashMap<String, CardHandle>,
}

impl CardHandles {
    pub fn get(&self, record_id: &str) -> Option<&CardHandle> {
        self.by_id.get(record_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn insert(&mut self, handle: CardHandle) {
        self.by_id.insert(handle.record_id.clone(), handle);
    }
}

/// Turns a catalog into cards on a surface
pub struct Renderer;

impl Renderer {
    /// Clear the container and rebuild one card per record
    ///
    /// A second call replaces everything from the first; nothing is merged.
    pub fn render(catalog: &Catalog, surface: &mut Surface) -> CardHandles {
        surface.clear();
        surface.clear_error();

        let mut handles = CardHandles::default();
        for record in catalog {
            let index = surface.push_card(Self::build_card(record));
            handles.insert(CardHandle::new(index, &record.id));
        }

        surface.hide_loading();
        debug!(
            "Rendered {} cards from {} catalog",
            handles.len(),
            catalog.origin()
        );

        handles
    }

    /// Build the card for a single record
    pub fn build_card(record: &ProjectRecord) -> Card {
        Card {
            record_id: record.id.clone(),
            element_id: card_element_id(&record.id),
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status,
            status_label: record.status.label().to_string(),
            status_class: record.status.css_class().to_string(),
            image: CardImage {
                src: record.image.clone(),
                alt: record.title.clone(),
                lazy: true,
                state: ImageState::Loading,
            },
            technologies: record.technologies.clone(),
            source_url: record.source().map(str::to_string),
            demo_url: record.demo().map(str::to_string),
            repo_name: record.source().and_then(repo_short_name),
            stats: StatsSection {
                section_id: stats_element_id(&record.id),
                stars_id: stars_element_id(&record.id),
                forks_id: forks_element_id(&record.id),
                state: MetricsState::Pending,
            },
        }
    }
}
