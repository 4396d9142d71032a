// In-memory model of the page's project section
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    models::{MetricsState, ProjectStatus},
    render::CardHandle,
    reveal::RevealWatcher,
};

pub const DEFAULT_CONTAINER_ID: &str = "projects-container";

/// Label of the error panel's manual retry action
pub const RELOAD_LABEL: &str = "Reload";

/// Text shown in a stats placeholder before numbers arrive
pub const METRIC_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageState {
    Loading,
    Loaded,
    Failed,
}

impl ImageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageState::Loading => "loading",
            ImageState::Loaded => "loaded",
            ImageState::Failed => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardImage {
    pub src: String,
    pub alt: String,
    pub lazy: bool,
    pub state: ImageState,
}

/// The stats sub-section of a card - the only part metrics ever touch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSection {
    pub section_id: String,
    pub stars_id: String,
    pub forks_id: String,
    pub state: MetricsState,
}

impl StatsSection {
    pub fn is_hidden(&self) -> bool {
        self.state == MetricsState::Hidden
    }

    pub fn stars_text(&self) -> String {
        match self.state {
            MetricsState::Shown(m) => m.stars.to_string(),
            _ => METRIC_PLACEHOLDER.to_string(),
        }
    }

    pub fn forks_text(&self) -> String {
        match self.state {
            MetricsState::Shown(m) => m.forks.to_string(),
            _ => METRIC_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub record_id: String,
    pub element_id: String,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub status_label: String,
    pub status_class: String,
    pub image: CardImage,
    pub technologies: Vec<String>,
    pub source_url: Option<String>,
    pub demo_url: Option<String>,
    /// Final path segment of the source URL
    pub repo_name: Option<String>,
    pub stats: StatsSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingIndicator {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub message: String,
    pub action_label: String,
}

/// The display surface: a card container, an optional loading indicator
/// and an optional inline error panel
#[derive(Debug, Clone)]
pub struct Surface {
    container_id: String,
    cards: Vec<Card>,
    loading: Option<LoadingIndicator>,
    error: Option<ErrorPanel>,
    reveal: RevealWatcher,
}

impl Surface {
    /// Surface with a loading indicator element
    pub fn new() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            cards: Vec::new(),
            loading: Some(LoadingIndicator { visible: false }),
            error: None,
            reveal: RevealWatcher::new(),
        }
    }

    /// Surface whose page has no loading indicator
    pub fn without_loading_indicator() -> Self {
        Self {
            loading: None,
            ..Self::new()
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, record_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.record_id == record_id)
    }

    /// Remove every card and forget their reveal state
    pub fn clear(&mut self) {
        self.cards.clear();
        self.reveal.reset();
    }

    /// Append a card, returning its position in the container
    pub fn push_card(&mut self, card: Card) -> usize {
        self.reveal.observe(&card.element_id);
        self.cards.push(card);
        self.cards.len() - 1
    }

    pub fn show_loading(&mut self) {
        if let Some(loading) = self.loading.as_mut() {
            loading.visible = true;
        }
    }

    pub fn hide_loading(&mut self) {
        if let Some(loading) = self.loading.as_mut() {
            loading.visible = false;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.map(|l| l.visible).unwrap_or(false)
    }

    pub fn has_loading_indicator(&self) -> bool {
        self.loading.is_some()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(ErrorPanel {
            message: message.into(),
            action_label: RELOAD_LABEL.to_string(),
        });
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn error_panel(&self) -> Option<&ErrorPanel> {
        self.error.as_ref()
    }

    pub fn reveal_watcher(&self) -> &RevealWatcher {
        &self.reveal
    }

    /// Forward a visibility event; true when the entrance animation should play
    pub fn notify_visible(&mut self, record_id: &str) -> bool {
        match self.card(record_id) {
            Some(card) => {
                let element_id = card.element_id.clone();
                self.reveal.notify_visible(&element_id)
            }
            None => false,
        }
    }

    /// Apply a terminal metrics state to the card a handle points at
    ///
    /// Returns false when the handle is stale or the card already settled.
    pub fn set_metrics(&mut self, handle: &CardHandle, state: MetricsState) -> bool {
        let Some(card) = self.card_for_handle_mut(handle) else {
            warn!("No card for handle {}, dropping metrics", handle.record_id);
            return false;
        };

        if !state.is_terminal() || card.stats.state.is_terminal() {
            debug!("Metrics for {} already settled", handle.record_id);
            return false;
        }

        card.stats.state = state;
        true
    }

    /// Settle a card's image as loaded or failed; only a loading image can change
    pub fn set_image_state(&mut self, record_id: &str, state: ImageState) -> bool {
        if state == ImageState::Loading {
            return false;
        }
        match self.cards.iter_mut().find(|c| c.record_id == record_id) {
            Some(card) if card.image.state == ImageState::Loading => {
                card.image.state = state;
                true
            }
            _ => false,
        }
    }

    /// Text content of a stats element, looked up by element id
    pub fn element_text(&self, element_id: &str) -> Option<String> {
        self.cards.iter().find_map(|card| {
            if card.stats.stars_id == element_id {
                Some(card.stats.stars_text())
            } else if card.stats.forks_id == element_id {
                Some(card.stats.forks_text())
            } else {
                None
            }
        })
    }

    /// Whether an element is hidden; `None` for unknown ids
    pub fn is_element_hidden(&self, element_id: &str) -> Option<bool> {
        self.cards.iter().find_map(|card| {
            let stats = &card.stats;
            if card.element_id == element_id {
                Some(false)
            } else if stats.section_id == element_id
                || stats.stars_id == element_id
                || stats.forks_id == element_id
            {
                Some(stats.is_hidden())
            } else {
                None
            }
        })
    }

    fn card_for_handle_mut(&mut self, handle: &CardHandle) -> Option<&mut Card> {
        let at_index = self
            .cards
            .get(handle.index)
            .map(|c| c.record_id == handle.record_id)
            .unwrap_or(false);

        if at_index {
            self.cards.get_mut(handle.index)
        } else {
            self.cards
                .iter_mut()
                .find(|c| c.record_id == handle.record_id)
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}
