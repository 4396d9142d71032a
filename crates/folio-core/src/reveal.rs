// One-shot entrance animation tracking for cards
use std::collections::HashSet;

use tracing::debug;

/// Tracks which cards still wait for their entrance animation
///
/// A card is observed from the moment it is rendered. The first visibility
/// event reveals it and stops observing it, so the animation never replays.
/// State lives on the watcher instance, one per surface.
#[derive(Debug, Default, Clone)]
pub struct RevealWatcher {
    observed: HashSet<String>,
    revealed: HashSet<String>,
}

impl RevealWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: &str) {
        if !self.revealed.contains(id) {
            self.observed.insert(id.to_string());
        }
    }

    /// Report that a card scrolled into view
    ///
    /// Returns true only the first time, which is when the animation should run.
    pub fn notify_visible(&mut self, id: &str) -> bool {
        if self.observed.remove(id) {
            debug!("Revealing card {}", id);
            self.revealed.insert(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_observed(&self, id: &str) -> bool {
        self.observed.contains(id)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Forget everything, used when the container is rebuilt
    pub fn reset(&mut self) {
        self.observed.clear();
        self.revealed.clear();
    }
}
