//! Scroll-reveal state machine
//!
//! Sections tagged with [`REVEAL_ATTR`] fade in the first time they scroll
//! into view. Each element goes through exactly one transition:
//!
//! ```text
//!   observed ──(intersecting)──> visible   (observation ends)
//! ```
//!
//! The threshold only configures when the host reports entries. It is not a
//! gate on the reported ratio: a section taller than `1 / threshold`
//! viewports never reaches that ratio, and the host still reports it as
//! intersecting once it enters the viewport.
//!
//! The controller is host-agnostic: the browser build feeds it
//! `IntersectionObserver` entries and applies [`VISIBLE_CLASS`] / `unobserve`
//! for whatever [`RevealController::handle`] returns. Native code drives it
//! directly in tests.

use std::collections::HashSet;
use std::hash::Hash;

/// Visible fraction at which the host observer reports entries.
pub const REVEAL_THRESHOLD: f64 = 0.15;

/// Attribute marking an element as a reveal target.
pub const REVEAL_ATTR: &str = "data-reveal";

/// Class applied once an element has been revealed.
pub const VISIBLE_CLASS: &str = "is-visible";

/// Class the host puts on the document root once it is observing. Reveal
/// targets are only hidden under it, so a page whose script never runs
/// shows everything.
pub const READY_CLASS: &str = "reveal-ready";

/// One visibility change reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<K> {
    pub target: K,
    pub is_intersecting: bool,
    /// Visible fraction of the target, `0.0..=1.0`.
    pub ratio: f64,
}

impl<K> IntersectionEntry<K> {
    pub fn new(target: K, is_intersecting: bool, ratio: f64) -> Self {
        Self { target, is_intersecting, ratio }
    }
}

#[derive(Debug, Clone)]
pub struct RevealController<K> {
    threshold: f64,
    observed: HashSet<K>,
    visible: HashSet<K>,
}

impl<K: Eq + Hash + Clone> Default for RevealController<K> {
    fn default() -> Self {
        Self::new(REVEAL_THRESHOLD)
    }
}

impl<K: Eq + Hash + Clone> RevealController<K> {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: HashSet::new(),
            visible: HashSet::new(),
        }
    }

    /// Threshold to configure the native observer with.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Start watching `target`. Already-revealed elements stay revealed
    /// and are not watched again.
    pub fn observe(&mut self, target: K) {
        if !self.visible.contains(&target) {
            self.observed.insert(target);
        }
    }

    /// Process a batch of entries, returning the targets revealed by it.
    ///
    /// Each returned target has moved from observed to visible; callers
    /// apply the visible marker and detach their native observer for it.
    /// Entries for unobserved targets change nothing.
    pub fn handle<I>(&mut self, entries: I) -> Vec<K>
    where
        I: IntoIterator<Item = IntersectionEntry<K>>,
    {
        let mut revealed = Vec::new();
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            if self.observed.remove(&entry.target) {
                self.visible.insert(entry.target.clone());
                revealed.push(entry.target);
            }
        }
        revealed
    }

    pub fn is_visible(&self, target: &K) -> bool {
        self.visible.contains(target)
    }

    pub fn is_observed(&self, target: &K) -> bool {
        self.observed.contains(target)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }
}
