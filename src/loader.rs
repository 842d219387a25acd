//! One-shot data load and dispatch
//!
//! The page has exactly one data dependency: [`DATA_PATH`]. Loading it
//! either renders all four sections or renders nothing:
//!
//! ```text
//!   Loading ──Ok(data)──> Rendered
//!      └─────Err(e)─────> Failed     (one diagnostic, slots left empty)
//! ```
//!
//! There is no retry and no way back to `Loading`. How the bytes arrive is
//! the caller's business: the native driver ([`load`]) reads through a
//! [`Fetcher`]; the browser build awaits `fetch()` itself and hands the
//! outcome to [`DataLoader::finish`].

use crate::catalog;
use crate::dom::Container;
use crate::model::AudioData;
use crate::render::{render_case_study, render_comparison_table, render_scenario_audio};
use std::fmt;

/// Data file location, relative to the site root.
pub const DATA_PATH: &str = "assets/data/audio.json";

/// The four mount points the loader renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    Case1Audio,
    Case2Audio,
    Case3Table,
    Case3Audio,
}

impl SlotId {
    pub const ALL: [SlotId; 4] = [
        SlotId::Case1Audio,
        SlotId::Case2Audio,
        SlotId::Case3Table,
        SlotId::Case3Audio,
    ];

    /// Element id of the mount point.
    pub fn element_id(self) -> &'static str {
        match self {
            SlotId::Case1Audio => "case1-audio",
            SlotId::Case2Audio => "case2-audio",
            SlotId::Case3Table => "case3-table",
            SlotId::Case3Audio => "case3-audio",
        }
    }
}

/// Resolves mount points by id.
pub trait Slots {
    type Slot: Container + ?Sized;

    /// `None` if the page has no such mount point; that section is skipped.
    fn slot(&mut self, id: SlotId) -> Option<&mut Self::Slot>;
}

/// Where load failures are reported.
pub trait Diagnostics {
    fn error(&mut self, message: &str);
}

/// Native diagnostic channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stderr;

impl Diagnostics for Stderr {
    fn error(&mut self, message: &str) {
        eprintln!("\x1b[31m{}\x1b[0m", message);
    }
}

/// Collects messages in memory.
impl Diagnostics for Vec<String> {
    fn error(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Reads a resource relative to the site root.
pub trait Fetcher {
    fn fetch(&self, path: &str) -> Result<String>;
}

/// Error type for loading the data file
#[derive(Debug)]
pub enum LoadError {
    /// Resource unreachable or unreadable.
    Fetch(String),
    /// Body is not JSON or doesn't fit the data model.
    Parse(serde_json::Error),
    /// Host-side decoding failed (the browser's `Response.json()` path).
    Decode(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
            LoadError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Fetch(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Parse a data file body.
pub fn parse(body: &str) -> Result<AudioData> {
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Rendered,
    Failed,
}

#[derive(Debug)]
pub struct DataLoader {
    state: LoadState,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { state: LoadState::Loading }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Settle the load with its outcome.
    ///
    /// Only the first call does anything; later calls return the settled
    /// state untouched.
    pub fn finish<S, D>(&mut self, outcome: Result<AudioData>, slots: &mut S, diagnostics: &mut D) -> LoadState
    where
        S: Slots + ?Sized,
        D: Diagnostics + ?Sized,
    {
        if self.state != LoadState::Loading {
            return self.state;
        }

        self.state = match outcome {
            Ok(data) => {
                dispatch(&data, slots);
                LoadState::Rendered
            }
            Err(e) => {
                diagnostics.error(&format!("Failed to load audio data: {}", e));
                LoadState::Failed
            }
        };
        self.state
    }
}

/// Render every section into its slot. Case-3 sections share one ordering.
pub fn dispatch<S: Slots + ?Sized>(data: &AudioData, slots: &mut S) {
    let scenarios = catalog::order_scenarios(&data.case3.scenarios);

    if let Some(slot) = slots.slot(SlotId::Case1Audio) {
        render_case_study(slot, &data.case1);
    }
    if let Some(slot) = slots.slot(SlotId::Case2Audio) {
        render_case_study(slot, &data.case2);
    }
    if let Some(slot) = slots.slot(SlotId::Case3Table) {
        render_comparison_table(slot, &scenarios);
    }
    if let Some(slot) = slots.slot(SlotId::Case3Audio) {
        render_scenario_audio(slot, &scenarios);
    }
}

/// Native driver: fetch, parse, then settle the loader.
pub fn load<F, S, D>(loader: &mut DataLoader, fetcher: &F, slots: &mut S, diagnostics: &mut D) -> LoadState
where
    F: Fetcher + ?Sized,
    S: Slots + ?Sized,
    D: Diagnostics + ?Sized,
{
    if loader.state() != LoadState::Loading {
        return loader.state();
    }
    let outcome = fetcher.fetch(DATA_PATH).and_then(|body| parse(&body));
    loader.finish(outcome, slots, diagnostics)
}

/// Reads resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: std::path::PathBuf,
}

impl DirFetcher {
    pub fn new<P: Into<std::path::PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for DirFetcher {
    fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|e| LoadError::Fetch(format!("{}: {}", full.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::model::fixtures::audio_data;
    use std::collections::HashMap;

    /// Four detached mount points keyed by slot.
    struct TestSlots(HashMap<SlotId, Element>);

    impl TestSlots {
        fn new() -> Self {
            Self(SlotId::ALL.iter().map(|id| (*id, Element::new("div").id(id.element_id()))).collect())
        }

        fn get(&self, id: SlotId) -> &Element {
            &self.0[&id]
        }

        fn all_empty(&self) -> bool {
            self.0.values().all(|e| e.is_empty())
        }
    }

    impl Slots for TestSlots {
        type Slot = Element;

        fn slot(&mut self, id: SlotId) -> Option<&mut Element> {
            self.0.get_mut(&id)
        }
    }

    struct StaticFetcher(std::result::Result<&'static str, &'static str>);

    impl Fetcher for StaticFetcher {
        fn fetch(&self, path: &str) -> Result<String> {
            assert_eq!(path, DATA_PATH);
            self.0.map(str::to_string).map_err(|e| LoadError::Fetch(e.to_string()))
        }
    }

    // ==========================================================================
    // SUCCESS PATH TESTS
    // ==========================================================================

    #[test]
    fn test_success_renders_all_slots() {
        let mut slots = TestSlots::new();
        let mut diag: Vec<String> = Vec::new();
        let mut loader = DataLoader::new();

        let state = loader.finish(Ok(audio_data(&["Medical"])), &mut slots, &mut diag);

        assert_eq!(state, LoadState::Rendered);
        assert!(diag.is_empty());
        for id in SlotId::ALL {
            assert!(!slots.get(id).is_empty(), "{:?} should have content", id);
        }
        // case1 fixture: 2 sentences -> header + 2 cards
        assert_eq!(slots.get(SlotId::Case1Audio).child_elements().count(), 3);
        // table + footnote
        assert_eq!(slots.get(SlotId::Case3Table).child_elements().count(), 2);
    }

    #[test]
    fn test_case3_sections_share_priority_order() {
        let mut slots = TestSlots::new();
        let mut loader = DataLoader::new();
        let data = audio_data(&["Governance", "Medical", "Navigation"]);

        loader.finish(Ok(data), &mut slots, &mut Vec::<String>::new());

        let table_order: Vec<_> = slots
            .get(SlotId::Case3Table)
            .find_all("tr")
            .iter()
            .skip(1)
            .map(|tr| tr.child_elements().next().unwrap().text_content())
            .collect();
        assert_eq!(table_order, vec!["Medical", "Navigation", "Governance"]);

        let audio_order: Vec<_> = slots
            .get(SlotId::Case3Audio)
            .child_elements()
            .map(|card| card.find_all("h3")[0].text_content())
            .collect();
        assert_eq!(audio_order, vec!["Medical", "Navigation", "Governance"]);
    }

    #[test]
    fn test_missing_slot_is_skipped() {
        let mut slots = TestSlots::new();
        slots.0.remove(&SlotId::Case2Audio);
        let mut loader = DataLoader::new();

        let state = loader.finish(Ok(audio_data(&["Medical"])), &mut slots, &mut Vec::<String>::new());
        assert_eq!(state, LoadState::Rendered);
        assert!(!slots.get(SlotId::Case1Audio).is_empty());
    }

    // ==========================================================================
    // FAILURE CONTAINMENT TESTS
    // ==========================================================================
    //
    // A failed fetch or a bad body appends nothing to any slot and produces
    // exactly one diagnostic line.
    // ==========================================================================

    #[test]
    fn test_fetch_failure_contained() {
        let mut slots = TestSlots::new();
        let mut diag: Vec<String> = Vec::new();
        let mut loader = DataLoader::new();

        let state = load(&mut loader, &StaticFetcher(Err("connection refused")), &mut slots, &mut diag);

        assert_eq!(state, LoadState::Failed);
        assert!(slots.all_empty());
        assert_eq!(diag.len(), 1);
        assert!(diag[0].starts_with("Failed to load audio data"));
        assert!(diag[0].contains("connection refused"));
    }

    #[test]
    fn test_malformed_json_contained() {
        let mut slots = TestSlots::new();
        let mut diag: Vec<String> = Vec::new();
        let mut loader = DataLoader::new();

        let state = load(&mut loader, &StaticFetcher(Ok("{ not json")), &mut slots, &mut diag);

        assert_eq!(state, LoadState::Failed);
        assert!(slots.all_empty());
        assert_eq!(diag.len(), 1);
        assert!(diag[0].contains("Parse error"));
    }

    #[test]
    fn test_shape_mismatch_contained() {
        // Valid JSON, wrong shape: no partial rendering of case1/case2
        let mut slots = TestSlots::new();
        let mut diag: Vec<String> = Vec::new();
        let mut loader = DataLoader::new();

        let body = r#"{ "case1": { "title": "t", "subtitle": "s", "sentences": [] } }"#;
        let state = load(&mut loader, &StaticFetcher(Ok(body)), &mut slots, &mut diag);

        assert_eq!(state, LoadState::Failed);
        assert!(slots.all_empty());
        assert_eq!(diag.len(), 1);
    }

    // ==========================================================================
    // STATE MACHINE TESTS
    // ==========================================================================

    #[test]
    fn test_runs_exactly_once() {
        let mut slots = TestSlots::new();
        let mut diag: Vec<String> = Vec::new();
        let mut loader = DataLoader::new();
        assert_eq!(loader.state(), LoadState::Loading);

        loader.finish(Ok(audio_data(&["Medical"])), &mut slots, &mut diag);
        let before = slots.get(SlotId::Case1Audio).child_elements().count();

        // Neither a second success nor a late failure changes anything
        assert_eq!(loader.finish(Ok(audio_data(&["Medical"])), &mut slots, &mut diag), LoadState::Rendered);
        assert_eq!(
            loader.finish(Err(LoadError::Fetch("late".into())), &mut slots, &mut diag),
            LoadState::Rendered
        );
        assert_eq!(slots.get(SlotId::Case1Audio).child_elements().count(), before);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut slots = TestSlots::new();
        let mut diag: Vec<String> = Vec::new();
        let mut loader = DataLoader::new();

        load(&mut loader, &StaticFetcher(Err("offline")), &mut slots, &mut diag);
        let state = load(&mut loader, &StaticFetcher(Ok("{}")), &mut slots, &mut diag);

        assert_eq!(state, LoadState::Failed, "no retry");
        assert_eq!(diag.len(), 1);
        assert!(slots.all_empty());
    }

    // ==========================================================================
    // DIRECTORY FETCHER TESTS
    // ==========================================================================

    #[test]
    fn test_dir_fetcher_reads_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("assets/data");
        std::fs::create_dir_all(&data_dir).unwrap();
        let body = serde_json::to_string(&audio_data(&["Medical"])).unwrap();
        std::fs::write(data_dir.join("audio.json"), &body).unwrap();

        let fetcher = DirFetcher::new(dir.path());
        assert_eq!(fetcher.fetch(DATA_PATH).unwrap(), body);
    }

    #[test]
    fn test_dir_fetcher_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirFetcher::new(dir.path()).fetch(DATA_PATH).unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)));
    }

    #[test]
    fn test_slot_ids() {
        let ids: Vec<_> = SlotId::ALL.iter().map(|s| s.element_id()).collect();
        assert_eq!(ids, vec!["case1-audio", "case2-audio", "case3-table", "case3-audio"]);
    }
}
