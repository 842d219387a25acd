//! Wallcast - through-wall audio leakage case-study page
//!
//! Wallcast renders the case-study page for the through-wall speech leakage
//! and response-injection experiments from a single JSON data file.
//!
//! # Overview
//!
//! The page has three sections:
//!
//! 1. **Case 1 / Case 2**: sentences spoken on one side of a wall, each with
//!    the original recording and what a receiver picked up on the other side.
//! 2. **Case 3**: five attack scenarios (Medical, Financial, Logistics,
//!    Navigation, Governance). A comparison table lists the intended and
//!    injected replies with each attack's impact. Per scenario, a four-way
//!    audio grid plays ground truth, leakage, denoised and injected audio.
//!
//! Sections fade in once 15% of them scrolls into view, once per element.
//!
//! # Two delivery paths, one renderer
//!
//! - **Browser**: the `wasm-site` crate fetches `assets/data/audio.json`,
//!   renders into the four mount points and drives the reveal controller.
//! - **Native**: `wallcast render` runs the same renderers into an
//!   in-memory [`dom::Element`] tree and writes a complete HTML file;
//!   `wallcast serve` previews it; `wallcast check` verifies every clip.
//!
//! # Quick Start
//!
//! ```no_run
//! use wallcast::loader::{load, DataLoader, DirFetcher, LoadState, Stderr};
//! use wallcast::page::{Page, PageOptions};
//!
//! let mut page = Page::new(&PageOptions::default());
//! let state = load(&mut DataLoader::new(), &DirFetcher::new("site"), &mut page, &mut Stderr);
//!
//! if state == LoadState::Rendered {
//!     std::fs::write("site/index.html", page.to_html()).unwrap();
//! }
//! ```
//!
//! # Modules
//!
//! - [`model`]: serde shapes of the data file
//! - [`catalog`]: fixed category → impact table and display order
//! - [`dom`]: escaped element tree and the [`dom::Container`] mount seam
//! - [`render`]: audio row, case study, comparison table, scenario audio
//! - [`loader`]: one-shot fetch/parse/dispatch state machine
//! - [`reveal`]: one-shot scroll-reveal state machine
//! - [`page`]: page skeleton and document serialisation
//! - `check` / `serve` (feature `cli`): asset checker and preview server

pub mod catalog;
pub mod dom;
pub mod loader;
pub mod model;
pub mod page;
pub mod render;
pub mod reveal;

#[cfg(feature = "cli")]
pub mod check;
#[cfg(feature = "cli")]
pub mod serve;

pub use loader::{DataLoader, LoadError, LoadState, SlotId, DATA_PATH};
pub use model::{AudioData, CaseStudy, Scenario};
pub use page::{Page, PageOptions};
pub use reveal::{IntersectionEntry, RevealController, READY_CLASS, REVEAL_THRESHOLD};
