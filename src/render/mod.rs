//! Page section renderers
//!
//! Each renderer appends one section's content into a [`Container`]:
//!
//! - [`audio_row`]: labelled inline player, the building block of the others
//! - [`case_study`]: narrative header plus per-sentence voice comparisons
//! - [`table`]: the case-3 attack comparison table
//! - [`scenario_audio`]: the case-3 four-way audio grid per scenario
//!
//! Renderers never clear their container; they only append.
//!
//! [`Container`]: crate::dom::Container

pub mod audio_row;
pub mod case_study;
pub mod scenario_audio;
pub mod table;

pub use audio_row::audio_row;
pub use case_study::render_case_study;
pub use scenario_audio::render_scenario_audio;
pub use table::render_comparison_table;

/// Class of the generic content card used by every section.
pub const CARD_CLASS: &str = "case-card";
