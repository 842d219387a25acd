//! Page data model
//!
//! Everything the page shows comes from one JSON document
//! (`assets/data/audio.json`). The shapes here mirror that file exactly;
//! unknown fields are ignored so the data file can carry authoring notes.
//!
//! ```text
//! {
//!   "case1": { "title", "subtitle", "sentences": [ { "text", "voices": [ { "label", "original", "received" } ] } ] },
//!   "case2": { ...same as case1... },
//!   "case3": { "scenarios": [ { "context", "query", "intended", "injected",
//!                               "audio": { "speaker", "received", "denoised", "injected" } } ] }
//! }
//! ```
//!
//! Audio fields are audio-refs: URIs relative to the site root, fetched by
//! the browser only when the visitor presses play.

use serde::{Deserialize, Serialize};

/// Root of the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioData {
    pub case1: CaseStudy,
    pub case2: CaseStudy,
    pub case3: ScenarioSet,
}

/// One narrative section: a header plus sentence-level voice comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub title: String,
    pub subtitle: String,
    pub sentences: Vec<Sentence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub voices: Vec<Voice>,
}

/// A speaker's clip as recorded and as received through the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub label: String,
    pub original: String,
    pub received: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
}

/// One injected-communication attack, keyed by its context category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub context: String,
    pub query: String,
    pub intended: String,
    pub injected: String,
    pub audio: ScenarioAudio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAudio {
    pub speaker: String,
    pub received: String,
    pub denoised: String,
    pub injected: String,
}

/// The four audio artifacts of a scenario, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSlot {
    Speaker,
    Received,
    Denoised,
    Injected,
}

impl AudioSlot {
    pub const ALL: [AudioSlot; 4] = [
        AudioSlot::Speaker,
        AudioSlot::Received,
        AudioSlot::Denoised,
        AudioSlot::Injected,
    ];

    /// Card heading shown above the player.
    pub fn label(self) -> &'static str {
        match self {
            AudioSlot::Speaker => "Speaker (ground truth)",
            AudioSlot::Received => "Received leakage",
            AudioSlot::Denoised => "Denoised output",
            AudioSlot::Injected => "Injected response",
        }
    }

    /// Field name in the data file.
    pub fn key(self) -> &'static str {
        match self {
            AudioSlot::Speaker => "speaker",
            AudioSlot::Received => "received",
            AudioSlot::Denoised => "denoised",
            AudioSlot::Injected => "injected",
        }
    }
}

impl ScenarioAudio {
    pub fn get(&self, slot: AudioSlot) -> &str {
        match slot {
            AudioSlot::Speaker => &self.speaker,
            AudioSlot::Received => &self.received,
            AudioSlot::Denoised => &self.denoised,
            AudioSlot::Injected => &self.injected,
        }
    }
}

impl AudioData {
    /// Every audio-ref in document order, paired with where it came from.
    ///
    /// Used by the asset checker; the renderers walk the structure directly.
    pub fn audio_refs(&self) -> Vec<AudioRef<'_>> {
        let mut refs = Vec::new();

        for (case, study) in [("case1", &self.case1), ("case2", &self.case2)] {
            for (i, sentence) in study.sentences.iter().enumerate() {
                for voice in &sentence.voices {
                    refs.push(AudioRef {
                        origin: format!("{}.sentences[{}] {} / original", case, i, voice.label),
                        src: &voice.original,
                    });
                    refs.push(AudioRef {
                        origin: format!("{}.sentences[{}] {} / received", case, i, voice.label),
                        src: &voice.received,
                    });
                }
            }
        }

        for scenario in &self.case3.scenarios {
            for slot in AudioSlot::ALL {
                refs.push(AudioRef {
                    origin: format!("case3 {} / {}", scenario.context, slot.key()),
                    src: scenario.audio.get(slot),
                });
            }
        }

        refs
    }
}

/// An audio-ref together with a human-readable description of its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRef<'a> {
    pub origin: String,
    pub src: &'a str,
}
