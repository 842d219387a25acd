//! Case 1 / case 2 narrative sections

use super::{audio_row, CARD_CLASS};
use crate::dom::{Container, Element};
use crate::model::{CaseStudy, Sentence, Voice};

pub const ORIGINAL_LABEL: &str = "Original";
pub const RECEIVED_LABEL: &str = "Received (through-wall)";

/// Append the header card, then one card per sentence.
pub fn render_case_study<C: Container + ?Sized>(container: &mut C, study: &CaseStudy) {
    container.append(header_card(study));
    for sentence in &study.sentences {
        container.append(sentence_card(sentence));
    }
}

fn header_card(study: &CaseStudy) -> Element {
    Element::new("div")
        .class(CARD_CLASS)
        .child(Element::new("h3").text(&study.title))
        .child(Element::new("p").class("case-meta").text(&study.subtitle))
}

fn sentence_card(sentence: &Sentence) -> Element {
    Element::new("div")
        .class(CARD_CLASS)
        .child(Element::new("h3").text(&sentence.text))
        .child(
            Element::new("div")
                .class("voice-grid")
                .children(sentence.voices.iter().map(voice_card)),
        )
}

fn voice_card(voice: &Voice) -> Element {
    Element::new("div")
        .class("voice-card")
        .child(Element::new("h4").text(&voice.label))
        .child(audio_row(ORIGINAL_LABEL, &voice.original))
        .child(audio_row(RECEIVED_LABEL, &voice.received))
}
