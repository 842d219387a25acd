//! Case 3 per-scenario audio comparison

use super::{audio_row, CARD_CLASS};
use crate::dom::{Container, Element};
use crate::model::{AudioSlot, Scenario};

/// Label of the player inside each audio card; the card heading names the slot.
pub const PLAYER_LABEL: &str = "Audio";

/// One card per scenario, in the given order.
pub fn render_scenario_audio<C: Container + ?Sized>(container: &mut C, scenarios: &[Scenario]) {
    for scenario in scenarios {
        container.append(scenario_card(scenario));
    }
}

fn scenario_card(scenario: &Scenario) -> Element {
    let audio_grid = Element::new("div").class("voice-grid").children(AudioSlot::ALL.iter().map(|slot| {
        Element::new("div")
            .class("voice-card")
            .child(Element::new("h4").text(slot.label()))
            .child(audio_row(PLAYER_LABEL, scenario.audio.get(*slot)))
    }));

    let replies = Element::new("div")
        .class("scenario-grid")
        .child(reply_card("Intended reply", &scenario.intended))
        .child(reply_card("Injected reply", &scenario.injected));

    Element::new("div")
        .class(CARD_CLASS)
        .child(Element::new("h3").text(&scenario.context))
        .child(Element::new("p").class("case-meta").text(&scenario.query))
        .child(audio_grid)
        .child(replies)
}

fn reply_card(heading: &str, text: &str) -> Element {
    Element::new("div")
        .class("scenario-card")
        .child(Element::new("strong").text(heading))
        .child(Element::new("p").text(text))
}
