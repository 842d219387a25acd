//! Case 3 attack comparison table

use crate::catalog::impact_for;
use crate::dom::{Container, Element};
use crate::model::Scenario;

pub const TABLE_HEADERS: [&str; 5] = [
    "Context Type",
    "Bob's Query",
    "Intended Reply",
    "Injected Reply",
    "Attack Impact",
];

pub const TABLE_NOTE: &str =
    "Injected replies are synthesized and transmitted over the active EM injection channel.";

/// Append the table (one body row per scenario, in the given order) and its
/// footnote.
pub fn render_comparison_table<C: Container + ?Sized>(container: &mut C, scenarios: &[Scenario]) {
    let head = Element::new("thead").child(
        Element::new("tr").children(TABLE_HEADERS.iter().map(|h| Element::new("th").text(*h))),
    );
    let body = Element::new("tbody").children(scenarios.iter().map(scenario_row));

    container.append(Element::new("table").child(head).child(body));
    container.append(Element::new("p").class("table-note").text(TABLE_NOTE));
}

fn scenario_row(scenario: &Scenario) -> Element {
    let cells = [
        scenario.context.as_str(),
        scenario.query.as_str(),
        scenario.intended.as_str(),
        scenario.injected.as_str(),
        impact_for(&scenario.context),
    ];
    Element::new("tr").children(cells.iter().map(|c| Element::new("td").text(*c)))
}
