//! Fixed scenario categories
//!
//! The five attack contexts, the harm each one stands for, and the order the
//! page presents them in. These are compile-time tables; nothing mutates them.

use crate::model::Scenario;

/// Context category → attack impact shown in the comparison table.
pub static IMPACTS: &[(&str, &str)] = &[
    ("Medical", "Physical Harm"),
    ("Financial", "Financial Loss"),
    ("Logistics", "Operational Delay"),
    ("Navigation", "Intentional Misdirection"),
    ("Governance", "Forced Consensus"),
];

/// Display priority of the context categories.
pub static SCENARIO_ORDER: &[&str] = &["Medical", "Financial", "Logistics", "Navigation", "Governance"];

/// Impact for a context, or `""` when the context isn't one of the five.
pub fn impact_for(context: &str) -> &'static str {
    IMPACTS
        .iter()
        .find(|(category, _)| *category == context)
        .map(|(_, impact)| *impact)
        .unwrap_or("")
}

/// Position of a context in [`SCENARIO_ORDER`]; unknown contexts rank last.
pub fn rank(context: &str) -> usize {
    SCENARIO_ORDER
        .iter()
        .position(|c| *c == context)
        .unwrap_or(SCENARIO_ORDER.len())
}

pub fn is_known(context: &str) -> bool {
    rank(context) < SCENARIO_ORDER.len()
}

/// New sequence of scenarios in display order.
///
/// Stable: scenarios sharing a rank (including all unknown contexts) keep
/// their input order.
pub fn order_scenarios(scenarios: &[Scenario]) -> Vec<Scenario> {
    let mut ordered = scenarios.to_vec();
    ordered.sort_by_key(|s| rank(&s.context));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::scenario;

    // ==========================================================================
    // IMPACT LOOKUP TESTS
    // ==========================================================================
    //
    // Every known category maps to its fixed impact string; anything else
    // renders as an empty cell.
    // ==========================================================================

    #[test]
    fn test_impact_known_categories() {
        assert_eq!(impact_for("Medical"), "Physical Harm");
        assert_eq!(impact_for("Financial"), "Financial Loss");
        assert_eq!(impact_for("Logistics"), "Operational Delay");
        assert_eq!(impact_for("Navigation"), "Intentional Misdirection");
        assert_eq!(impact_for("Governance"), "Forced Consensus");
    }

    #[test]
    fn test_impact_unknown_category_is_empty() {
        assert_eq!(impact_for("Retail"), "");
        assert_eq!(impact_for(""), "");
        // Lookup is case-sensitive, same as the data file keys
        assert_eq!(impact_for("medical"), "");
    }

    #[test]
    fn test_tables_agree() {
        // Every ordered category has an impact and vice versa
        assert_eq!(IMPACTS.len(), SCENARIO_ORDER.len());
        for category in SCENARIO_ORDER {
            assert!(!impact_for(category).is_empty(), "{} has no impact", category);
        }
    }

    // ==========================================================================
    // ORDERING TESTS
    // ==========================================================================

    fn contexts(scenarios: &[Scenario]) -> Vec<&str> {
        scenarios.iter().map(|s| s.context.as_str()).collect()
    }

    #[test]
    fn test_order_follows_priority_list() {
        let input = vec![scenario("Governance"), scenario("Medical"), scenario("Navigation")];
        let ordered = order_scenarios(&input);

        assert_eq!(contexts(&ordered), vec!["Medical", "Navigation", "Governance"]);
        // Input untouched
        assert_eq!(contexts(&input), vec!["Governance", "Medical", "Navigation"]);
    }

    #[test]
    fn test_order_full_set_reversed() {
        let input: Vec<_> = SCENARIO_ORDER.iter().rev().map(|c| scenario(c)).collect();
        let ordered = order_scenarios(&input);
        assert_eq!(contexts(&ordered), SCENARIO_ORDER.to_vec());
    }

    #[test]
    fn test_unknown_contexts_sort_last_and_stable() {
        let input = vec![
            scenario("Zeta"),
            scenario("Financial"),
            scenario("Alpha"),
            scenario("Medical"),
        ];
        let ordered = order_scenarios(&input);
        assert_eq!(contexts(&ordered), vec!["Medical", "Financial", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_rank_and_known() {
        assert_eq!(rank("Medical"), 0);
        assert_eq!(rank("Governance"), 4);
        assert_eq!(rank("Other"), 5);
        assert!(is_known("Logistics"));
        assert!(!is_known("Other"));
    }

    #[test]
    fn test_order_empty() {
        assert!(order_scenarios(&[]).is_empty());
    }
}
