//! Placeholder rendering for explanation templates.
//!
//! Templates use `{name}` placeholders, e.g.
//! `"{scenarioLabel} directly changes {targetLabel}."`. Placeholders without
//! a substitution are left verbatim so a missing label is visible rather
//! than silently dropped.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Placeholder for the scenario title in mechanism templates.
pub const SCENARIO_LABEL: &str = "scenarioLabel";

/// Placeholder for the target indicator name in mechanism templates.
pub const TARGET_LABEL: &str = "targetLabel";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex is valid"))
}

/// Renders `template`, replacing every `{name}` that has an entry in
/// `substitutions`.
#[must_use]
pub fn render_template(template: &str, substitutions: &HashMap<&str, &str>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            substitutions
                .get(&caps[1])
                .map_or_else(|| caps[0].to_string(), |value| (*value).to_string())
        })
        .into_owned()
}

/// Names of all placeholders in `template`, in order of first appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Convenience for the two labels every mechanism template uses.
#[must_use]
pub fn render_labels(template: &str, scenario_label: &str, target_label: &str) -> String {
    let substitutions = HashMap::from([(SCENARIO_LABEL, scenario_label), (TARGET_LABEL, target_label)]);
    render_template(template, &substitutions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_all_occurrences() {
        let out = render_labels(
            "{scenarioLabel} moves {targetLabel}; {targetLabel} reacts.",
            "Fed Hawkish Surprise",
            "Mortgage Rates",
        );
        assert_eq!(
            out,
            "Fed Hawkish Surprise moves Mortgage Rates; Mortgage Rates reacts."
        );
    }

    #[test]
    fn unknown_placeholders_left_verbatim() {
        let subs = HashMap::from([("a", "1")]);
        assert_eq!(render_template("{a} {b}", &subs), "1 {b}");
    }

    #[test]
    fn substitution_values_are_not_rescanned() {
        let out = render_labels("{scenarioLabel}", "{targetLabel}", "X");
        assert_eq!(out, "{targetLabel}");
    }

    #[test]
    fn lists_placeholders_once() {
        assert_eq!(
            placeholders("{targetLabel} {scenarioLabel} {targetLabel} {1bad}"),
            vec!["targetLabel", "scenarioLabel"]
        );
        assert!(placeholders("no braces").is_empty());
    }
}
