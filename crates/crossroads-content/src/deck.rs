//! Scenario deck — parsing, validation, and compilation.
//!
//! Decks are authored in YAML. Loading a deck parses the source, validates
//! the content contract (unique positive scenario ids, a response for every
//! framework), compiles the Markdown summary narratives to HTML, and
//! fingerprints the source with SHA-256. Content-integrity defects (a
//! scenario missing a response) are warnings with an empty-string fallback,
//! not load failures: a content defect must not take down a working session.

use std::collections::BTreeMap;

use pulldown_cmark::{Parser, html};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crossroads_core::error::DomainError;

use crate::framework::Framework;

/// YAML source of the built-in deck of seven dilemmas.
const DEFAULT_DECK_YAML: &str = include_str!("../assets/default_deck.yaml");

/// One static dilemma: a prompt and a response explanation per framework.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Positive integer, unique within the deck; defines presentation order.
    pub id: u32,
    /// The dilemma prompt shown to the player.
    pub text: String,
    responses: BTreeMap<Framework, String>,
}

impl Scenario {
    /// Returns the response explanation for the given framework.
    ///
    /// A missing entry is a content-authoring defect already reported during
    /// deck validation; the lookup falls back to the empty string.
    #[must_use]
    pub fn response_for(&self, framework: Framework) -> &str {
        self.responses
            .get(&framework)
            .map_or("", String::as_str)
    }
}

/// The fixed narrative summaries shown on the results screen, compiled from
/// Markdown to HTML.
#[derive(Debug, Clone)]
pub struct SummarySet {
    duty: String,
    outcomes: String,
    character: String,
    balanced: String,
}

impl SummarySet {
    /// The narrative for a single dominant framework.
    #[must_use]
    pub fn narrative_for(&self, framework: Framework) -> &str {
        match framework {
            Framework::Duty => &self.duty,
            Framework::Outcomes => &self.outcomes,
            Framework::Character => &self.character,
        }
    }

    /// The narrative for a tied (balanced) result.
    #[must_use]
    pub fn balanced(&self) -> &str {
        &self.balanced
    }
}

/// The fixed ordered list of scenarios plus the summary narratives.
#[derive(Debug, Clone)]
pub struct Deck {
    title: String,
    version_hash: String,
    scenarios: Vec<Scenario>,
    summaries: SummarySet,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    title: String,
    #[serde(default)]
    scenarios: Vec<ScenarioFile>,
    summaries: SummariesFile,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    id: u32,
    text: String,
    #[serde(default)]
    responses: BTreeMap<Framework, String>,
}

#[derive(Debug, Deserialize)]
struct SummariesFile {
    duty: String,
    outcomes: String,
    character: String,
    balanced: String,
}

impl Deck {
    /// Parses, validates, and compiles a deck from YAML source.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the YAML does not parse, a
    /// scenario id is zero, or two scenarios share an id. Missing framework
    /// responses are warnings, not errors.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let file: DeckFile = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("deck parse failed: {e}")))?;

        let mut scenarios: Vec<Scenario> = file
            .scenarios
            .into_iter()
            .map(|s| Scenario {
                id: s.id,
                text: s.text,
                responses: s.responses,
            })
            .collect();

        // Scenario id defines presentation order.
        scenarios.sort_by_key(|s| s.id);
        validate(&scenarios)?;

        Ok(Self {
            title: file.title,
            version_hash: fingerprint(source),
            scenarios,
            summaries: SummarySet {
                duty: render_markdown(&file.summaries.duty),
                outcomes: render_markdown(&file.summaries.outcomes),
                character: render_markdown(&file.summaries.character),
                balanced: render_markdown(&file.summaries.balanced),
            },
        })
    }

    /// The built-in deck of seven dilemmas.
    ///
    /// # Panics
    ///
    /// Panics if the embedded deck source is invalid — a compile-time asset
    /// defect, not a runtime condition.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_yaml(DEFAULT_DECK_YAML).expect("built-in deck is valid")
    }

    /// The deck title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Hex-encoded SHA-256 of the deck's YAML source.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// The scenario at a 0-based position, or `None` past the end.
    #[must_use]
    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// All scenarios in presentation order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios in the deck.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// The compiled summary narratives.
    #[must_use]
    pub fn summaries(&self) -> &SummarySet {
        &self.summaries
    }
}

fn validate(scenarios: &[Scenario]) -> Result<(), DomainError> {
    for pair in scenarios.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(DomainError::Validation(format!(
                "duplicate scenario id {}",
                pair[0].id
            )));
        }
    }

    for scenario in scenarios {
        if scenario.id == 0 {
            return Err(DomainError::Validation(
                "scenario id must be a positive integer".to_owned(),
            ));
        }
        for framework in Framework::ALL {
            if !scenario.responses.contains_key(&framework) {
                tracing::warn!(
                    scenario_id = scenario.id,
                    framework = %framework,
                    "scenario is missing a framework response; empty fallback will be served"
                );
            }
        }
    }

    Ok(())
}

fn render_markdown(source: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(source));
    out
}

fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SUMMARIES: &str = r"
summaries:
  duty: You lean toward duty.
  outcomes: You lean toward outcomes.
  character: You lean toward character.
  balanced: You show a balanced approach.
";

    fn deck_yaml(scenarios: &str) -> String {
        format!("title: Test Deck\nscenarios:\n{scenarios}{MINIMAL_SUMMARIES}")
    }

    #[test]
    fn test_builtin_deck_has_seven_complete_scenarios() {
        let deck = Deck::builtin();

        assert_eq!(deck.scenario_count(), 7);
        for (index, scenario) in deck.scenarios().iter().enumerate() {
            assert_eq!(scenario.id as usize, index + 1);
            for framework in Framework::ALL {
                assert!(
                    !scenario.response_for(framework).is_empty(),
                    "scenario {} missing {framework} response",
                    scenario.id
                );
            }
        }
    }

    #[test]
    fn test_builtin_summaries_are_compiled_to_html() {
        let deck = Deck::builtin();

        // Markdown emphasis must come out as HTML on the results screen.
        assert!(deck.summaries().narrative_for(Framework::Duty).contains("<strong>"));
        assert!(deck.summaries().balanced().contains("<p>"));
    }

    #[test]
    fn test_from_yaml_sorts_scenarios_by_id() {
        let source = deck_yaml(
            "  - id: 2\n    text: Second.\n  - id: 1\n    text: First.\n",
        );

        let deck = Deck::from_yaml(&source).unwrap();

        assert_eq!(deck.scenario(0).unwrap().id, 1);
        assert_eq!(deck.scenario(1).unwrap().id, 2);
        assert!(deck.scenario(2).is_none());
    }

    #[test]
    fn test_from_yaml_rejects_duplicate_ids() {
        let source = deck_yaml(
            "  - id: 1\n    text: One.\n  - id: 1\n    text: Also one.\n",
        );

        let result = Deck::from_yaml(&source);

        match result.unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("duplicate scenario id 1")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_rejects_zero_id() {
        let source = deck_yaml("  - id: 0\n    text: Zeroth.\n");

        assert!(Deck::from_yaml(&source).is_err());
    }

    #[test]
    fn test_missing_response_falls_back_to_empty_string() {
        let source = deck_yaml(
            "  - id: 1\n    text: Prompt.\n    responses:\n      duty: The duty response.\n",
        );

        let deck = Deck::from_yaml(&source).unwrap();
        let scenario = deck.scenario(0).unwrap();

        assert_eq!(scenario.response_for(Framework::Duty), "The duty response.");
        assert_eq!(scenario.response_for(Framework::Outcomes), "");
        assert_eq!(scenario.response_for(Framework::Character), "");
    }

    #[test]
    fn test_zero_scenario_deck_is_legitimate() {
        let source = format!("title: Empty Deck\n{MINIMAL_SUMMARIES}");

        let deck = Deck::from_yaml(&source).unwrap();

        assert_eq!(deck.scenario_count(), 0);
    }

    #[test]
    fn test_version_hash_is_stable_over_source() {
        let source = deck_yaml("  - id: 1\n    text: Prompt.\n");

        let a = Deck::from_yaml(&source).unwrap();
        let b = Deck::from_yaml(&source).unwrap();

        assert_eq!(a.version_hash(), b.version_hash());
        assert_eq!(a.version_hash().len(), 64);
    }

    #[test]
    fn test_from_yaml_rejects_malformed_source() {
        assert!(Deck::from_yaml("title: [unclosed").is_err());
    }
}
