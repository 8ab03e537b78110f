//! Crossroads — static content for the quiz engine.
//!
//! Responsible for the ethical-framework vocabulary, the scenario deck
//! (YAML-authored, validated, Markdown narratives compiled to HTML,
//! fingerprinted), and the built-in default deck.

pub mod deck;
pub mod framework;

pub use deck::{Deck, Scenario, SummarySet};
pub use framework::Framework;
