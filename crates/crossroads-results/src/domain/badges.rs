//! Badge catalog and earning predicates.

use crossroads_content::Framework;
use serde::Serialize;

use super::tally::FrameworkCounts;

/// Minimum single-framework count for the Decisive badge. A fixed constant,
/// independent of the deck's scenario count.
pub const DECISIVE_THRESHOLD: u32 = 5;

/// Symbolic badge keys, in declaration (and presentation) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKey {
    /// Completed the full run of scenarios.
    Explorer,
    /// Chose one framework for every scenario.
    Purist,
    /// Used all three frameworks at least once.
    Balanced,
    /// Leaned on one framework at least five times.
    Decisive,
}

/// Static badge definition: display data plus an earning predicate over the
/// final counts and the completion fact.
#[derive(Debug)]
pub struct BadgeDef {
    /// Symbolic key.
    pub key: BadgeKey,
    /// Icon glyph for the results screen.
    pub icon: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description of how it was earned.
    pub description: &'static str,
}

/// The closed set of badges, in presentation order.
pub static BADGES: [BadgeDef; 4] = [
    BadgeDef {
        key: BadgeKey::Explorer,
        icon: "🌟",
        name: "Explorer",
        description: "Faced every dilemma to the end",
    },
    BadgeDef {
        key: BadgeKey::Purist,
        icon: "🎯",
        name: "Purist",
        description: "Held to a single framework throughout",
    },
    BadgeDef {
        key: BadgeKey::Balanced,
        icon: "⚖️",
        name: "Balanced",
        description: "Drew on all three frameworks",
    },
    BadgeDef {
        key: BadgeKey::Decisive,
        icon: "⚡",
        name: "Decisive",
        description: "Leaned on one framework five times or more",
    },
];

/// Evaluates all badge predicates and returns the earned badges in
/// declaration order. Badges are not mutually exclusive; any subset may
/// fire.
#[must_use]
pub fn earned_badges(
    counts: &FrameworkCounts,
    scenario_count: u32,
    session_complete: bool,
) -> Vec<&'static BadgeDef> {
    BADGES
        .iter()
        .filter(|badge| match badge.key {
            // Explicit predicate rather than an assumption, so a partial
            // session summary withholds it.
            BadgeKey::Explorer => session_complete,
            BadgeKey::Purist => scenario_count > 0 && counts.max() == scenario_count,
            BadgeKey::Balanced => Framework::ALL
                .iter()
                .all(|framework| counts.count(*framework) >= 1),
            BadgeKey::Decisive => counts.max() >= DECISIVE_THRESHOLD,
        })
        .collect()
}
