//! The ethical-framework vocabulary.

use serde::{Deserialize, Serialize};

/// One of the three fixed ethical-reasoning categories a player can invoke
/// per scenario. The set is closed; declaration order is the canonical
/// presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Rule- and principle-based reasoning (deontology).
    Duty,
    /// Consequence-based reasoning (consequentialism).
    Outcomes,
    /// Virtue-based reasoning (virtue ethics).
    Character,
}

impl Framework {
    /// All frameworks in presentation order.
    pub const ALL: [Framework; 3] = [Framework::Duty, Framework::Outcomes, Framework::Character];

    /// The lowercase wire key for this framework.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Framework::Duty => "duty",
            Framework::Outcomes => "outcomes",
            Framework::Character => "character",
        }
    }

    /// The capitalized display label for this framework.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Framework::Duty => "Duty",
            Framework::Outcomes => "Outcomes",
            Framework::Character => "Character",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
