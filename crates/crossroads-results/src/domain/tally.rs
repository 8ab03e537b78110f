//! Pure tally functions over a recorded choice sequence.

use crossroads_content::{Framework, SummarySet};
use serde::Serialize;

/// Per-framework choice counts. Derived from the choice sequence on every
/// aggregation; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameworkCounts {
    /// Choices recorded for duty.
    pub duty: u32,
    /// Choices recorded for outcomes.
    pub outcomes: u32,
    /// Choices recorded for character.
    pub character: u32,
}

impl FrameworkCounts {
    /// The count for a single framework.
    #[must_use]
    pub fn count(&self, framework: Framework) -> u32 {
        match framework {
            Framework::Duty => self.duty,
            Framework::Outcomes => self.outcomes,
            Framework::Character => self.character,
        }
    }

    /// Sum of all three counts; equals the number of recorded choices.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.duty + self.outcomes + self.character
    }

    /// The maximum single-framework count.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.duty.max(self.outcomes).max(self.character)
    }
}

/// Per-framework share of the total, in percent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameworkPercentages {
    /// Duty share, 0–100.
    pub duty: f64,
    /// Outcomes share, 0–100.
    pub outcomes: f64,
    /// Character share, 0–100.
    pub character: f64,
}

/// Counts each framework in the recorded sequence.
#[must_use]
pub fn compute_counts(choices: &[Framework]) -> FrameworkCounts {
    let mut counts = FrameworkCounts::default();
    for framework in choices {
        match framework {
            Framework::Duty => counts.duty += 1,
            Framework::Outcomes => counts.outcomes += 1,
            Framework::Character => counts.character += 1,
        }
    }
    counts
}

/// Computes each framework's percentage share of `total`.
///
/// A zero total is a defined edge case (the zero-scenario configuration),
/// yielding 0.0 for all three rather than NaN.
#[must_use]
pub fn compute_percentages(counts: &FrameworkCounts, total: u32) -> FrameworkPercentages {
    if total == 0 {
        return FrameworkPercentages {
            duty: 0.0,
            outcomes: 0.0,
            character: 0.0,
        };
    }
    let share = |count: u32| f64::from(count) / f64::from(total) * 100.0;
    FrameworkPercentages {
        duty: share(counts.duty),
        outcomes: share(counts.outcomes),
        character: share(counts.character),
    }
}

/// All frameworks achieving the maximum count, in presentation order.
///
/// Ties are returned whole: two- and three-way ties are the same case, and
/// the summary branches on the size of this set — never on an arbitrarily
/// chosen single winner.
#[must_use]
pub fn dominant_frameworks(counts: &FrameworkCounts) -> Vec<Framework> {
    let max = counts.max();
    Framework::ALL
        .into_iter()
        .filter(|framework| counts.count(*framework) == max)
        .collect()
}

/// Selects the narrative for the dominant set: a single dominant framework
/// gets its own narrative; any tie gets the balanced narrative.
#[must_use]
pub fn summary_for<'a>(dominant: &[Framework], summaries: &'a SummarySet) -> &'a str {
    match dominant {
        [single] => summaries.narrative_for(*single),
        _ => summaries.balanced(),
    }
}
