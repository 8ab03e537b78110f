//! Query handlers for the results aggregation context.
//!
//! Results are a read-side projection of the session event stream: the
//! handler folds the stream into the choice sequence and completion fact,
//! then tallies counts, percentages, the dominant set, the narrative
//! summary, and earned badges.

use crossroads_content::{Deck, Framework};
use crossroads_core::error::DomainError;
use crossroads_core::repository::{EventRepository, StoredEvent};
use serde::Serialize;
use uuid::Uuid;

use crossroads_session::domain::events::SessionEventKind;

use crate::domain::badges::{self, BadgeDef, BadgeKey};
use crate::domain::tally::{self, FrameworkCounts, FrameworkPercentages};

/// Read-only view of one earned badge.
#[derive(Debug, Serialize)]
pub struct BadgeView {
    /// Symbolic key.
    pub key: BadgeKey,
    /// Icon glyph.
    pub icon: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl From<&'static BadgeDef> for BadgeView {
    fn from(def: &'static BadgeDef) -> Self {
        Self {
            key: def.key,
            icon: def.icon,
            name: def.name,
            description: def.description,
        }
    }
}

/// Read-only summary of a session's results.
#[derive(Debug, Serialize)]
pub struct ResultsView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Number of recorded choices.
    pub total_choices: u32,
    /// Per-framework counts.
    pub counts: FrameworkCounts,
    /// Per-framework percentage shares.
    pub percentages: FrameworkPercentages,
    /// All frameworks sharing the maximum count.
    pub dominant: Vec<Framework>,
    /// The narrative summary (HTML), balanced when `dominant` has ties.
    pub summary: String,
    /// Earned badges in presentation order.
    pub badges: Vec<BadgeView>,
    /// Whether the session had completed at aggregation time.
    pub complete: bool,
    /// Current version (event count).
    pub version: i64,
}

/// The choice sequence and completion fact folded out of a session stream.
#[derive(Debug, Default)]
struct ChoiceLog {
    frameworks: Vec<Framework>,
    scenario_count: u32,
    complete: bool,
}

fn fold_choice_log(stored_events: &[StoredEvent]) -> Result<ChoiceLog, DomainError> {
    let mut log = ChoiceLog::default();
    for stored in stored_events {
        let kind: SessionEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        match kind {
            SessionEventKind::SessionStarted(payload) => {
                log.scenario_count = payload.scenario_count;
                log.frameworks.clear();
                log.complete = payload.scenario_count == 0;
            }
            SessionEventKind::ChoiceRecorded(payload) => {
                log.frameworks.push(payload.framework);
            }
            SessionEventKind::ScenarioAdvanced(_) => {}
            SessionEventKind::SessionCompleted(_) => {
                log.complete = true;
            }
            SessionEventKind::SessionReset(_) => {
                log.frameworks.clear();
                log.complete = log.scenario_count == 0;
            }
        }
    }
    Ok(log)
}

/// Aggregates a session's choices into the results summary.
///
/// Serves partial sessions too: an in-flight distribution with the Explorer
/// badge withheld until completion.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_session_results(
    session_id: Uuid,
    repo: &dyn EventRepository,
    deck: &Deck,
) -> Result<ResultsView, DomainError> {
    let stored_events = repo.load_events(session_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    let log = fold_choice_log(&stored_events)?;

    let counts = tally::compute_counts(&log.frameworks);
    let total = counts.total();
    let percentages = tally::compute_percentages(&counts, total);
    let dominant = tally::dominant_frameworks(&counts);
    let summary = tally::summary_for(&dominant, deck.summaries()).to_owned();
    let badges = badges::earned_badges(&counts, log.scenario_count, log.complete)
        .into_iter()
        .map(BadgeView::from)
        .collect();

    #[allow(clippy::cast_possible_wrap)]
    let version = stored_events.len() as i64;

    Ok(ResultsView {
        session_id,
        total_choices: total,
        counts,
        percentages,
        dominant,
        summary,
        badges,
        complete: log.complete,
        version,
    })
}
