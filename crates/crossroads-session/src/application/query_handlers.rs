//! Query handlers for the session progression context.
//!
//! This module contains query handlers that reconstitute the session
//! aggregate from stored events and return read-only view DTOs.

use crossroads_content::Deck;
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::error::DomainError;
use crossroads_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::SessionPhase;

/// Read-only view of the scenario awaiting a choice.
#[derive(Debug, Serialize)]
pub struct ScenarioView {
    /// The scenario's content id.
    pub id: u32,
    /// The dilemma prompt.
    pub text: String,
}

/// Read-only view of a quiz session for the presentation layer.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// 0-based position within the deck.
    pub position: u32,
    /// Total number of scenarios, for the progress readout.
    pub scenario_count: u32,
    /// Current phase of the progression state machine.
    pub phase: SessionPhase,
    /// The current scenario; `None` once the session is complete.
    pub scenario: Option<ScenarioView>,
    /// Feedback text for the just-recorded choice, while in feedback.
    pub feedback: Option<String>,
    /// True exactly when every scenario has been answered and advanced past.
    pub complete: bool,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a session by its aggregate ID, joined against the deck.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_session_view(
    session_id: Uuid,
    repo: &dyn EventRepository,
    deck: &Deck,
) -> Result<SessionView, DomainError> {
    let stored_events = repo.load_events(session_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    let session = command_handlers::reconstitute(session_id, &stored_events)?;

    let scenario = if session.is_complete() {
        None
    } else {
        deck.scenario(session.position() as usize)
            .map(|s| ScenarioView {
                id: s.id,
                text: s.text.clone(),
            })
    };

    // The response string for the choice awaiting advance. A scenario or
    // response missing from the deck degrades to an empty string rather
    // than failing the session.
    let feedback = if session.phase() == SessionPhase::Feedback {
        let text = session
            .choices()
            .last()
            .and_then(|choice| {
                deck.scenario(choice.scenario_index as usize)
                    .map(|s| s.response_for(choice.framework).to_owned())
            })
            .unwrap_or_default();
        Some(text)
    } else {
        None
    };

    Ok(SessionView {
        session_id,
        position: session.position(),
        scenario_count: session.scenario_count(),
        phase: session.phase(),
        scenario,
        feedback,
        complete: session.is_complete(),
        version: session.version(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use crossroads_content::{Deck, Framework};
    use crossroads_core::error::DomainError;
    use crossroads_core::repository::StoredEvent;
    use uuid::Uuid;

    use crate::application::query_handlers::get_session_view;
    use crate::domain::aggregates::SessionPhase;
    use crate::domain::events::{
        CHOICE_RECORDED_EVENT_TYPE, ChoiceRecorded, SCENARIO_ADVANCED_EVENT_TYPE,
        SESSION_COMPLETED_EVENT_TYPE, SESSION_STARTED_EVENT_TYPE, ScenarioAdvanced,
        SessionCompleted, SessionEventKind, SessionStarted,
    };
    use crossroads_test_support::{EmptyEventRepository, RecordingEventRepository};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn stored(
        session_id: Uuid,
        event_type: &str,
        kind: SessionEventKind,
        sequence_number: i64,
    ) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: session_id,
            event_type: event_type.to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            occurred_at: fixed_now(),
        }
    }

    fn started(session_id: Uuid, scenario_count: u32) -> StoredEvent {
        stored(
            session_id,
            SESSION_STARTED_EVENT_TYPE,
            SessionEventKind::SessionStarted(SessionStarted {
                session_id,
                scenario_count,
            }),
            1,
        )
    }

    #[tokio::test]
    async fn test_get_session_view_presents_first_scenario() {
        // Arrange
        let session_id = Uuid::new_v4();
        let deck = Deck::builtin();
        let repo = RecordingEventRepository::new(Ok(vec![started(session_id, 7)]));

        // Act
        let view = get_session_view(session_id, &repo, &deck).await.unwrap();

        // Assert
        assert_eq!(view.session_id, session_id);
        assert_eq!(view.position, 0);
        assert_eq!(view.scenario_count, 7);
        assert_eq!(view.phase, SessionPhase::Presenting);
        assert_eq!(view.scenario.as_ref().unwrap().id, 1);
        assert!(view.feedback.is_none());
        assert!(!view.complete);
        assert_eq!(view.version, 1);
    }

    #[tokio::test]
    async fn test_get_session_view_serves_feedback_for_recorded_choice() {
        // Arrange
        let session_id = Uuid::new_v4();
        let deck = Deck::builtin();
        let repo = RecordingEventRepository::new(Ok(vec![
            started(session_id, 7),
            stored(
                session_id,
                CHOICE_RECORDED_EVENT_TYPE,
                SessionEventKind::ChoiceRecorded(ChoiceRecorded {
                    session_id,
                    scenario_index: 0,
                    framework: Framework::Duty,
                }),
                2,
            ),
        ]));

        // Act
        let view = get_session_view(session_id, &repo, &deck).await.unwrap();

        // Assert
        assert_eq!(view.phase, SessionPhase::Feedback);
        let feedback = view.feedback.unwrap();
        assert_eq!(
            feedback,
            deck.scenario(0).unwrap().response_for(Framework::Duty)
        );
        assert!(feedback.contains("You chose Duty"));
    }

    #[tokio::test]
    async fn test_get_session_view_omits_scenario_once_complete() {
        // Arrange — one-scenario deck played through.
        let session_id = Uuid::new_v4();
        let deck = Deck::builtin();
        let repo = RecordingEventRepository::new(Ok(vec![
            started(session_id, 1),
            stored(
                session_id,
                CHOICE_RECORDED_EVENT_TYPE,
                SessionEventKind::ChoiceRecorded(ChoiceRecorded {
                    session_id,
                    scenario_index: 0,
                    framework: Framework::Character,
                }),
                2,
            ),
            stored(
                session_id,
                SCENARIO_ADVANCED_EVENT_TYPE,
                SessionEventKind::ScenarioAdvanced(ScenarioAdvanced {
                    session_id,
                    scenario_index: 1,
                }),
                3,
            ),
            stored(
                session_id,
                SESSION_COMPLETED_EVENT_TYPE,
                SessionEventKind::SessionCompleted(SessionCompleted { session_id }),
                4,
            ),
        ]));

        // Act
        let view = get_session_view(session_id, &repo, &deck).await.unwrap();

        // Assert — no stale scenario is served past the end.
        assert!(view.complete);
        assert_eq!(view.phase, SessionPhase::Complete);
        assert!(view.scenario.is_none());
        assert!(view.feedback.is_none());
    }

    #[tokio::test]
    async fn test_get_session_view_returns_not_found_when_no_events() {
        // Arrange
        let session_id = Uuid::new_v4();
        let deck = Deck::builtin();
        let repo = EmptyEventRepository;

        // Act
        let result = get_session_view(session_id, &repo, &deck).await;

        // Assert
        assert!(result.is_err());
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, session_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
