//! Command handlers for the session progression context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.

use crossroads_content::Deck;
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::clock::Clock;
use crossroads_core::error::DomainError;
use crossroads_core::event::DomainEvent;
use crossroads_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

use crate::domain::aggregates::QuizSession;
use crate::domain::commands::{AdvanceScenario, RecordChoice, ResetSession, StartSession};
use crate::domain::events::{SessionEvent, SessionEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct SessionCommandResult {
    /// The aggregate ID affected or created by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

fn to_stored_event(event: &SessionEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes a `QuizSession` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    session_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<QuizSession, DomainError> {
    let mut session = QuizSession::new(session_id);
    for stored in existing_events {
        let kind: SessionEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = SessionEvent {
            metadata: crossroads_core::event::EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        session.apply(&event);
    }
    Ok(session)
}

/// Handles the `StartSession` command: creates a new aggregate, starts it
/// against the deck, and persists the resulting events.
///
/// This is a CREATION command — the handler generates the `session_id`.
///
/// # Errors
///
/// Returns `DomainError` if the deck size does not fit the wire format or
/// event appending fails.
pub async fn handle_start_session(
    command: &StartSession,
    deck: &Deck,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let scenario_count = u32::try_from(deck.scenario_count())
        .map_err(|_| DomainError::Validation("deck has too many scenarios".to_owned()))?;

    let session_id = Uuid::new_v4();
    let mut session = QuizSession::new(session_id);

    session.start_session(scenario_count, command.correlation_id, clock)?;

    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(session_id, session.version(), &stored_events)
        .await?;

    Ok(SessionCommandResult {
        aggregate_id: session_id,
        stored_events,
    })
}

/// Handles the `RecordChoice` command: reconstitutes the session, records
/// the choice, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError` if the session is missing, the choice is invalid in
/// the current phase, or event loading/appending fails.
pub async fn handle_record_choice(
    command: &RecordChoice,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.session_id));
    }
    let mut session = reconstitute(command.session_id, &existing_events)?;

    session.record_choice(command.framework, command.correlation_id, clock)?;

    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(command.session_id, session.version(), &stored_events)
        .await?;

    Ok(SessionCommandResult {
        aggregate_id: command.session_id,
        stored_events,
    })
}

/// Handles the `AdvanceScenario` command: reconstitutes the session,
/// advances it, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError` if the session is missing, no choice is awaiting
/// advance, or event loading/appending fails.
pub async fn handle_advance_scenario(
    command: &AdvanceScenario,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.session_id));
    }
    let mut session = reconstitute(command.session_id, &existing_events)?;

    session.advance_scenario(command.correlation_id, clock)?;

    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(command.session_id, session.version(), &stored_events)
        .await?;

    Ok(SessionCommandResult {
        aggregate_id: command.session_id,
        stored_events,
    })
}

/// Handles the `ResetSession` command: reconstitutes the session, resets it,
/// and persists the resulting events. Callers are responsible for cancelling
/// any pending deferred advance first.
///
/// # Errors
///
/// Returns `DomainError` if the session is missing or event
/// loading/appending fails.
pub async fn handle_reset_session(
    command: &ResetSession,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.session_id));
    }
    let mut session = reconstitute(command.session_id, &existing_events)?;

    session.reset_session(command.correlation_id, clock)?;

    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(command.session_id, session.version(), &stored_events)
        .await?;

    Ok(SessionCommandResult {
        aggregate_id: command.session_id,
        stored_events,
    })
}
