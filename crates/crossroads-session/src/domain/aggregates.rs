//! Aggregate roots for the session progression context.

use crossroads_content::Framework;
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::clock::Clock;
use crossroads_core::error::DomainError;
use crossroads_core::event::EventMetadata;
use serde::Serialize;
use uuid::Uuid;

use super::events::{
    ChoiceRecorded, ScenarioAdvanced, SessionCompleted, SessionEvent, SessionEventKind,
    SessionReset, SessionStarted,
};

/// Session progression phases.
///
/// `Feedback` is the input-suspension window between recording a choice and
/// the advance (manual or timed) — `record_choice` is rejected there, which
/// is what prevents double-recording for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No `SessionStarted` event applied yet.
    NotStarted,
    /// A scenario is awaiting the player's choice.
    Presenting,
    /// A choice is recorded; the session awaits the advance.
    Feedback,
    /// The session has moved past the final scenario. Terminal until reset.
    Complete,
}

/// One recorded choice: which framework was selected at which position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedChoice {
    /// 0-based scenario position the choice was made for.
    pub scenario_index: u32,
    /// The selected framework.
    pub framework: Framework,
}

/// The aggregate root for a quiz session.
#[derive(Debug)]
pub struct QuizSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    scenario_count: u32,
    position: u32,
    phase: SessionPhase,
    choices: Vec<RecordedChoice>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<SessionEvent>,
}

impl QuizSession {
    /// Creates a new, not-yet-started quiz session.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            scenario_count: 0,
            position: 0,
            phase: SessionPhase::NotStarted,
            choices: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn push_event(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        use crossroads_core::event::DomainEvent;

        let mut event = SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: String::new(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        event.metadata.event_type = event.event_type().to_owned();
        self.uncommitted_events.push(event);
    }

    /// Starts the session, producing a `SessionStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session was already started;
    /// replay goes through `reset_session`.
    pub fn start_session(
        &mut self,
        scenario_count: u32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(DomainError::Validation(format!(
                "session {} already started; reset it to replay",
                self.id
            )));
        }

        self.push_event(
            SessionEventKind::SessionStarted(SessionStarted {
                session_id: self.id,
                scenario_count,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Records the player's framework choice for the current scenario,
    /// producing a `ChoiceRecorded` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless a scenario is presenting:
    /// recording during feedback (double-record) or after completion is an
    /// invariant violation, never silently ignored.
    pub fn record_choice(
        &mut self,
        framework: Framework,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        match self.phase {
            SessionPhase::NotStarted => Err(DomainError::Validation(format!(
                "session {} has not been started",
                self.id
            ))),
            SessionPhase::Feedback => Err(DomainError::Validation(format!(
                "choice already recorded for scenario {}; awaiting advance",
                self.position
            ))),
            SessionPhase::Complete => Err(DomainError::Validation(format!(
                "session {} is complete; no further choices",
                self.id
            ))),
            SessionPhase::Presenting => {
                self.push_event(
                    SessionEventKind::ChoiceRecorded(ChoiceRecorded {
                        session_id: self.id,
                        scenario_index: self.position,
                        framework,
                    }),
                    correlation_id,
                    clock,
                );
                Ok(())
            }
        }
    }

    /// Advances past the scenario in feedback, producing a
    /// `ScenarioAdvanced` event and, when the new position reaches the
    /// scenario count, a `SessionCompleted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless the session is in feedback.
    /// This guard is what makes a stale deferred advance (one that survived
    /// a reset) harmless.
    pub fn advance_scenario(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != SessionPhase::Feedback {
            return Err(DomainError::Validation(format!(
                "session {} has no choice awaiting advance",
                self.id
            )));
        }

        let new_position = self.position + 1;
        self.push_event(
            SessionEventKind::ScenarioAdvanced(ScenarioAdvanced {
                session_id: self.id,
                scenario_index: new_position,
            }),
            correlation_id,
            clock,
        );
        if new_position == self.scenario_count {
            self.push_event(
                SessionEventKind::SessionCompleted(SessionCompleted {
                    session_id: self.id,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Resets the session to its initial state, producing a `SessionReset`
    /// event. Valid in any phase after start, including mid-feedback.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session was never started.
    pub fn reset_session(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase == SessionPhase::NotStarted {
            return Err(DomainError::Validation(format!(
                "session {} has not been started",
                self.id
            )));
        }

        self.push_event(
            SessionEventKind::SessionReset(SessionReset {
                session_id: self.id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// 0-based position of the scenario the session is at.
    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Number of scenarios captured at start time.
    #[must_use]
    pub fn scenario_count(&self) -> u32 {
        self.scenario_count
    }

    /// True exactly when the session has moved past the final scenario.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// The recorded choices in order, read-only.
    #[must_use]
    pub fn choices(&self) -> &[RecordedChoice] {
        &self.choices
    }

    /// 0-based index of the scenario awaiting a choice or advance.
    ///
    /// # Panics
    ///
    /// Panics if the session is complete — callers must check
    /// [`Self::is_complete`] first; reading a "current" scenario past the end
    /// is a programming error, not a recoverable condition.
    #[must_use]
    pub fn current_scenario_index(&self) -> u32 {
        assert!(
            !self.is_complete(),
            "current_scenario_index on a complete session"
        );
        self.position
    }
}

impl AggregateRoot for QuizSession {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            SessionEventKind::SessionStarted(payload) => {
                self.scenario_count = payload.scenario_count;
                self.position = 0;
                self.choices.clear();
                // A zero-scenario deck is a legitimate degenerate
                // configuration: the session is born complete.
                self.phase = if payload.scenario_count == 0 {
                    SessionPhase::Complete
                } else {
                    SessionPhase::Presenting
                };
            }
            SessionEventKind::ChoiceRecorded(payload) => {
                self.choices.push(RecordedChoice {
                    scenario_index: payload.scenario_index,
                    framework: payload.framework,
                });
                self.phase = SessionPhase::Feedback;
            }
            SessionEventKind::ScenarioAdvanced(payload) => {
                self.position = payload.scenario_index;
                self.phase = SessionPhase::Presenting;
            }
            SessionEventKind::SessionCompleted(_) => {
                self.phase = SessionPhase::Complete;
            }
            SessionEventKind::SessionReset(_) => {
                self.position = 0;
                self.choices.clear();
                self.phase = if self.scenario_count == 0 {
                    SessionPhase::Complete
                } else {
                    SessionPhase::Presenting
                };
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
