//! Domain events for the session progression context.

use crossroads_content::Framework;
use crossroads_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a quiz session is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Number of scenarios in the deck at start time.
    pub scenario_count: u32,
}

/// Emitted when the player selects a framework for the current scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceRecorded {
    /// The session identifier.
    pub session_id: Uuid,
    /// 0-based position of the scenario the choice was made for.
    pub scenario_index: u32,
    /// The framework the player selected.
    pub framework: Framework,
}

/// Emitted when the session advances past the scenario in feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAdvanced {
    /// The session identifier.
    pub session_id: Uuid,
    /// The new 0-based position after advancing.
    pub scenario_index: u32,
}

/// Emitted when the final advance moves the session past the last scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Emitted when the session is reset for another pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReset {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Event type identifier for [`SessionStarted`].
pub const SESSION_STARTED_EVENT_TYPE: &str = "session.started";

/// Event type identifier for [`ChoiceRecorded`].
pub const CHOICE_RECORDED_EVENT_TYPE: &str = "session.choice_recorded";

/// Event type identifier for [`ScenarioAdvanced`].
pub const SCENARIO_ADVANCED_EVENT_TYPE: &str = "session.scenario_advanced";

/// Event type identifier for [`SessionCompleted`].
pub const SESSION_COMPLETED_EVENT_TYPE: &str = "session.completed";

/// Event type identifier for [`SessionReset`].
pub const SESSION_RESET_EVENT_TYPE: &str = "session.reset";

/// Event payload variants for the session progression context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A quiz session has started.
    SessionStarted(SessionStarted),
    /// A framework choice has been recorded.
    ChoiceRecorded(ChoiceRecorded),
    /// The session has advanced to the next scenario.
    ScenarioAdvanced(ScenarioAdvanced),
    /// The session has completed all scenarios.
    SessionCompleted(SessionCompleted),
    /// The session has been reset.
    SessionReset(SessionReset),
}

/// Domain event envelope for the session progression context.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            SessionEventKind::SessionStarted(_) => SESSION_STARTED_EVENT_TYPE,
            SessionEventKind::ChoiceRecorded(_) => CHOICE_RECORDED_EVENT_TYPE,
            SessionEventKind::ScenarioAdvanced(_) => SCENARIO_ADVANCED_EVENT_TYPE,
            SessionEventKind::SessionCompleted(_) => SESSION_COMPLETED_EVENT_TYPE,
            SessionEventKind::SessionReset(_) => SESSION_RESET_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
