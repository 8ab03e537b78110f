//! Commands for the session progression context.

use crossroads_content::Framework;
use crossroads_core::command::Command;
use uuid::Uuid;

/// Command to start a new quiz session.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "session.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record the player's framework choice for the current scenario.
#[derive(Debug, Clone)]
pub struct RecordChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// The framework the player selected.
    pub framework: Framework,
}

impl Command for RecordChoice {
    fn command_type(&self) -> &'static str {
        "session.record_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to advance past the scenario currently in feedback.
#[derive(Debug, Clone)]
pub struct AdvanceScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for AdvanceScenario {
    fn command_type(&self) -> &'static str {
        "session.advance_scenario"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to reset a session to its initial state for another pass.
#[derive(Debug, Clone)]
pub struct ResetSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for ResetSession {
    fn command_type(&self) -> &'static str {
        "session.reset_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
