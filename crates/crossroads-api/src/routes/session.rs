//! Routes for the session progression bounded context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crossroads_content::Framework;
use crossroads_session::application::advance_scheduler::AdvanceMode;
use crossroads_session::application::command_handlers;
use crossroads_session::application::query_handlers::{self, SessionView};
use crossroads_session::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /record-choice.
#[derive(Debug, Deserialize)]
pub struct RecordChoiceRequest {
    /// The session to record the choice in.
    pub session_id: Uuid,
    /// The framework the player selected.
    pub framework: Framework,
}

/// Request body for POST /advance.
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    /// The session to advance.
    pub session_id: Uuid,
}

/// Request body for POST /reset.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    /// The session to reset.
    pub session_id: Uuid,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The aggregate affected or created by the command.
    pub aggregate_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

fn command_response(result: &command_handlers::SessionCommandResult) -> CommandResponse {
    CommandResponse {
        aggregate_id: result.aggregate_id,
        event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
    }
}

/// POST /start
#[instrument(skip(state))]
async fn start_session(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let result = command_handlers::handle_start_session(
        &command,
        &state.deck,
        state.clock.as_ref(),
        state.event_repository.as_ref(),
    )
    .await?;

    Ok(Json(command_response(&result)))
}

/// POST /record-choice
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn record_choice(
    State(state): State<AppState>,
    Json(request): Json<RecordChoiceRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RecordChoice {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        framework: request.framework,
    };

    info!(
        correlation_id = %command.correlation_id,
        framework = %command.framework,
        "handling record_choice command"
    );

    let result = command_handlers::handle_record_choice(
        &command,
        state.clock.as_ref(),
        state.event_repository.as_ref(),
    )
    .await?;

    // In timed mode the feedback pause ends on its own; the scheduled task
    // supersedes any advance still pending for this session.
    if let AdvanceMode::Timed(delay) = state.advance_mode {
        state.scheduler.schedule(request.session_id, delay);
    }

    Ok(Json(command_response(&result)))
}

/// POST /advance
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn advance_scenario(
    State(state): State<AppState>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AdvanceScenario {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling advance_scenario command");

    // A manual advance beats the timer to it.
    state.scheduler.cancel(request.session_id);

    let result = command_handlers::handle_advance_scenario(
        &command,
        state.clock.as_ref(),
        state.event_repository.as_ref(),
    )
    .await?;

    Ok(Json(command_response(&result)))
}

/// POST /reset
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn reset_session(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ResetSession {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reset_session command");

    // No stale timer may fire into the fresh pass.
    state.scheduler.cancel(request.session_id);

    let result = command_handlers::handle_reset_session(
        &command,
        state.clock.as_ref(),
        state.event_repository.as_ref(),
    )
    .await?;

    Ok(Json(command_response(&result)))
}

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_view(
        session_id,
        state.event_repository.as_ref(),
        &state.deck,
    )
    .await?;

    Ok(Json(view))
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_session))
        .route("/record-choice", post(record_choice))
        .route("/advance", post(advance_scenario))
        .route("/reset", post(reset_session))
        .route("/{session_id}", get(get_session))
}
