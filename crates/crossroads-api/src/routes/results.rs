//! Routes for the results aggregation bounded context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;
use uuid::Uuid;

use crossroads_results::application::query_handlers::{self, ResultsView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_results(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResultsView>, ApiError> {
    let view = query_handlers::get_session_results(
        session_id,
        state.event_repository.as_ref(),
        &state.deck,
    )
    .await?;

    Ok(Json(view))
}

/// Returns the router for the results context.
pub fn router() -> Router<AppState> {
    Router::new().route("/{session_id}", get(get_results))
}
