//! Routes for the static content contract.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Deck metadata response.
#[derive(Debug, Serialize)]
pub struct DeckResponse {
    /// Deck title.
    pub title: String,
    /// Number of scenarios.
    pub scenario_count: usize,
    /// Hex-encoded SHA-256 of the deck source.
    pub version_hash: String,
}

/// One scenario prompt in presentation order.
#[derive(Debug, Serialize)]
pub struct ScenarioItem {
    /// The scenario's content id.
    pub id: u32,
    /// The dilemma prompt.
    pub text: String,
}

/// GET /deck
async fn get_deck(State(state): State<AppState>) -> Json<DeckResponse> {
    Json(DeckResponse {
        title: state.deck.title().to_owned(),
        scenario_count: state.deck.scenario_count(),
        version_hash: state.deck.version_hash().to_owned(),
    })
}

/// GET /scenarios
///
/// Prompts only — response explanations are served per choice through the
/// session view, after the choice is made.
async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<ScenarioItem>> {
    let scenarios = state
        .deck
        .scenarios()
        .iter()
        .map(|scenario| ScenarioItem {
            id: scenario.id,
            text: scenario.text.clone(),
        })
        .collect();
    Json(scenarios)
}

/// Returns the router for the content context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deck", get(get_deck))
        .route("/scenarios", get(list_scenarios))
}
