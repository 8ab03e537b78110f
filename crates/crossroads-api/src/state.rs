//! Shared application state.

use std::sync::Arc;

use crossroads_content::Deck;
use crossroads_core::clock::Clock;
use crossroads_core::repository::EventRepository;
use crossroads_session::application::advance_scheduler::{AdvanceMode, AdvanceScheduler};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to stamp domain events.
    pub clock: Arc<dyn Clock>,
    /// Event repository backing all sessions.
    pub event_repository: Arc<dyn EventRepository>,
    /// The scenario deck loaded at startup.
    pub deck: Arc<Deck>,
    /// How the feedback-then-advance transition is driven.
    pub advance_mode: AdvanceMode,
    /// Pending deferred advances, one slot per session.
    pub scheduler: Arc<AdvanceScheduler>,
}

impl AppState {
    /// Create new application state; the scheduler is wired to the same
    /// clock and repository the routes use.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        deck: Arc<Deck>,
        advance_mode: AdvanceMode,
    ) -> Self {
        let scheduler = Arc::new(AdvanceScheduler::new(
            Arc::clone(&clock),
            Arc::clone(&event_repository),
        ));
        Self {
            clock,
            event_repository,
            deck,
            advance_mode,
            scheduler,
        }
    }
}
