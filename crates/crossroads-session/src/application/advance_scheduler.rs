//! Deferred-advance scheduling for timed advance mode.
//!
//! The source of the feedback-then-advance transition is configurable: in
//! `Manual` mode the player triggers it; in `Timed` mode a deferred task
//! fires it after a fixed pause. Every deferred advance is held as a
//! per-session cancellable handle — reset cancels it explicitly, and a task
//! that outraces cancellation is still rejected by the session's phase
//! guard, so a stale timer can never corrupt a fresh pass.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crossroads_core::clock::Clock;
use crossroads_core::repository::EventRepository;

use crate::application::command_handlers;
use crate::domain::commands::AdvanceScenario;

/// How the feedback-then-advance transition is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceMode {
    /// The player triggers the advance explicitly.
    Manual,
    /// A deferred advance fires after the given pause.
    Timed(Duration),
}

/// Holds at most one pending deferred advance per session.
pub struct AdvanceScheduler {
    clock: Arc<dyn Clock>,
    repo: Arc<dyn EventRepository>,
    pending: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl AdvanceScheduler {
    /// Creates a scheduler that issues advances through the given clock and
    /// repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repo: Arc<dyn EventRepository>) -> Self {
        Self {
            clock,
            repo,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedules a deferred advance for the session, superseding (and
    /// aborting) any advance already pending for it.
    pub fn schedule(&self, session_id: Uuid, delay: Duration) {
        let clock = Arc::clone(&self.clock);
        let repo = Arc::clone(&self.repo);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let command = AdvanceScenario {
                correlation_id: Uuid::new_v4(),
                session_id,
            };
            match command_handlers::handle_advance_scenario(&command, clock.as_ref(), repo.as_ref())
                .await
            {
                Ok(_) => {
                    tracing::debug!(%session_id, "deferred advance applied");
                }
                Err(error) => {
                    // A reset or manual advance can win the race; the phase
                    // guard rejects the stale advance.
                    tracing::debug!(%session_id, %error, "deferred advance rejected");
                }
            }
        });

        if let Some(previous) = self.lock_pending().insert(session_id, handle) {
            previous.abort();
        }
    }

    /// Cancels the pending deferred advance for the session, if any.
    pub fn cancel(&self, session_id: Uuid) {
        if let Some(handle) = self.lock_pending().remove(&session_id) {
            handle.abort();
        }
    }

    /// True if a deferred advance is currently registered for the session.
    /// Finished tasks linger until superseded or cancelled.
    #[must_use]
    pub fn has_pending(&self, session_id: Uuid) -> bool {
        self.lock_pending().contains_key(&session_id)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, JoinHandle<()>>> {
        // A poisoned map would only lose pending timers; recover the data.
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AdvanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvanceScheduler").finish_non_exhaustive()
    }
}
