//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crossroads_core::error::DomainError;
use crossroads_core::repository::{EventRepository, StoredEvent};

/// Process-local event repository. One stream per aggregate, appended under
/// optimistic concurrency, held only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl MemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_streams(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<Uuid, Vec<StoredEvent>>> {
        // Streams stay consistent even after a panicked writer; recover.
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.lock_streams();
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.lock_streams();
        let stream = streams.entry(aggregate_id).or_default();

        let actual = stream
            .last()
            .map_or(0, |stored| stored.sequence_number);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        stream.extend_from_slice(events);
        tracing::debug!(
            %aggregate_id,
            appended = events.len(),
            stream_length = stream.len(),
            "events appended"
        );
        Ok(())
    }
}
