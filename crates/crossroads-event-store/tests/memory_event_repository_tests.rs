//! Integration tests for the in-memory event repository.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crossroads_core::error::DomainError;
use crossroads_core::repository::{EventRepository, StoredEvent};
use crossroads_event_store::MemoryEventRepository;

fn stored_event(aggregate_id: Uuid, sequence_number: i64) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: "session.started".to_owned(),
        payload: serde_json::json!({ "sequence": sequence_number }),
        sequence_number,
        correlation_id: Uuid::new_v4(),
        occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_load_events_of_unknown_aggregate_is_empty() {
    let repo = MemoryEventRepository::new();

    let events = repo.load_events(Uuid::new_v4()).await.unwrap();

    assert!(events.is_empty());
}

#[tokio::test]
async fn test_append_then_load_round_trip() {
    // Arrange
    let repo = MemoryEventRepository::new();
    let aggregate_id = Uuid::new_v4();

    // Act
    repo.append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
        .await
        .unwrap();
    repo.append_events(
        aggregate_id,
        1,
        &[stored_event(aggregate_id, 2), stored_event(aggregate_id, 3)],
    )
    .await
    .unwrap();

    // Assert
    let events = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(events.len(), 3);
    let sequence: Vec<i64> = events.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequence, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_append_with_stale_version_is_a_concurrency_conflict() {
    // Arrange
    let repo = MemoryEventRepository::new();
    let aggregate_id = Uuid::new_v4();
    repo.append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
        .await
        .unwrap();

    // Act — a second writer that still believes the stream is empty.
    let result = repo
        .append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
        .await;

    // Assert
    match result.unwrap_err() {
        DomainError::ConcurrencyConflict {
            aggregate_id: id,
            expected,
            actual,
        } => {
            assert_eq!(id, aggregate_id);
            assert_eq!(expected, 0);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }

    // The conflicting append must not have mutated the stream.
    let events = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn test_streams_are_isolated_per_aggregate() {
    // Arrange
    let repo = MemoryEventRepository::new();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    // Act
    repo.append_events(first, 0, &[stored_event(first, 1)])
        .await
        .unwrap();
    repo.append_events(second, 0, &[stored_event(second, 1)])
        .await
        .unwrap();

    // Assert
    assert_eq!(repo.load_events(first).await.unwrap().len(), 1);
    assert_eq!(repo.load_events(second).await.unwrap().len(), 1);
}
