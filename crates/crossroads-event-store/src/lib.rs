//! Crossroads — process-local event storage.
//!
//! Session state is ephemeral: streams live in memory for the lifetime of
//! the process and nothing is persisted across restarts.

pub mod memory_event_repository;

pub use memory_event_repository::MemoryEventRepository;
