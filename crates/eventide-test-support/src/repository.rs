//! Test repositories — mock `EventRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eventide_core::error::DomainError;
use eventide_core::event::Event;
use eventide_core::repository::EventRepository;
use uuid::Uuid;

/// One recorded `append_events` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendCall {
    /// Aggregate the events were appended to.
    pub aggregate_id: Uuid,
    /// Expected version passed by the caller.
    pub expected_version: i64,
    /// The appended events.
    pub events: Vec<Event>,
}

#[derive(Debug, Default)]
struct Streams {
    events: HashMap<Uuid, Vec<Event>>,
    versions: HashMap<Uuid, i64>,
}

/// An in-memory event repository that records every `append_events` call.
///
/// Appends are checked against the per-aggregate stream version the way a
/// real store would: an `expected_version` other than the current one fails
/// with `DomainError::ConcurrencyConflict` and is not recorded.
#[derive(Debug, Default)]
pub struct RecordingEventRepository {
    streams: Mutex<Streams>,
    appended: Mutex<Vec<AppendCall>>,
}

impl RecordingEventRepository {
    /// Create an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository whose stream for `aggregate_id` already holds
    /// `events` and stands at `version`.
    #[must_use]
    pub fn with_stream(aggregate_id: Uuid, version: i64, events: Vec<Event>) -> Self {
        let repo = Self::default();
        {
            let mut streams = repo.streams.lock().unwrap();
            streams.events.insert(aggregate_id, events);
            streams.versions.insert(aggregate_id, version);
        }
        repo
    }

    /// Returns a snapshot of all successful `append_events` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<AppendCall> {
        self.appended.lock().unwrap().clone()
    }

    /// Returns the current stream version of `aggregate_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stream_version(&self, aggregate_id: Uuid) -> i64 {
        self.streams
            .lock()
            .unwrap()
            .versions
            .get(&aggregate_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Ok(self
            .streams
            .lock()
            .unwrap()
            .events
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default())
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[Event],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.lock().unwrap();
        let actual = streams.versions.get(&aggregate_id).copied().unwrap_or(0);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        streams
            .events
            .entry(aggregate_id)
            .or_default()
            .extend_from_slice(events);
        streams
            .versions
            .insert(aggregate_id, actual + events.len() as i64);

        self.appended.lock().unwrap().push(AppendCall {
            aggregate_id,
            expected_version,
            events: events.to_vec(),
        });
        Ok(())
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends. Useful for testing creation commands.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[Event],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[Event],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
