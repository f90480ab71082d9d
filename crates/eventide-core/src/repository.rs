//! Event repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::DomainError;
use crate::event::Event;

/// Repository trait for loading and appending domain events.
///
/// Implementations key events by `(aggregate_id, aggregate_version)` and
/// must reject duplicates.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load all events for a given aggregate, ordered by aggregate version.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<Event>, DomainError>;

    /// Append new events to an aggregate stream with optimistic concurrency.
    ///
    /// `expected_version` is the stream version the caller built on; a store
    /// holding any other version returns `DomainError::ConcurrencyConflict`.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[Event],
    ) -> Result<(), DomainError>;
}

/// Stores an aggregate's uncommitted events and acknowledges them.
///
/// Events are removed from the aggregate only after the repository accepted
/// them; on error the buffer is left untouched so the caller can retry.
///
/// # Errors
///
/// Returns the repository's error, or `DomainError::StaleAcknowledgement`
/// if the aggregate's buffer changed underneath the append.
pub async fn commit(
    aggregate: &mut Aggregate,
    repo: &dyn EventRepository,
) -> Result<Vec<Event>, DomainError> {
    let batch = aggregate.uncommitted();
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    if let Err(err) = repo
        .append_events(batch.aggregate_id(), batch.expected_version(), batch.events())
        .await
    {
        tracing::warn!(
            aggregate_id = %batch.aggregate_id(),
            expected_version = batch.expected_version(),
            error = %err,
            "failed to append events"
        );
        return Err(err);
    }

    let count = aggregate.acknowledge(&batch)?;
    tracing::debug!(
        aggregate_id = %batch.aggregate_id(),
        events = count,
        version = aggregate.version(),
        "committed events"
    );
    Ok(batch.into_events())
}
