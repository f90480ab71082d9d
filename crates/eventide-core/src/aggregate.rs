//! Aggregates and the aggregate root abstraction.

use uuid::Uuid;

use crate::error::DomainError;
use crate::event::Event;
use crate::registry::{AggregateType, AggregateTypeRegistry};

/// A versioned entity that buffers the events it has produced until they
/// are durably stored.
///
/// `version` equals the starting version plus every event ever applied,
/// including those already flushed. It never decreases.
#[derive(Debug, Clone)]
pub struct Aggregate {
    id: Uuid,
    aggregate_type: AggregateType,
    version: i64,
    uncommitted_events: Vec<Event>,
}

impl Aggregate {
    /// Creates a new aggregate at version 0.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAggregateId` for the nil UUID and
    /// `DomainError::InvalidAggregateType` for an empty or unregistered type.
    pub fn new(
        id: Uuid,
        aggregate_type: AggregateType,
        registry: &AggregateTypeRegistry,
    ) -> Result<Self, DomainError> {
        Self::rehydrate(id, aggregate_type, 0, registry)
    }

    /// Creates an aggregate that resumes at `version`, e.g. after loading a
    /// stream whose last event left it there.
    ///
    /// # Errors
    ///
    /// As [`Aggregate::new`], plus `DomainError::InvalidAggregateVersion`
    /// when `version` is negative or `i64::MAX`, which leaves no room to
    /// apply another event.
    pub fn rehydrate(
        id: Uuid,
        aggregate_type: AggregateType,
        version: i64,
        registry: &AggregateTypeRegistry,
    ) -> Result<Self, DomainError> {
        if id.is_nil() {
            return Err(DomainError::InvalidAggregateId);
        }
        if !registry.is_valid(&aggregate_type) {
            return Err(DomainError::InvalidAggregateType(aggregate_type.to_string()));
        }
        if !(0..i64::MAX).contains(&version) {
            return Err(DomainError::InvalidAggregateVersion(version));
        }

        Ok(Self {
            id,
            aggregate_type,
            version,
            uncommitted_events: Vec::new(),
        })
    }

    /// Aggregate identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Aggregate type.
    #[must_use]
    pub fn aggregate_type(&self) -> &AggregateType {
        &self.aggregate_type
    }

    /// Current version, counting uncommitted events.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Version last known to be durably stored.
    ///
    /// A store checks this as the expected version when appending the
    /// uncommitted events.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn committed_version(&self) -> i64 {
        self.version - self.uncommitted_events.len() as i64
    }

    /// Buffers `event` and bumps the version by one.
    ///
    /// The event is expected to come from an
    /// [`EventBuilder`](crate::builder::EventBuilder) created on this aggregate.
    ///
    /// # Panics
    ///
    /// Overflows once the version reaches `i64::MAX`, which takes that many
    /// applied events.
    pub fn apply_event(&mut self, event: Event) {
        if event.aggregate_id() != self.id {
            tracing::warn!(
                aggregate_id = %self.id,
                event_aggregate_id = %event.aggregate_id(),
                event_id = %event.id(),
                "applying event built for a different aggregate"
            );
        }
        self.version += 1;
        tracing::trace!(
            aggregate_id = %self.id,
            event_type = %event.event_type(),
            version = self.version,
            "applied event"
        );
        self.uncommitted_events.push(event);
    }

    /// Events applied since the last flush, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.uncommitted_events
    }

    /// Drops every buffered event. The version is unchanged.
    ///
    /// Only call this once the events returned by [`events`](Self::events)
    /// are durably stored; prefer [`uncommitted`](Self::uncommitted) and
    /// [`acknowledge`](Self::acknowledge), which cannot drop events the
    /// caller never saw.
    pub fn flush_events(&mut self) {
        self.uncommitted_events.clear();
    }

    /// Copies the buffered events for handing to a store.
    #[must_use]
    pub fn uncommitted(&self) -> UncommittedEvents {
        UncommittedEvents {
            aggregate_id: self.id,
            expected_version: self.committed_version(),
            events: self.uncommitted_events.clone(),
        }
    }

    /// Removes exactly the events in `batch` from the front of the buffer,
    /// returning how many were removed. Events applied after the batch was
    /// taken stay buffered.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StaleAcknowledgement` if the batch belongs to
    /// another aggregate or the buffer no longer starts with its events
    /// (it was flushed or acknowledged in the meantime).
    pub fn acknowledge(&mut self, batch: &UncommittedEvents) -> Result<usize, DomainError> {
        let matches = batch.aggregate_id == self.id
            && batch.expected_version == self.committed_version()
            && self.uncommitted_events.len() >= batch.events.len()
            && self
                .uncommitted_events
                .iter()
                .zip(&batch.events)
                .all(|(buffered, acked)| buffered.id() == acked.id());
        if !matches {
            return Err(DomainError::StaleAcknowledgement {
                aggregate_id: self.id,
            });
        }

        let count = batch.events.len();
        self.uncommitted_events.drain(..count);
        Ok(count)
    }
}

/// A copy of an aggregate's uncommitted events, used as the acknowledgement
/// token once they are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncommittedEvents {
    aggregate_id: Uuid,
    expected_version: i64,
    events: Vec<Event>,
}

impl UncommittedEvents {
    /// Aggregate the events belong to.
    #[must_use]
    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    /// Stream version the store must hold before appending these events.
    #[must_use]
    pub fn expected_version(&self) -> i64 {
        self.expected_version
    }

    /// The events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the batch and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Returns `true` if there is nothing to store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Trait for domain aggregates built around an [`Aggregate`].
pub trait AggregateRoot: Send + Sync {
    /// The underlying aggregate.
    fn aggregate(&self) -> &Aggregate;

    /// Mutable access to the underlying aggregate.
    fn aggregate_mut(&mut self) -> &mut Aggregate;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid {
        self.aggregate().id()
    }

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64 {
        self.aggregate().version()
    }

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Event] {
        self.aggregate().events()
    }

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self) {
        self.aggregate_mut().flush_events();
    }
}

impl AggregateRoot for Aggregate {
    fn aggregate(&self) -> &Aggregate {
        self
    }

    fn aggregate_mut(&mut self) -> &mut Aggregate {
        self
    }
}
