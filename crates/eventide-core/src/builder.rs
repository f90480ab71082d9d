//! Staged construction of events bound to an aggregate.

use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::{
    Event, EventParts, Metadata, validate_causation_id, validate_payload, validate_recorded_at,
};
use crate::registry::{AggregateType, EventType, EventTypeRegistry};

#[derive(Debug)]
struct Draft {
    aggregate_id: Uuid,
    aggregate_type: AggregateType,
    aggregate_version: i64,
    id: Option<Uuid>,
    payload: Vec<u8>,
    event_type: EventType,
    causation_id: Option<Uuid>,
    metadata: Option<Metadata>,
}

/// Builds one [`Event`] on top of an aggregate's current version.
///
/// The aggregate's id, type and version are copied when the builder is
/// created, so the event cannot disagree with the aggregate it describes.
/// Once any step fails the builder stays failed: later steps do nothing and
/// [`build`](Self::build) returns the first error.
///
/// ```
/// # use eventide_core::aggregate::Aggregate;
/// # use eventide_core::builder::EventBuilder;
/// # use eventide_core::clock::SystemClock;
/// # use eventide_core::registry::TypeRegistries;
/// # use uuid::Uuid;
/// let registries = TypeRegistries::new();
/// registries.aggregates.register("player");
/// registries.events.register("player.created");
///
/// let mut player = Aggregate::new(Uuid::new_v4(), "player".into(), &registries.aggregates)?;
/// let event = EventBuilder::new(
///     &player,
///     br#"{"name":"player1"}"#.to_vec(),
///     "player.created".into(),
///     &registries.events,
/// )
/// .with_causation_id(Uuid::new_v4())
/// .build(&SystemClock)?;
///
/// assert_eq!(event.aggregate_version(), 0);
/// player.apply_event(event);
/// assert_eq!(player.version(), 1);
/// # Ok::<(), eventide_core::error::DomainError>(())
/// ```
#[derive(Debug)]
#[must_use = "an event builder does nothing until `build` is called"]
pub struct EventBuilder {
    state: Result<Draft, DomainError>,
}

impl EventBuilder {
    /// Starts an event of `event_type` carrying `payload` for `aggregate`.
    ///
    /// An empty payload fails the builder with `InvalidEventPayload`; an
    /// empty or unregistered event type fails it with `InvalidEventType`.
    pub fn new(
        aggregate: &Aggregate,
        payload: impl Into<Vec<u8>>,
        event_type: EventType,
        registry: &EventTypeRegistry,
    ) -> Self {
        let payload = payload.into();
        let state = validate_payload(&payload).and_then(|()| {
            if registry.is_valid(&event_type) {
                Ok(Draft {
                    aggregate_id: aggregate.id(),
                    aggregate_type: aggregate.aggregate_type().clone(),
                    aggregate_version: aggregate.version(),
                    id: None,
                    payload,
                    event_type,
                    causation_id: None,
                    metadata: None,
                })
            } else {
                Err(DomainError::InvalidEventType(event_type.to_string()))
            }
        });

        Self { state }
    }

    /// Records the command or event that caused this one.
    ///
    /// The nil UUID fails the builder with `InvalidCausationId`; leave the
    /// call out to build an event without a causation ID.
    pub fn with_causation_id(self, causation_id: Uuid) -> Self {
        self.and_then(|mut draft| {
            validate_causation_id(causation_id)?;
            draft.causation_id = Some(causation_id);
            Ok(draft)
        })
    }

    /// Attaches metadata, replacing any set earlier. `None` keeps what is there.
    pub fn with_metadata(self, metadata: impl Into<Option<Metadata>>) -> Self {
        let metadata = metadata.into();
        self.and_then(|mut draft| {
            if metadata.is_some() {
                draft.metadata = metadata;
            }
            Ok(draft)
        })
    }

    /// Uses `id` instead of a freshly generated v7 UUID.
    ///
    /// The nil UUID fails the builder with `InvalidEventId`.
    pub fn with_event_id(self, id: Uuid) -> Self {
        self.and_then(|mut draft| {
            if id.is_nil() {
                return Err(DomainError::InvalidEventId);
            }
            draft.id = Some(id);
            Ok(draft)
        })
    }

    /// Finishes the event, stamping it with `clock.now()`.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by an earlier step, or
    /// `InvalidEventRecordedAt` if the clock reports the zero instant.
    pub fn build(self, clock: &dyn Clock) -> Result<Event, DomainError> {
        let draft = self.state?;
        let recorded_at = clock.now();
        validate_recorded_at(recorded_at)?;

        Ok(Event::from_validated(EventParts {
            aggregate_id: draft.aggregate_id,
            aggregate_type: draft.aggregate_type,
            aggregate_version: draft.aggregate_version,
            id: draft.id.unwrap_or_else(Uuid::now_v7),
            payload: draft.payload,
            recorded_at,
            event_type: draft.event_type,
            causation_id: draft.causation_id,
            metadata: draft.metadata,
        }))
    }

    fn and_then(self, step: impl FnOnce(Draft) -> Result<Draft, DomainError>) -> Self {
        Self {
            state: self.state.and_then(step),
        }
    }
}
