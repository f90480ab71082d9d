//! Domain events.
//!
//! An [`Event`] is an immutable fact about one aggregate at one version. New
//! events are produced through [`EventBuilder`](crate::builder::EventBuilder);
//! events read back from a store are reassembled with [`Event::from_parts`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::registry::{AggregateType, EventType, TypeRegistries};

/// Free-form string context attached to an event.
pub type Metadata = BTreeMap<String, String>;

/// An immutable record of one state change of one aggregate.
///
/// Serializes as a flat record; deserialize into [`EventParts`] and go
/// through [`Event::from_parts`] so stored events are validated again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    aggregate_id: Uuid,
    aggregate_type: AggregateType,
    aggregate_version: i64,
    id: Uuid,
    payload: Vec<u8>,
    recorded_at: DateTime<Utc>,
    event_type: EventType,
    causation_id: Option<Uuid>,
    metadata: Option<Metadata>,
}

/// Every field of an [`Event`], as read from storage or a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventParts {
    /// Aggregate this event belongs to.
    pub aggregate_id: Uuid,
    /// Type of the owning aggregate.
    pub aggregate_type: AggregateType,
    /// Aggregate version the event was built on.
    pub aggregate_version: i64,
    /// Unique event identifier.
    pub id: Uuid,
    /// Serialized domain fact.
    pub payload: Vec<u8>,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Event type name.
    pub event_type: EventType,
    /// Command or event that caused this one.
    pub causation_id: Option<Uuid>,
    /// Free-form context.
    pub metadata: Option<Metadata>,
}

impl Event {
    /// Reassembles an event from its parts, validating every field.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in field order: `InvalidAggregateId`,
    /// `InvalidAggregateType`, `InvalidAggregateVersion`, `InvalidEventId`,
    /// `InvalidEventPayload`, `InvalidEventRecordedAt`, `InvalidEventType`,
    /// `InvalidCausationId`.
    pub fn from_parts(
        parts: EventParts,
        registries: &TypeRegistries,
    ) -> Result<Self, DomainError> {
        if parts.aggregate_id.is_nil() {
            return Err(DomainError::InvalidAggregateId);
        }
        if !registries.aggregates.is_valid(&parts.aggregate_type) {
            return Err(DomainError::InvalidAggregateType(parts.aggregate_type.to_string()));
        }
        if parts.aggregate_version < 0 {
            return Err(DomainError::InvalidAggregateVersion(parts.aggregate_version));
        }
        if parts.id.is_nil() {
            return Err(DomainError::InvalidEventId);
        }
        validate_payload(&parts.payload)?;
        validate_recorded_at(parts.recorded_at)?;
        if !registries.events.is_valid(&parts.event_type) {
            return Err(DomainError::InvalidEventType(parts.event_type.to_string()));
        }
        if let Some(causation_id) = parts.causation_id {
            validate_causation_id(causation_id)?;
        }

        Ok(Self::from_validated(parts))
    }

    /// Builds an event from parts the caller has already validated.
    pub(crate) fn from_validated(parts: EventParts) -> Self {
        Self {
            aggregate_id: parts.aggregate_id,
            aggregate_type: parts.aggregate_type,
            aggregate_version: parts.aggregate_version,
            id: parts.id,
            payload: parts.payload,
            recorded_at: parts.recorded_at,
            event_type: parts.event_type,
            causation_id: parts.causation_id,
            metadata: parts.metadata,
        }
    }

    /// Aggregate this event belongs to.
    #[must_use]
    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    /// Type of the owning aggregate.
    #[must_use]
    pub fn aggregate_type(&self) -> &AggregateType {
        &self.aggregate_type
    }

    /// Version of the aggregate when the event was built, before it is applied.
    #[must_use]
    pub fn aggregate_version(&self) -> i64 {
        self.aggregate_version
    }

    /// Unique identifier of this event instance.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The opaque serialized domain fact.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// When the event was recorded.
    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// The event type name.
    #[must_use]
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// The command or event that caused this one, if any.
    #[must_use]
    pub fn causation_id(&self) -> Option<Uuid> {
        self.causation_id
    }

    /// Attached metadata, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Consumes the event and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> EventParts {
        EventParts {
            aggregate_id: self.aggregate_id,
            aggregate_type: self.aggregate_type,
            aggregate_version: self.aggregate_version,
            id: self.id,
            payload: self.payload,
            recorded_at: self.recorded_at,
            event_type: self.event_type,
            causation_id: self.causation_id,
            metadata: self.metadata,
        }
    }
}

pub(crate) fn validate_payload(payload: &[u8]) -> Result<(), DomainError> {
    if payload.is_empty() {
        return Err(DomainError::InvalidEventPayload);
    }
    Ok(())
}

/// The Unix epoch is the zero value of `DateTime<Utc>` and marks an unset time.
pub(crate) fn validate_recorded_at(recorded_at: DateTime<Utc>) -> Result<(), DomainError> {
    if recorded_at == DateTime::<Utc>::default() {
        return Err(DomainError::InvalidEventRecordedAt);
    }
    Ok(())
}

pub(crate) fn validate_causation_id(causation_id: Uuid) -> Result<(), DomainError> {
    if causation_id.is_nil() {
        return Err(DomainError::InvalidCausationId);
    }
    Ok(())
}
