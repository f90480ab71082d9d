//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The aggregate identifier is the nil UUID.
    #[error("invalid aggregate ID")]
    InvalidAggregateId,

    /// The aggregate type is empty or has not been registered.
    #[error("invalid aggregate type: {0:?}")]
    InvalidAggregateType(String),

    /// A starting version below zero was supplied.
    #[error("invalid aggregate version: {0}")]
    InvalidAggregateVersion(i64),

    /// The event identifier is the nil UUID.
    #[error("invalid event ID")]
    InvalidEventId,

    /// The event payload is empty.
    #[error("invalid event payload")]
    InvalidEventPayload,

    /// The event timestamp is the zero instant.
    #[error("invalid event recorded at")]
    InvalidEventRecordedAt,

    /// The event type is empty or has not been registered.
    #[error("invalid event type: {0:?}")]
    InvalidEventType(String),

    /// A causation ID was supplied but is the nil UUID.
    #[error("invalid causation ID")]
    InvalidCausationId,

    /// An acknowledgement no longer matches the aggregate's uncommitted buffer.
    #[error("stale acknowledgement for aggregate {aggregate_id}")]
    StaleAcknowledgement {
        /// The aggregate whose buffer changed.
        aggregate_id: Uuid,
    },

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
