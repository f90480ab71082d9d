//! Shared test doubles and utilities for Eventide.

mod clock;
mod ids;
mod repository;

pub use clock::FixedClock;
pub use ids::deterministic_uuid;
pub use repository::{
    AppendCall, EmptyEventRepository, FailingEventRepository, RecordingEventRepository,
};
