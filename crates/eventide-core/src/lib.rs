//! Eventide Core — event-sourcing kernel.
//!
//! Aggregates, immutable events, the staged event builder and the type
//! registries that domain modules use to declare which aggregate and event
//! kinds exist. It contains no infrastructure code.

pub mod aggregate;
pub mod builder;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod registry;
pub mod repository;
