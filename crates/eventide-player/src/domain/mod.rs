//! Domain model of the player module.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod module;
