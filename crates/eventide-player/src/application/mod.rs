//! Application services for the player module.

pub mod command_handlers;
