//! Eventide — player domain module.
//!
//! Owns the `player` aggregate type and the `player.created` event type, and
//! shows how a domain module registers its types and drives the kernel.

pub mod application;
pub mod domain;

pub use domain::module::PlayerModule;
