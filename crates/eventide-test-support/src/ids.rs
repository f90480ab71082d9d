//! Name-based UUIDs for readable, repeatable test fixtures.

use uuid::Uuid;

/// Returns the v5 (SHA-1) UUID of `seed` in the DNS namespace.
///
/// The same seed always yields the same UUID, so fixtures like
/// `deterministic_uuid("player-1")` stay stable across runs.
#[must_use]
pub fn deterministic_uuid(seed: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, seed.as_bytes())
}
