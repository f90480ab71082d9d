//! Domain events for the player module.

use eventide_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Aggregate type owned by this module.
pub const PLAYER_AGGREGATE_TYPE: &str = "player";

/// Event type emitted when a player is created.
pub const PLAYER_CREATED_EVENT_TYPE: &str = "player.created";

/// Payload of a `player.created` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCreated {
    /// The player's name.
    pub name: String,
}

impl PlayerCreated {
    /// Encodes the payload as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization fails.
    pub fn to_payload(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(|e| {
            DomainError::Infrastructure(format!("event serialization failed: {e}"))
        })
    }

    /// Decodes a payload produced by [`to_payload`](Self::to_payload).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the bytes are not a valid payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(payload).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })
    }
}
