//! Commands for the player module.

use eventide_core::command::Command;
use uuid::Uuid;

/// Command to create a new player.
#[derive(Debug, Clone)]
pub struct CreatePlayer {
    /// Identifier of this command, recorded as the event's causation ID.
    pub command_id: Uuid,
    /// Identifier of the player to create.
    pub player_id: Uuid,
    /// The player's name.
    pub name: String,
}

impl Command for CreatePlayer {
    fn command_type(&self) -> &'static str {
        "player.create"
    }

    fn command_id(&self) -> Uuid {
        self.command_id
    }
}
