//! Type registration for the player module.

use eventide_core::registry::{DomainModule, TypeRegistries};

use super::events::{PLAYER_AGGREGATE_TYPE, PLAYER_CREATED_EVENT_TYPE};

/// Registers the player module's aggregate and event types.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerModule;

impl DomainModule for PlayerModule {
    fn register_types(&self, registries: &TypeRegistries) {
        registries.aggregates.register(PLAYER_AGGREGATE_TYPE);
        registries.events.register(PLAYER_CREATED_EVENT_TYPE);
    }
}

#[cfg(test)]
mod tests {
    use eventide_core::registry::{AggregateType, EventType};

    use super::*;

    #[test]
    fn test_player_module_registers_its_types() {
        // Arrange
        let registries = TypeRegistries::new();

        // Act
        registries.install(&PlayerModule);

        // Assert
        assert_eq!(
            registries.aggregates.all_registered(),
            vec![AggregateType::new("player")]
        );
        assert_eq!(
            registries.events.all_registered(),
            vec![EventType::new("player.created")]
        );
    }
}
