//! Command handlers for the player module.
//!
//! Handlers orchestrate domain logic: check the stream, execute the command
//! on the aggregate, and persist the resulting events.

use eventide_core::aggregate::AggregateRoot;
use eventide_core::clock::Clock;
use eventide_core::command::Command;
use eventide_core::error::DomainError;
use eventide_core::event::Event;
use eventide_core::registry::TypeRegistries;
use eventide_core::repository::{EventRepository, commit};
use tracing::{info, instrument};

use crate::domain::aggregates::Player;
use crate::domain::commands::CreatePlayer;

/// Handles the `CreatePlayer` command: creates a fresh aggregate, applies the
/// create domain method, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the player's stream already has
/// events or the name is blank, and `DomainError` from event building,
/// loading or appending.
#[instrument(
    skip(command, registries, clock, repo),
    fields(
        command_type = command.command_type(),
        command_id = %command.command_id(),
        player_id = %command.player_id,
    )
)]
pub async fn handle_create_player(
    command: &CreatePlayer,
    registries: &TypeRegistries,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<Event>, DomainError> {
    let existing_events = repo.load_events(command.player_id).await?;
    if !existing_events.is_empty() {
        return Err(DomainError::Validation(format!(
            "player {} already exists",
            command.player_id
        )));
    }

    let mut player = Player::new(command.player_id, registries)?;
    player.create(&command.name, command.command_id(), registries, clock)?;

    let events = commit(player.aggregate_mut(), repo).await?;
    info!(events = events.len(), "player created");

    Ok(events)
}

#[cfg(test)]
mod tests {
    use eventide_core::error::DomainError;
    use eventide_core::registry::TypeRegistries;
    use eventide_test_support::{
        FailingEventRepository, FixedClock, RecordingEventRepository, deterministic_uuid,
    };

    use crate::PlayerModule;
    use crate::application::command_handlers::handle_create_player;
    use crate::domain::commands::CreatePlayer;

    fn registries() -> TypeRegistries {
        let registries = TypeRegistries::new();
        registries.install(&PlayerModule);
        registries
    }

    #[tokio::test]
    async fn test_handle_create_player_persists_player_created_event() {
        // Arrange
        let registries = registries();
        let clock = FixedClock::standard();
        let repo = RecordingEventRepository::new();
        let command = CreatePlayer {
            command_id: deterministic_uuid("command-1"),
            player_id: deterministic_uuid("player-1"),
            name: "player1".to_owned(),
        };

        // Act
        let result = handle_create_player(&command, &registries, &clock, &repo).await;

        // Assert
        let events = result.unwrap();
        assert_eq!(events.len(), 1);

        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].aggregate_id, command.player_id);
        assert_eq!(appended[0].expected_version, 0);
        assert_eq!(appended[0].events, events);

        let stored = &events[0];
        assert_eq!(stored.event_type(), "player.created");
        assert_eq!(stored.aggregate_id(), command.player_id);
        assert_eq!(stored.aggregate_version(), 0);
        assert_eq!(stored.causation_id(), Some(command.command_id));
        assert_eq!(stored.recorded_at(), clock.0);
        assert_eq!(stored.payload(), br#"{"name":"player1"}"#);
    }

    #[tokio::test]
    async fn test_handle_create_player_rejects_existing_stream() {
        // Arrange
        let registries = registries();
        let clock = FixedClock::standard();
        let repo = RecordingEventRepository::new();
        let command = CreatePlayer {
            command_id: deterministic_uuid("command-2"),
            player_id: deterministic_uuid("player-2"),
            name: "player2".to_owned(),
        };
        handle_create_player(&command, &registries, &clock, &repo)
            .await
            .unwrap();

        // Act
        let again = CreatePlayer {
            command_id: deterministic_uuid("command-3"),
            ..command
        };
        let result = handle_create_player(&again, &registries, &clock, &repo).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(repo.appended_events().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_create_player_propagates_repository_errors() {
        let command = CreatePlayer {
            command_id: deterministic_uuid("command-4"),
            player_id: deterministic_uuid("player-4"),
            name: "player4".to_owned(),
        };

        let result = handle_create_player(
            &command,
            &registries(),
            &FixedClock::standard(),
            &FailingEventRepository,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_create_player_requires_installed_module() {
        let repo = RecordingEventRepository::new();
        let command = CreatePlayer {
            command_id: deterministic_uuid("command-5"),
            player_id: deterministic_uuid("player-5"),
            name: "player5".to_owned(),
        };

        let result = handle_create_player(
            &command,
            &TypeRegistries::new(),
            &FixedClock::standard(),
            &repo,
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::InvalidAggregateType("player".to_owned())
        );
        assert!(repo.appended_events().is_empty());
    }
}
