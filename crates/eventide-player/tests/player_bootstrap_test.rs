//! Start-up wiring of the player module against shared registries.

use std::sync::Arc;
use std::thread;

use eventide_core::aggregate::AggregateRoot;
use eventide_core::clock::SystemClock;
use eventide_core::registry::{AggregateType, DomainModule, EventType, TypeRegistries};
use eventide_core::repository::EventRepository;
use eventide_player::PlayerModule;
use eventide_player::application::command_handlers::handle_create_player;
use eventide_player::domain::aggregates::Player;
use eventide_player::domain::commands::CreatePlayer;
use eventide_player::domain::events::PlayerCreated;
use eventide_test_support::{FixedClock, RecordingEventRepository, deterministic_uuid};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

struct InventoryModule;

impl DomainModule for InventoryModule {
    fn register_types(&self, registries: &TypeRegistries) {
        registries.aggregates.register("inventory");
        registries.events.register("inventory.item_added");
    }
}

#[test]
fn test_modules_installed_in_parallel_all_register() {
    // Arrange
    init_tracing();
    let registries = Arc::new(TypeRegistries::new());

    // Act
    thread::scope(|scope| {
        let modules: [&(dyn DomainModule + Sync); 2] = [&PlayerModule, &InventoryModule];
        for module in modules {
            let registries = Arc::clone(&registries);
            scope.spawn(move || {
                registries.install(module);
            });
        }
    });

    // Assert
    let mut aggregates = registries.aggregates.all_registered();
    aggregates.sort();
    assert_eq!(
        aggregates,
        vec![AggregateType::new("inventory"), AggregateType::new("player")]
    );
    assert!(registries.events.is_valid(&EventType::new("player.created")));
    assert!(registries.events.is_valid(&EventType::new("inventory.item_added")));
}

#[test]
fn test_installing_twice_is_harmless() {
    let registries = TypeRegistries::new();

    registries.install(&PlayerModule).install(&PlayerModule);

    assert_eq!(registries.aggregates.len(), 1);
    assert_eq!(registries.events.len(), 1);
}

#[tokio::test]
async fn test_created_player_can_be_read_back_from_the_store() {
    // Arrange
    init_tracing();
    let registries = TypeRegistries::new();
    registries.install(&PlayerModule);
    let repo = RecordingEventRepository::new();
    let command = CreatePlayer {
        command_id: deterministic_uuid("command-1"),
        player_id: deterministic_uuid("player-1"),
        name: "Elminster".to_owned(),
    };

    // Act
    handle_create_player(&command, &registries, &SystemClock, &repo)
        .await
        .unwrap();

    // Assert
    let stream = repo.load_events(command.player_id).await.unwrap();
    assert_eq!(stream.len(), 1);
    assert_eq!(
        PlayerCreated::from_payload(stream[0].payload()).unwrap().name,
        "Elminster"
    );
    assert_eq!(repo.stream_version(command.player_id), 1);
}

#[test]
fn test_flushed_player_keeps_its_version() {
    // Arrange
    let registries = TypeRegistries::new();
    registries.install(&PlayerModule);
    let mut player = Player::new(deterministic_uuid("player-2"), &registries).unwrap();
    player
        .create(
            "player2",
            deterministic_uuid("command-2"),
            &registries,
            &FixedClock::standard(),
        )
        .unwrap();

    // Act
    player.clear_uncommitted_events();

    // Assert
    assert!(player.uncommitted_events().is_empty());
    assert_eq!(player.version(), 1);
}
