//! Aggregate roots for the player module.

use eventide_core::aggregate::{Aggregate, AggregateRoot};
use eventide_core::builder::EventBuilder;
use eventide_core::clock::Clock;
use eventide_core::error::DomainError;
use eventide_core::registry::TypeRegistries;
use uuid::Uuid;

use super::events::{PLAYER_AGGREGATE_TYPE, PLAYER_CREATED_EVENT_TYPE, PlayerCreated};

/// The aggregate root for a player.
#[derive(Debug)]
pub struct Player {
    aggregate: Aggregate,
    name: Option<String>,
}

impl Player {
    /// Creates an empty player aggregate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAggregateId` for the nil UUID, or
    /// `DomainError::InvalidAggregateType` if the player module has not been
    /// installed into `registries`.
    pub fn new(id: Uuid, registries: &TypeRegistries) -> Result<Self, DomainError> {
        let aggregate = Aggregate::new(id, PLAYER_AGGREGATE_TYPE.into(), &registries.aggregates)?;
        Ok(Self {
            aggregate,
            name: None,
        })
    }

    /// The player's name once created.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Creates the player, producing a `player.created` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank or the player
    /// was already created, and any error from building the event.
    pub fn create(
        &mut self,
        name: &str,
        causation_id: Uuid,
        registries: &TypeRegistries,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "player name must not be empty".into(),
            ));
        }
        if self.name.is_some() {
            return Err(DomainError::Validation(format!(
                "player {} already created",
                self.aggregate.id()
            )));
        }

        let payload = PlayerCreated {
            name: name.to_owned(),
        }
        .to_payload()?;
        let event = EventBuilder::new(
            &self.aggregate,
            payload,
            PLAYER_CREATED_EVENT_TYPE.into(),
            &registries.events,
        )
        .with_causation_id(causation_id)
        .build(clock)?;

        self.aggregate.apply_event(event);
        self.name = Some(name.to_owned());
        Ok(())
    }
}

impl AggregateRoot for Player {
    fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    fn aggregate_mut(&mut self) -> &mut Aggregate {
        &mut self.aggregate
    }
}
