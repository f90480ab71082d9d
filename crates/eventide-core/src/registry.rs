//! Type registries for aggregate and event kinds.
//!
//! Domain modules declare the aggregate and event type names they own by
//! registering them at start-up. Validation code later asks the registry
//! whether a name is legal instead of matching against a central enum.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

/// A string tag naming a kind of aggregate or event.
pub trait TypeName: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Label used in log fields.
    const KIND: &'static str;

    /// Returns the tag as a string slice.
    fn as_str(&self) -> &str;

    /// Returns `true` if the tag is the empty string.
    fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

macro_rules! define_type_name {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Creates a tag from any string-like value.
            #[must_use]
            pub fn new(name: impl AsRef<str>) -> Self {
                Self(Arc::from(name.as_ref()))
            }
        }

        impl TypeName for $name {
            const KIND: &'static str = $kind;

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(Arc::from(name))
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                &*self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                &*self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let name = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(name))
            }
        }
    };
}

define_type_name!(
    /// Name of a kind of aggregate, e.g. `"player"`.
    AggregateType,
    "aggregate_type"
);

define_type_name!(
    /// Name of a kind of event, e.g. `"player.created"`.
    EventType,
    "event_type"
);

/// A concurrency-safe set of registered type names.
///
/// Registration is additive: names are never removed.
#[derive(Debug)]
pub struct TypeRegistry<K: TypeName> {
    names: RwLock<HashSet<K>>,
}

/// Registry of aggregate type names.
pub type AggregateTypeRegistry = TypeRegistry<AggregateType>;

/// Registry of event type names.
pub type EventTypeRegistry = TypeRegistry<EventType>;

impl<K: TypeName> TypeRegistry<K> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: RwLock::new(HashSet::new()),
        }
    }

    /// Registers `name` as valid and returns the stored tag.
    ///
    /// Registering the same name twice is a no-op. The empty name is never
    /// stored since it can never be valid.
    pub fn register(&self, name: impl Into<K>) -> K {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!(kind = K::KIND, "ignoring registration of empty type name");
            return name;
        }

        // The set is only ever extended, so a poisoned lock still guards a
        // consistent value.
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = names.get(&name) {
            return existing.clone();
        }
        tracing::debug!(kind = K::KIND, name = name.as_str(), "registered type name");
        names.insert(name.clone());
        name
    }

    /// Returns `true` if `name` is non-empty and has been registered.
    #[must_use]
    pub fn is_valid(&self, name: &K) -> bool {
        if name.is_empty() {
            return false;
        }
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Returns a snapshot of every registered name, in no particular order.
    #[must_use]
    pub fn all_registered(&self) -> Vec<K> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: TypeName> Default for TypeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A domain module that owns aggregate and event types.
pub trait DomainModule {
    /// Registers every aggregate and event type this module owns.
    fn register_types(&self, registries: &TypeRegistries);
}

/// The aggregate and event registries of one application.
///
/// Built once at start-up and passed by reference (or behind an `Arc`)
/// wherever validation happens. The two registries share no state.
#[derive(Debug, Default)]
pub struct TypeRegistries {
    /// Registered aggregate types.
    pub aggregates: AggregateTypeRegistry,
    /// Registered event types.
    pub events: EventTypeRegistry,
}

impl TypeRegistries {
    /// Creates a pair of empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a domain module's type registration.
    pub fn install(&self, module: &dyn DomainModule) -> &Self {
        module.register_types(self);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_registered_aggregate_type_is_valid() {
        // Arrange
        let registry = AggregateTypeRegistry::new();

        // Act
        registry.register("player");

        // Assert
        assert!(registry.is_valid(&AggregateType::new("player")));
    }

    #[test]
    fn test_unregistered_and_empty_names_are_invalid() {
        let registry = EventTypeRegistry::new();
        registry.register("player.created");

        assert!(!registry.is_valid(&EventType::new("InvalidEventType")));
        assert!(!registry.is_valid(&EventType::new("")));
    }

    #[test]
    fn test_register_is_idempotent() {
        // Arrange
        let registry = AggregateTypeRegistry::new();

        // Act
        let first = registry.register("player");
        let second = registry.register(String::from("player"));

        // Assert
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.all_registered(), vec![AggregateType::new("player")]);
    }

    #[test]
    fn test_empty_name_is_not_stored() {
        let registry = AggregateTypeRegistry::new();

        registry.register("");

        assert!(registry.is_empty());
    }

    #[test]
    fn test_registries_share_no_state() {
        // Arrange
        let registries = TypeRegistries::new();

        // Act
        registries.aggregates.register("player");
        registries.events.register("player.created");

        // Assert
        assert!(!registries.events.is_valid(&EventType::new("player")));
        assert!(
            !registries
                .aggregates
                .is_valid(&AggregateType::new("player.created"))
        );
    }

    #[test]
    fn test_install_runs_module_registration() {
        struct Dungeon;

        impl DomainModule for Dungeon {
            fn register_types(&self, registries: &TypeRegistries) {
                registries.aggregates.register("room");
                registries.events.register("room.entered");
            }
        }

        let registries = TypeRegistries::new();
        registries.install(&Dungeon);

        assert!(registries.aggregates.is_valid(&AggregateType::new("room")));
        assert!(registries.events.is_valid(&EventType::new("room.entered")));
    }

    #[test]
    fn test_concurrent_registration_keeps_every_name() {
        // Arrange
        let registry = EventTypeRegistry::new();

        // Act
        thread::scope(|scope| {
            for module in 0..8 {
                let registry = &registry;
                scope.spawn(move || {
                    for n in 0..50 {
                        registry.register(format!("module{module}.event{n}"));
                        registry.register("shared.event");
                    }
                });
            }
        });

        // Assert
        assert_eq!(registry.len(), 8 * 50 + 1);
        assert!(registry.is_valid(&EventType::new("module7.event49")));
    }

    #[test]
    fn test_type_name_serializes_as_plain_string() {
        let event_type = EventType::new("player.created");

        let json = serde_json::to_string(&event_type).unwrap();
        let back: EventType = serde_json::from_str(&json).unwrap();

        assert_eq!(json, "\"player.created\"");
        assert_eq!(back, event_type);
    }
}
