//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command, used in logs.
    fn command_type(&self) -> &'static str;

    /// Identifier of this command instance.
    ///
    /// Events produced while handling the command carry it as their causation ID.
    fn command_id(&self) -> Uuid;
}
