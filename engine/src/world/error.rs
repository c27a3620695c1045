use thiserror::Error;

/// Errors that can occur during entity store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The referenced entity is not present in this world
    #[error("Entity {entity} does not exist in this world")]
    EntityDoesNotExist { entity: u64 },

    /// The entity exists but owns no component of the requested kind
    #[error("Entity {entity} has no component of the requested kind")]
    ComponentNotPresent { entity: u64 },
}
