use thiserror::Error;

use crate::world::component::error::ComponentError;

/// Errors that can occur while building or modifying a Protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Attempted to modify a Protocol after it was locked
    #[error("Protocol is already locked and cannot be modified")]
    AlreadyLocked,

    /// A component type was registered twice; the schema is declared
    /// exactly once at startup
    #[error("Component {component_name} is already registered with this Protocol")]
    DuplicateRegistration { component_name: String },

    /// Component registry error
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}
