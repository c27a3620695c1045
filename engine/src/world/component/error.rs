use thiserror::Error;

use orrery_serde::SerdeErr;

/// Errors that can occur during component registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// A component type was registered twice. The schema is configured
    /// exactly once at startup; hitting this indicates a bootstrap bug.
    #[error("Component {component_name} is already registered. Each component type must be registered exactly once during protocol initialization")]
    DuplicateRegistration { component_name: String },

    /// Attempted to write a component type that was never registered
    #[error("Component {component_name} not registered with Protocol. Must call `add_component()` during protocol initialization")]
    KindNotRegistered { component_name: String },

    /// A wire discriminator did not resolve to any registered type
    #[error("Component net ID {net_id} not found in registry. The registered schema must be identical across all session participants")]
    NetIdNotFound { net_id: u16 },

    /// Attempted an in-place copy between different concrete kinds
    #[error("Cannot mirror a {target_name} component from a {source_name} component")]
    MirrorKindMismatch {
        target_name: String,
        source_name: String,
    },

    /// Decoding failure while reading component fields
    #[error("Decode error: {0}")]
    Serde(#[from] SerdeErr),
}
