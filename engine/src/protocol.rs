use std::time::Duration;

use crate::world::component::{
    component::Component,
    component_kinds::ComponentKinds,
    error::ComponentError,
};

pub mod error;
pub use error::ProtocolError;

/// The declared schema of a session: every component type that may cross
/// the wire, registered exactly once at startup.
///
/// A `Protocol` is an explicit object constructed during bootstrap and
/// threaded through as a dependency — to the simulation, the command
/// decoder, and the component factories. It is never a hidden global.
/// The registration list must be identical across all participants in a
/// networked session; once `lock()` is called the schema is frozen.
pub struct Protocol {
    pub component_kinds: ComponentKinds,
    /// The duration between each tick
    pub tick_interval: Duration,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            component_kinds: ComponentKinds::new(),
            tick_interval: Duration::from_millis(50),
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn tick_interval(&mut self, duration: Duration) -> &mut Self {
        self.check_lock();
        self.tick_interval = duration;
        self
    }

    pub fn add_component<C: Component + 'static>(&mut self) -> &mut Self {
        self.check_lock();
        self.component_kinds.add_component::<C>();
        self
    }

    // Non-panicking builder methods

    pub fn try_tick_interval(&mut self, duration: Duration) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.tick_interval = duration;
        Ok(self)
    }

    pub fn try_add_component<C: Component + 'static>(&mut self) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.component_kinds
            .try_add_component::<C>()
            .map_err(|source| match source {
                ComponentError::DuplicateRegistration { component_name } => {
                    ProtocolError::DuplicateRegistration { component_name }
                }
                other => ProtocolError::Component(other),
            })?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    /// Checks if protocol is locked without panicking.
    /// Returns Err if protocol is locked.
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
