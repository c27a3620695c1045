use std::any::type_name;

use crate::{
    system::parameterization::Parameterization,
    world::{
        component::{component::Component, component_kinds::ComponentKind},
        world::World,
    },
};

/// Orders and drives Update over all components of one declared kind.
///
/// One invocation of [`update`](ComponentSystem::update) iterates the
/// system's component set exactly once, passing the system's own
/// parameterization into each component. Iteration order equals
/// insertion order (entity spawn order, then slot order within an
/// entity); a system never exposes its component set as a raw
/// collection.
pub struct ComponentSystem {
    kind: ComponentKind,
    name: &'static str,
    parameterization: Box<dyn Parameterization>,
}

impl ComponentSystem {
    /// Declare a system over component type `C` with its per-phase
    /// parameterization.
    pub fn new<C: Component + 'static>(parameterization: Box<dyn Parameterization>) -> Self {
        Self {
            kind: ComponentKind::of::<C>(),
            name: type_name::<C>(),
            parameterization,
        }
    }

    /// The component kind this system operates over.
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Name of the component type this system drives, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameterization(&self) -> &dyn Parameterization {
        self.parameterization.as_ref()
    }

    /// Mutable access to the parameterization, so per-tick inputs can be
    /// loaded before the pass runs.
    pub fn parameterization_mut(&mut self) -> &mut dyn Parameterization {
        self.parameterization.as_mut()
    }

    /// Replace the parameterization outright — the re-wiring step after
    /// cloning a composite whose phases share context through their
    /// parameterizations.
    pub fn set_parameterization(&mut self, parameterization: Box<dyn Parameterization>) {
        self.parameterization = parameterization;
    }

    /// Run one pass over every enabled component of the declared kind.
    pub fn update(&mut self, world: &mut World) {
        world.update_kind(&self.kind, self.parameterization.as_mut());
    }

    /// Clone this system for a parallel simulation instance (confirmed
    /// vs. predicted state). The parameterization is deep-copied, never
    /// aliased.
    pub fn duplicate(&self) -> ComponentSystem {
        ComponentSystem {
            kind: self.kind,
            name: self.name,
            parameterization: self.parameterization.duplicate(),
        }
    }
}
