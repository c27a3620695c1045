use crate::{system::component_system::ComponentSystem, world::world::World};

/// An ordered sequence of component systems forming one simulation tick.
///
/// `update` drives each member exactly once, strictly in list order.
/// Order is a correctness invariant: a phase that mutates state must run
/// to completion before a phase that reads it, so members are never run
/// concurrently.
pub struct CompositeSystem {
    systems: Vec<ComponentSystem>,
}

impl CompositeSystem {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Append a system; it will run after every system already present.
    pub fn push(&mut self, system: ComponentSystem) -> &mut Self {
        self.systems.push(system);
        self
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn systems(&self) -> impl Iterator<Item = &ComponentSystem> {
        self.systems.iter()
    }

    pub fn systems_mut(&mut self) -> impl Iterator<Item = &mut ComponentSystem> {
        self.systems.iter_mut()
    }

    /// Drive every member system once, in configured order.
    pub fn update(&mut self, world: &mut World) {
        for system in self.systems.iter_mut() {
            system.update(world);
        }
    }

    /// Deep copy: every member is duplicated with an independent
    /// parameterization. Phases that shared context through their
    /// parameterizations must be re-wired by the caller afterwards
    /// (`ComponentSystem::set_parameterization`).
    pub fn duplicate(&self) -> CompositeSystem {
        CompositeSystem {
            systems: self.systems.iter().map(|s| s.duplicate()).collect(),
        }
    }
}

impl Default for CompositeSystem {
    fn default() -> Self {
        Self::new()
    }
}
